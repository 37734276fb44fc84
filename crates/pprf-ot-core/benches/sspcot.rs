use criterion::{criterion_group, criterion_main, Criterion};

use pprf_core::Block;
use pprf_ot_core::{
    config::Config,
    ideal::cot::IdealCot,
    semi_honest::{receiver::Receiver, sender::Sender},
    tree_depth,
};

fn criterion_benchmark(c: &mut Criterion) {
    for count in [1u32 << 10, 1 << 16] {
        c.bench_function(&format!("sspcot::semi_honest n={count}"), move |bench| {
            let mut ideal = IdealCot::new(Block::from(0u128), Block::ONES);
            let mut sender = Sender::new(Config::default()).setup(ideal.delta());
            let mut receiver = Receiver::new(Config::default()).setup();

            bench.iter(|| {
                let (base_sender, base_receiver) =
                    ideal.random_correlated(tree_depth(count));

                let masks = receiver
                    .mask_bits(count, count / 2, &base_receiver.choices)
                    .unwrap();
                let (corrections, correlation, sender_output) =
                    sender.extend(count, &base_sender.msgs, &masks).unwrap();
                let receiver_output = receiver
                    .reconstruct(&base_receiver.msgs, &corrections, &correlation)
                    .unwrap();

                criterion::black_box((sender_output, receiver_output))
            });
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
