use criterion::{criterion_group, criterion_main, Criterion};
use pprf_core::{pprf::PprfTree, Block};

fn criterion_benchmark(c: &mut Criterion) {
    for depth in [10usize, 16] {
        c.bench_function(&format!("pprf::expand depth {depth}"), move |bench| {
            let tree = PprfTree::new(depth);
            let seed = Block::from(0x3735_u128);
            bench.iter(|| {
                let expansion = tree.expand(seed);
                criterion::black_box(expansion.leaves.len())
            });
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
