//! The malicious-secure SSP-COT protocol.
//!
//! Wraps the semi-honest core and appends a batched consistency check: both
//! parties weigh their leaf vectors with random GF(2^128) coefficients
//! derived from a receiver-keyed PRF, fold in 128 extra base-COT
//! correlations, and compare a hash of the result. Any deviation by either
//! party makes the comparison fail except with probability `2^-128`.

pub mod receiver;
pub mod sender;

use cfg_if::cfg_if;
use pprf_core::{aes::AesEncryptor, Block};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::{ExecutionId, CSP};

/// The monomial basis `X^0 .. X^127` used to fold check-OT blocks into one
/// field element.
fn monomials() -> Vec<Block> {
    (0..CSP).map(|i| Block::from(1u128 << i)).collect()
}

/// Derives the per-index check weights `chi_i = PRF_key(i, exec)`.
fn derive_chis(prf: &AesEncryptor, exec: ExecutionId, count: usize) -> Vec<Block> {
    let chi = |i: usize| {
        let input: Block = bytemuck::cast([i as u64, exec.as_u64()]);
        prf.encrypt_block(input)
    };

    cfg_if! {
        if #[cfg(feature = "rayon")] {
            let chis: Vec<Block> = (0..count).into_par_iter().map(chi).collect();
        } else {
            let chis: Vec<Block> = (0..count).map(chi).collect();
        }
    }

    chis
}

/// The weighted sum `sum_i chis[i] * leaves[i]` in GF(2^128).
fn weighted_sum(chis: &[Block], leaves: &[Block]) -> Block {
    cfg_if! {
        if #[cfg(feature = "rayon")] {
            let sum = chis
                .par_chunks(1024)
                .zip(leaves.par_chunks(1024))
                .map(|(a, b)| Block::gf_dot(a, b))
                .reduce(|| Block::ZERO, |a, b| a ^ b);
        } else {
            let sum = Block::gf_dot(chis, leaves);
        }
    }

    sum
}

#[cfg(test)]
mod tests {
    use super::{receiver::Receiver, sender::Sender};
    use crate::{
        config::Config,
        error::{ReceiverError, SenderError},
        ideal::cot::IdealCot,
        msgs::PrfKey,
        output::{ReceiverOutput, SenderOutput},
        test::assert_single_point,
        tree_depth, CSP,
    };
    use pprf_core::{prg::Prg, Block};
    use rand_core::{RngCore, SeedableRng};

    fn setup(
        ideal: &mut IdealCot,
    ) -> (
        Sender<super::sender::state::Extension>,
        Receiver<super::receiver::state::Extension>,
    ) {
        let delta = ideal.delta();

        let mut sender = Sender::new(Config::default()).setup(delta);
        let (receiver, key) = Receiver::new(Config::default()).setup();

        sender.receive_prf_key(key).unwrap();

        (sender, receiver)
    }

    fn run_one(
        ideal: &mut IdealCot,
        sender: &mut Sender<super::sender::state::Extension>,
        receiver: &mut Receiver<super::receiver::state::Extension>,
        count: u32,
        alpha: u32,
        tamper: Option<(usize, Block)>,
    ) -> (SenderOutput, Result<ReceiverOutput, ReceiverError>) {
        let h = tree_depth(count);
        let (base_sender, base_receiver) = ideal.random_correlated(h);

        let masks = receiver
            .mask_bits(count, alpha, &base_receiver.choices)
            .unwrap();
        let (corrections, correlation) =
            sender.extend(count, &base_sender.msgs, &masks).unwrap();
        receiver
            .reconstruct(&base_receiver.msgs, &corrections, &correlation)
            .unwrap();

        if let Some((index, mask)) = tamper {
            receiver.tamper_leaf(index, mask);
        }

        let (check_sender, check_receiver) = ideal.random_correlated(CSP);

        let check_msg = receiver.check_mask(&check_receiver.choices).unwrap();
        let (sender_output, digest) = sender.check(&check_sender.msgs, check_msg).unwrap();
        let receiver_output = receiver.verify(&check_receiver.msgs, digest);

        (sender_output, receiver_output)
    }

    #[test]
    fn single_point_correlation() {
        let mut ideal = IdealCot::default();
        let (mut sender, mut receiver) = setup(&mut ideal);

        let (sender_output, receiver_output) =
            run_one(&mut ideal, &mut sender, &mut receiver, 16, 7, None);
        let receiver_output = receiver_output.unwrap();

        assert_eq!(receiver_output.alpha, Some(7));
        assert_single_point(
            sender_output.delta,
            &sender_output.leaves,
            &receiver_output.leaves,
            7,
        );
    }

    #[test]
    fn repeated_and_truncated_executions() {
        let mut ideal = IdealCot::default();
        let (mut sender, mut receiver) = setup(&mut ideal);

        for (count, alpha) in [(1, 0), (13, 12), (64, 0), (100, 42)] {
            let (sender_output, receiver_output) =
                run_one(&mut ideal, &mut sender, &mut receiver, count, alpha, None);
            let receiver_output = receiver_output.unwrap();

            assert_eq!(sender_output.leaves.len(), count as usize);
            assert_single_point(
                sender_output.delta,
                &sender_output.leaves,
                &receiver_output.leaves,
                alpha,
            );
        }
    }

    #[test]
    fn detects_a_flipped_leaf() {
        let mut ideal = IdealCot::default();
        let (mut sender, mut receiver) = setup(&mut ideal);

        let (_, receiver_output) = run_one(
            &mut ideal,
            &mut sender,
            &mut receiver,
            16,
            7,
            Some((3, Block::from(1u128))),
        );

        assert!(matches!(
            receiver_output,
            Err(ReceiverError::ConsistencyCheckFailed)
        ));
    }

    #[test]
    fn tamper_detection_over_many_trials() {
        let mut prg = Prg::from_seed(Block::from(1337u128));
        let count = 8u32;

        let mut undetected = 0usize;
        for _ in 0..1000 {
            let mut ideal = IdealCot::new(prg.random_block(), prg.random_block());
            let (mut sender, mut receiver) = setup(&mut ideal);

            let alpha = prg.next_u32() % count;
            let index = (prg.next_u32() % count) as usize;
            let mut mask = prg.random_block();
            if mask == Block::ZERO {
                mask = Block::ONES;
            }

            let (_, receiver_output) = run_one(
                &mut ideal,
                &mut sender,
                &mut receiver,
                count,
                alpha,
                Some((index, mask)),
            );

            if receiver_output.is_ok() {
                undetected += 1;
            }
        }

        assert_eq!(undetected, 0);
    }

    #[test]
    fn requires_the_prf_key() {
        let mut ideal = IdealCot::default();
        let delta = ideal.delta();

        let mut sender = Sender::new(Config::default()).setup(delta);
        let (base_sender, _) = ideal.random_correlated(3);

        assert!(matches!(
            sender.extend(
                8,
                &base_sender.msgs,
                &crate::msgs::MaskBits { bits: vec![false; 3] }
            ),
            Err(SenderError::InvalidState(_))
        ));

        // And only once.
        sender
            .receive_prf_key(PrfKey { key: Block::ZERO })
            .unwrap();
        assert!(matches!(
            sender.receive_prf_key(PrfKey { key: Block::ZERO }),
            Err(SenderError::InvalidState(_))
        ));
    }

    #[test]
    fn rejects_out_of_order_checks() {
        let mut ideal = IdealCot::default();
        let (mut sender, mut receiver) = setup(&mut ideal);

        assert!(matches!(
            sender.check(
                &vec![Block::ZERO; CSP],
                crate::msgs::CheckFromReceiver { x_prime: Block::ZERO }
            ),
            Err(SenderError::InvalidState(_))
        ));
        assert!(matches!(
            receiver.check_mask(&vec![false; CSP]),
            Err(ReceiverError::InvalidState(_))
        ));
    }
}
