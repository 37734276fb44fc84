//! Ideal random correlated oblivious transfer functionality.

use pprf_core::{prg::Prg, Block};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    output::{RcotReceiverOutput, RcotSenderOutput},
    ExecutionId,
};

/// The ideal random COT functionality.
#[derive(Debug)]
pub struct IdealCot {
    delta: Block,
    id: ExecutionId,
    counter: usize,
    prg: Prg,
}

impl IdealCot {
    /// Creates a new ideal random COT functionality.
    ///
    /// # Arguments
    ///
    /// * `seed` - The seed for the PRG.
    /// * `delta` - The correlation.
    pub fn new(seed: Block, delta: Block) -> Self {
        IdealCot {
            delta,
            id: ExecutionId::default(),
            counter: 0,
            prg: Prg::from_seed(seed),
        }
    }

    /// Returns the correlation, delta.
    pub fn delta(&self) -> Block {
        self.delta
    }

    /// Sets the correlation, delta.
    pub fn set_delta(&mut self, delta: Block) {
        self.delta = delta;
    }

    /// Returns the number of correlations dealt so far.
    pub fn count(&self) -> usize {
        self.counter
    }

    /// Deals a batch of random correlated OTs: the receiver gets random
    /// choice bits and the matching messages.
    ///
    /// # Arguments
    ///
    /// * `count` - The number of correlations to deal.
    pub fn random_correlated(&mut self, count: usize) -> (RcotSenderOutput, RcotReceiverOutput) {
        let mut msgs = vec![Block::ZERO; count];
        let mut choices = vec![false; count];

        self.prg.random_blocks(&mut msgs);
        self.prg.random_bools(&mut choices);

        let chosen: Vec<Block> = msgs
            .iter()
            .zip(&choices)
            .map(|(&q, &r)| if r { q ^ self.delta } else { q })
            .collect();

        self.counter += count;
        let id = self.id.next_id();

        (
            RcotSenderOutput { id, msgs },
            RcotReceiverOutput {
                id,
                choices,
                msgs: chosen,
            },
        )
    }
}

impl Default for IdealCot {
    fn default() -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        Self::new(rng.gen(), rng.gen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::assert_cot;

    #[test]
    fn ideal_rcot() {
        let mut ideal = IdealCot::default();

        let (RcotSenderOutput { msgs, .. }, RcotReceiverOutput { choices, msgs: received, .. }) =
            ideal.random_correlated(100);

        assert_cot(ideal.delta(), &choices, &msgs, &received);
    }
}
