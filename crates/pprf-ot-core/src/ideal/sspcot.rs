//! Ideal single-point correlated OT functionality.

use pprf_core::{prg::Prg, Block};

use crate::output::{ReceiverOutput, SenderOutput};

/// The ideal SSP-COT functionality.
#[derive(Debug)]
pub struct IdealSspcot {
    delta: Block,
    prg: Prg,
}

impl IdealSspcot {
    /// Creates the functionality with a random correlation.
    pub fn new() -> Self {
        let mut prg = Prg::new();
        let delta = prg.random_block();
        IdealSspcot { delta, prg }
    }

    /// Creates the functionality with the given correlation.
    pub fn new_with_delta(delta: Block) -> Self {
        IdealSspcot {
            delta,
            prg: Prg::new(),
        }
    }

    /// Returns the correlation, delta.
    pub fn delta(&self) -> Block {
        self.delta
    }

    /// Deals one single-point correlation of `count` values punctured at
    /// `alpha`.
    pub fn extend(&mut self, count: u32, alpha: u32) -> (SenderOutput, ReceiverOutput) {
        assert!(alpha < count);

        let mut leaves = vec![Block::ZERO; count as usize];
        self.prg.random_blocks(&mut leaves);

        let mut punctured = leaves.clone();
        punctured[alpha as usize] ^= self.delta;

        (
            SenderOutput {
                delta: self.delta,
                leaves,
            },
            ReceiverOutput {
                alpha: Some(alpha),
                leaves: punctured,
            },
        )
    }
}

impl Default for IdealSspcot {
    fn default() -> Self {
        Self::new()
    }
}
