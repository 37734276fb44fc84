//! SSP-COT sender, semi-honest variant.

use pprf_core::{aes::FIXED_KEY_AES, pprf::PprfTree, prg::Prg, Block};
use zeroize::Zeroize;

use crate::{
    config::Config,
    error::SenderError,
    msgs::{Correlation, MaskBits, TreeCorrections},
    output::SenderOutput,
    tree_depth, ExecutionId,
};

/// SSP-COT sender.
#[derive(Debug, Default)]
pub struct Sender<T: state::State = state::Initialized> {
    config: Config,
    state: T,
}

impl Sender {
    /// Creates a new sender.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: state::Initialized::default(),
        }
    }

    /// Completes the setup phase.
    ///
    /// # Arguments
    ///
    /// * `delta` - The sender's correlation, which must match the base-COT
    ///   correlation.
    pub fn setup(self, delta: Block) -> Sender<state::Extension> {
        Sender {
            config: self.config,
            state: state::Extension {
                delta,
                prg: Prg::new(),
                exec: ExecutionId::default(),
                extended: false,
            },
        }
    }
}

impl Sender<state::Extension> {
    /// Returns the sender's correlation.
    pub fn delta(&self) -> Block {
        self.state.delta
    }

    /// Runs one execution: expands a fresh tree and blinds its per-level
    /// aggregates against the receiver's mask bits.
    ///
    /// Returns the wire messages, in sending order, and the sender's output.
    ///
    /// # Arguments
    ///
    /// * `count` - The number of correlations to produce.
    /// * `qs` - The zero-choice base-COT messages, one per tree level.
    /// * `masks` - The mask bits received from the receiver.
    pub fn extend(
        &mut self,
        count: u32,
        qs: &[Block],
        masks: &MaskBits,
    ) -> Result<(TreeCorrections, Correlation, SenderOutput), SenderError> {
        if self.state.extended {
            return Err(SenderError::InvalidState(
                "no further executions are allowed".to_string(),
            ));
        }

        if count == 0 {
            return Err(SenderError::InvalidParameter(
                "count must be at least 1".to_string(),
            ));
        }

        if count > self.config.max_count() {
            return Err(SenderError::InvalidParameter(format!(
                "count exceeds the session cap of {}",
                self.config.max_count()
            )));
        }

        let h = tree_depth(count);

        if qs.len() != h {
            return Err(SenderError::InvalidParameter(format!(
                "expected {h} base correlations, got {}",
                qs.len()
            )));
        }

        if masks.bits.len() != h {
            return Err(SenderError::MalformedPayload(format!(
                "expected {h} mask bits, got {}",
                masks.bits.len()
            )));
        }

        let delta = self.state.delta;
        let exec = self.state.exec.next_id();

        let seed = self.state.prg.random_block();
        let expansion = PprfTree::new(h).expand(seed);

        let mut leaves = expansion.leaves;
        let mut left_sums = expansion.left_sums;
        let mut right_sums = expansion.right_sums;

        // Order each pair by the receiver's blinded choice, hash with the
        // level-bound tweak, then blind the level aggregates.
        let mut pairs = Vec::with_capacity(h);
        for (i, (&q, &mask)) in qs.iter().zip(&masks.bits).enumerate() {
            let mut pair = if mask {
                [q ^ delta, q]
            } else {
                [q, q ^ delta]
            };
            let tweak: Block = bytemuck::cast([i as u64, exec.as_u64()]);
            FIXED_KEY_AES.tccr_many(&[tweak, tweak], &mut pair);
            pair[0] ^= left_sums[i];
            pair[1] ^= right_sums[i];
            pairs.push(pair);
        }

        // The aggregates must not outlive the execution.
        left_sums.zeroize();
        right_sums.zeroize();

        leaves.truncate(count as usize);

        let sum = leaves.iter().fold(delta, |acc, &x| acc ^ x);

        Ok((
            TreeCorrections { pairs },
            Correlation { sum },
            SenderOutput { delta, leaves },
        ))
    }

    /// Ends the session; no further executions are permitted.
    #[inline]
    pub fn finalize(&mut self) {
        self.state.extended = true;
    }
}

/// The sender's state.
pub mod state {
    use super::*;

    mod sealed {
        pub trait Sealed {}

        impl Sealed for super::Initialized {}
        impl Sealed for super::Extension {}
    }

    /// The sender's state.
    pub trait State: sealed::Sealed {}

    /// The sender's initial state.
    #[derive(Default)]
    pub struct Initialized {}

    impl State for Initialized {}

    opaque_debug::implement!(Initialized);

    /// The sender's state after the setup phase.
    ///
    /// In this state the sender can run executions until the session is
    /// finalized.
    pub struct Extension {
        /// Sender's correlation.
        pub(super) delta: Block,
        /// Source of fresh tree seeds.
        pub(super) prg: Prg,
        /// Current execution counter.
        pub(super) exec: ExecutionId,
        /// Set once the session is finalized.
        pub(super) extended: bool,
    }

    impl State for Extension {}

    opaque_debug::implement!(Extension);
}
