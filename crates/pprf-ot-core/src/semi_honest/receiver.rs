//! SSP-COT receiver, semi-honest variant.

use itybity::ToBits;
use pprf_core::{aes::FIXED_KEY_AES, pprf::PprfTree, Block};
use zeroize::Zeroize;

use crate::{
    config::Config,
    error::ReceiverError,
    msgs::{Correlation, MaskBits, TreeCorrections},
    output::ReceiverOutput,
    tree_depth, ExecutionId,
};

/// One execution awaiting its correction messages.
struct Pending {
    count: u32,
    alpha: u32,
}

/// SSP-COT receiver.
#[derive(Debug, Default)]
pub struct Receiver<T: state::State = state::Initialized> {
    config: Config,
    state: T,
}

impl Receiver {
    /// Creates a new receiver.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: state::Initialized::default(),
        }
    }

    /// Completes the setup phase.
    pub fn setup(self) -> Receiver<state::Extension> {
        Receiver {
            config: self.config,
            state: state::Extension {
                pending: None,
                exec: ExecutionId::default(),
                extended: false,
            },
        }
    }
}

impl Receiver<state::Extension> {
    /// Starts one execution: blinds the bits of the secret index with the
    /// base-COT choice bits.
    ///
    /// # Arguments
    ///
    /// * `count` - The number of correlations to produce.
    /// * `alpha` - The secret punctured index.
    /// * `choices` - The random base-COT choice bits, one per tree level.
    pub fn mask_bits(
        &mut self,
        count: u32,
        alpha: u32,
        choices: &[bool],
    ) -> Result<MaskBits, ReceiverError> {
        if self.state.extended {
            return Err(ReceiverError::InvalidState(
                "no further executions are allowed".to_string(),
            ));
        }

        if self.state.pending.is_some() {
            return Err(ReceiverError::InvalidState(
                "the pending execution must be reconstructed first".to_string(),
            ));
        }

        if count == 0 {
            return Err(ReceiverError::InvalidParameter(
                "count must be at least 1".to_string(),
            ));
        }

        if count > self.config.max_count() {
            return Err(ReceiverError::InvalidParameter(format!(
                "count exceeds the session cap of {}",
                self.config.max_count()
            )));
        }

        if alpha >= count {
            return Err(ReceiverError::InvalidParameter(format!(
                "the punctured index {alpha} must be less than {count}"
            )));
        }

        let h = tree_depth(count);

        if choices.len() != h {
            return Err(ReceiverError::InvalidParameter(format!(
                "expected {h} base choice bits, got {}",
                choices.len()
            )));
        }

        // bits[i] = alpha_i XOR r_i XOR 1
        let bits: Vec<bool> = alpha
            .iter_msb0()
            .skip(32 - h)
            .zip(choices)
            .map(|(a, &r)| a == r)
            .collect();

        self.state.pending = Some(Pending { count, alpha });

        Ok(MaskBits { bits })
    }

    /// Finishes the execution: rebuilds every leaf off the secret path and
    /// derives the missing one from the correlation value.
    ///
    /// # Arguments
    ///
    /// * `ts` - The chosen base-COT messages, one per tree level.
    /// * `corrections` - The correction pairs received from the sender.
    /// * `correlation` - The correlation value received from the sender.
    pub fn reconstruct(
        &mut self,
        ts: &[Block],
        corrections: &TreeCorrections,
        correlation: &Correlation,
    ) -> Result<ReceiverOutput, ReceiverError> {
        let Some(Pending { count, alpha }) = self.state.pending.take() else {
            return Err(ReceiverError::InvalidState(
                "mask bits must be produced first".to_string(),
            ));
        };

        let h = tree_depth(count);

        if ts.len() != h {
            return Err(ReceiverError::InvalidParameter(format!(
                "expected {h} base messages, got {}",
                ts.len()
            )));
        }

        if corrections.pairs.len() != h {
            return Err(ReceiverError::MalformedPayload(format!(
                "expected {h} correction pairs, got {}",
                corrections.pairs.len()
            )));
        }

        let exec = self.state.exec.next_id();

        let mut leaves = if h == 0 {
            // Single-leaf tree: the only leaf is the punctured one.
            vec![Block::ZERO]
        } else {
            let alpha_bits: Vec<bool> = alpha.iter_msb0().skip(32 - h).collect();

            // Unblind, per level, the aggregate of the side off the secret
            // path.
            let mut keys: Vec<Block> = corrections
                .pairs
                .iter()
                .zip(ts)
                .zip(&alpha_bits)
                .enumerate()
                .map(|(i, (([m0, m1], &t), &a))| {
                    let tweak: Block = bytemuck::cast([i as u64, exec.as_u64()]);
                    let mask = FIXED_KEY_AES.tccr(tweak, t);
                    if a {
                        mask ^ *m0
                    } else {
                        mask ^ *m1
                    }
                })
                .collect();

            let punctured = PprfTree::new(h).reconstruct(&keys, &alpha_bits);
            debug_assert_eq!(punctured.hole, alpha as usize);

            // The recovered aggregates must not outlive the execution.
            keys.zeroize();

            let mut leaves = punctured.leaves;
            leaves.truncate(count as usize);
            leaves
        };

        // The zero placeholder at alpha drops out of the fold.
        leaves[alpha as usize] = leaves.iter().fold(correlation.sum, |acc, &x| acc ^ x);

        Ok(ReceiverOutput {
            alpha: Some(alpha),
            leaves,
        })
    }

    /// Ends the session; no further executions are permitted.
    #[inline]
    pub fn finalize(&mut self) {
        self.state.extended = true;
    }
}

/// The receiver's state.
pub mod state {
    use super::*;

    mod sealed {
        pub trait Sealed {}

        impl Sealed for super::Initialized {}
        impl Sealed for super::Extension {}
    }

    /// The receiver's state.
    pub trait State: sealed::Sealed {}

    /// The receiver's initial state.
    #[derive(Default)]
    pub struct Initialized {}

    impl State for Initialized {}

    opaque_debug::implement!(Initialized);

    /// The receiver's state after the setup phase.
    ///
    /// In this state the receiver can run executions until the session is
    /// finalized.
    pub struct Extension {
        /// The execution started by `mask_bits`, if any.
        pub(super) pending: Option<Pending>,
        /// Current execution counter.
        pub(super) exec: ExecutionId,
        /// Set once the session is finalized.
        pub(super) extended: bool,
    }

    impl State for Extension {}

    opaque_debug::implement!(Extension);
}
