//! SSP-COT receiver, malicious-secure variant.

use itybity::FromBitIterator;
use pprf_core::{aes::AesEncryptor, hash::Hash, prg::Prg, Block};
use zeroize::Zeroize;

use crate::{
    config::Config,
    error::ReceiverError,
    msgs::{CheckFromReceiver, CheckFromSender, Correlation, MaskBits, PrfKey, TreeCorrections},
    output::ReceiverOutput,
    semi_honest, ExecutionId, CSP,
};

use super::{derive_chis, monomials, weighted_sum};

/// A consistency check awaiting the sender's digest.
struct PendingCheck {
    chis: Vec<Block>,
}

/// Malicious-secure SSP-COT receiver.
#[derive(Debug, Default)]
pub struct Receiver<T: state::State = state::Initialized> {
    state: T,
}

impl Receiver {
    /// Creates a new receiver.
    pub fn new(config: Config) -> Self {
        Self {
            state: state::Initialized {
                inner: semi_honest::receiver::Receiver::new(config),
            },
        }
    }

    /// Completes the setup phase, producing the PRF key message for the
    /// sender.
    pub fn setup(self) -> (Receiver<state::Extension>, PrfKey) {
        let key = Prg::new().random_block();

        (
            Receiver {
                state: state::Extension {
                    inner: self.state.inner.setup(),
                    prf: AesEncryptor::new(key),
                    unchecked: None,
                    check: None,
                    exec: ExecutionId::default(),
                },
            },
            PrfKey { key },
        )
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
        if self.state.unchecked.is_some() {
            return Err(ReceiverError::InvalidState(
                "the pending execution must be checked first".to_string(),
            ));
        }

        self.state.inner.mask_bits(count, alpha, choices)
    }

    /// Rebuilds the leaf vector. The output is withheld until the
    /// consistency check completes.
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
    ) -> Result<(), ReceiverError> {
        let output = self.state.inner.reconstruct(ts, corrections, correlation)?;

        self.state.unchecked = Some(output);

        Ok(())
    }

    /// Produces the check message `x' = chi_alpha XOR x*`.
    ///
    /// # Arguments
    ///
    /// * `x_star` - The random check-OT choice bits.
    pub fn check_mask(&mut self, x_star: &[bool]) -> Result<CheckFromReceiver, ReceiverError> {
        if self.state.check.is_some() {
            return Err(ReceiverError::InvalidState(
                "a check is already in progress".to_string(),
            ));
        }

        let Some(output) = self.state.unchecked.as_ref() else {
            return Err(ReceiverError::InvalidState(
                "no reconstructed execution to check".to_string(),
            ));
        };

        let count = output.leaves.len();
        let alpha = output
            .alpha
            .expect("protocol outputs always carry the punctured index");

        if x_star.len() != CSP {
            return Err(ReceiverError::InvalidParameter(format!(
                "expected {CSP} check choice bits, got {}",
                x_star.len()
            )));
        }

        let exec = self.state.exec.next_id();
        let chis = derive_chis(&self.state.prf, exec, count);

        let x_star_elem = Block::from_lsb0_iter(x_star.iter().copied());
        let x_prime = chis[alpha as usize] ^ x_star_elem;

        self.state.check = Some(PendingCheck { chis });

        Ok(CheckFromReceiver { x_prime })
    }

    /// Performs the final comparison, releasing the output on success and
    /// aborting on mismatch.
    ///
    /// # Arguments
    ///
    /// * `z_star` - The chosen check-OT messages.
    /// * `check` - The digest received from the sender.
    pub fn verify(
        &mut self,
        z_star: &[Block],
        check: CheckFromSender,
    ) -> Result<ReceiverOutput, ReceiverError> {
        if z_star.len() != CSP {
            return Err(ReceiverError::InvalidParameter(format!(
                "expected {CSP} check messages, got {}",
                z_star.len()
            )));
        }

        let Some(PendingCheck { mut chis }) = self.state.check.take() else {
            return Err(ReceiverError::InvalidState(
                "the check mask must be produced first".to_string(),
            ));
        };

        let Some(output) = self.state.unchecked.take() else {
            return Err(ReceiverError::InvalidState(
                "no reconstructed execution to verify".to_string(),
            ));
        };

        let mut w = Block::gf_dot(z_star, &monomials());
        w ^= weighted_sum(&chis, &output.leaves);

        let digest = Hash::of(&w.to_bytes());

        chis.zeroize();
        w.zeroize();

        if digest != check.digest {
            // The withheld output is discarded with this execution.
            return Err(ReceiverError::ConsistencyCheckFailed);
        }

        Ok(output)
    }

    /// Ends the session; no further executions are permitted.
    #[inline]
    pub fn finalize(&mut self) {
        self.state.inner.finalize();
    }

    #[cfg(test)]
    pub(crate) fn tamper_leaf(&mut self, index: usize, mask: Block) {
        let output = self
            .state
            .unchecked
            .as_mut()
            .expect("an execution must be reconstructed before tampering");
        output.leaves[index] ^= mask;
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
    pub struct Initialized {
        pub(super) inner: semi_honest::receiver::Receiver,
    }

    impl State for Initialized {}

    opaque_debug::implement!(Initialized);

    /// The receiver's state after the setup phase.
    ///
    /// In this state the receiver alternates executions and consistency
    /// checks until the session is finalized.
    pub struct Extension {
        /// The semi-honest core.
        pub(super) inner:
            semi_honest::receiver::Receiver<semi_honest::receiver::state::Extension>,
        /// The random-oracle PRF, keyed by this receiver.
        pub(super) prf: AesEncryptor,
        /// The output withheld until its check completes.
        pub(super) unchecked: Option<ReceiverOutput>,
        /// The check weights awaiting the sender's digest.
        pub(super) check: Option<PendingCheck>,
        /// Current check counter.
        pub(super) exec: ExecutionId,
    }

    impl State for Extension {}

    opaque_debug::implement!(Extension);
}
