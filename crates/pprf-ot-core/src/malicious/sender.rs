//! SSP-COT sender, malicious-secure variant.

use itybity::ToBits;
use pprf_core::{aes::AesEncryptor, hash::Hash, Block};
use zeroize::Zeroize;

use crate::{
    config::Config,
    error::SenderError,
    msgs::{CheckFromReceiver, CheckFromSender, Correlation, MaskBits, PrfKey, TreeCorrections},
    output::SenderOutput,
    semi_honest, ExecutionId, CSP,
};

use super::{derive_chis, monomials, weighted_sum};

/// Malicious-secure SSP-COT sender.
#[derive(Debug, Default)]
pub struct Sender<T: state::State = state::Initialized> {
    state: T,
}

impl Sender {
    /// Creates a new sender.
    pub fn new(config: Config) -> Self {
        Self {
            state: state::Initialized {
                inner: semi_honest::sender::Sender::new(config),
            },
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
            state: state::Extension {
                inner: self.state.inner.setup(delta),
                prf: None,
                unchecked: None,
                exec: ExecutionId::default(),
            },
        }
    }
}

impl Sender<state::Extension> {
    /// Returns the sender's correlation.
    pub fn delta(&self) -> Block {
        self.state.inner.delta()
    }

    /// Installs the receiver's PRF key. Must be called once per session,
    /// before the first execution.
    pub fn receive_prf_key(&mut self, msg: PrfKey) -> Result<(), SenderError> {
        if self.state.prf.is_some() {
            return Err(SenderError::InvalidState(
                "the PRF key is already set".to_string(),
            ));
        }

        self.state.prf = Some(AesEncryptor::new(msg.key));

        Ok(())
    }

    /// Runs the extension part of one execution. The output is withheld
    /// until [`Sender::check`] completes.
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
    ) -> Result<(TreeCorrections, Correlation), SenderError> {
        if self.state.prf.is_none() {
            return Err(SenderError::InvalidState(
                "the PRF key must be set before extending".to_string(),
            ));
        }

        if self.state.unchecked.is_some() {
            return Err(SenderError::InvalidState(
                "the pending execution must be checked first".to_string(),
            ));
        }

        let (corrections, correlation, output) = self.state.inner.extend(count, qs, masks)?;

        self.state.unchecked = Some(output);

        Ok((corrections, correlation))
    }

    /// Runs the consistency check and releases the withheld output.
    ///
    /// # Arguments
    ///
    /// * `y_star` - The zero-choice check-OT messages.
    /// * `check` - The check message received from the receiver.
    pub fn check(
        &mut self,
        y_star: &[Block],
        check: CheckFromReceiver,
    ) -> Result<(SenderOutput, CheckFromSender), SenderError> {
        if y_star.len() != CSP {
            return Err(SenderError::InvalidParameter(format!(
                "expected {CSP} check correlations, got {}",
                y_star.len()
            )));
        }

        let Some(output) = self.state.unchecked.take() else {
            return Err(SenderError::InvalidState(
                "no pending execution to check".to_string(),
            ));
        };

        let exec = self.state.exec.next_id();

        let Some(prf) = self.state.prf.as_ref() else {
            return Err(SenderError::InvalidState(
                "the PRF key must be set before checking".to_string(),
            ));
        };

        let delta = output.delta;
        let CheckFromReceiver { x_prime } = check;

        // y = y* XOR x' * delta, folded into one field element.
        let mut ys: Vec<Block> = y_star
            .iter()
            .zip(x_prime.iter_lsb0())
            .map(|(&y, masked)| if masked { y ^ delta } else { y })
            .collect();

        let mut v = Block::gf_dot(&ys, &monomials());

        let mut chis = derive_chis(prf, exec, output.leaves.len());
        v ^= weighted_sum(&chis, &output.leaves);

        let digest = Hash::of(&v.to_bytes());

        ys.zeroize();
        chis.zeroize();
        v.zeroize();

        Ok((output, CheckFromSender { digest }))
    }

    /// Ends the session; no further executions are permitted.
    #[inline]
    pub fn finalize(&mut self) {
        self.state.inner.finalize();
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
    pub struct Initialized {
        pub(super) inner: semi_honest::sender::Sender,
    }

    impl State for Initialized {}

    opaque_debug::implement!(Initialized);

    /// The sender's state after the setup phase.
    ///
    /// In this state the sender alternates executions and consistency
    /// checks until the session is finalized.
    pub struct Extension {
        /// The semi-honest core.
        pub(super) inner: semi_honest::sender::Sender<semi_honest::sender::state::Extension>,
        /// The random-oracle PRF, keyed by the receiver.
        pub(super) prf: Option<AesEncryptor>,
        /// The output withheld until its check completes.
        pub(super) unchecked: Option<SenderOutput>,
        /// Current check counter.
        pub(super) exec: ExecutionId,
    }

    impl State for Extension {}

    opaque_debug::implement!(Extension);
}
