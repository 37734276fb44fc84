//! Implementations of single-point correlated oblivious transfer over an
//! async I/O channel.
//!
//! Two variants of the protocol are provided behind the shared
//! [`SspcotSender`]/[`SspcotReceiver`] traits: a semi-honest one
//! ([`semi_honest`]) and a malicious-secure one ([`malicious`]) which adds a
//! consistency check before any output is released. Base correlations are
//! consumed through the [`RandomCotSender`]/[`RandomCotReceiver`] provider
//! traits.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

use async_trait::async_trait;

use pprf_core::Block;

mod error;
#[cfg(any(test, feature = "ideal"))]
pub mod ideal;
pub mod malicious;
pub mod semi_honest;

pub use error::{ReceiverError, SenderError};
pub use pprf_ot_core::output::{
    RcotReceiverOutput, RcotSenderOutput, ReceiverOutput, SenderOutput,
};

/// An SSP-COT error.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum OTError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error("sender error: {0}")]
    SenderError(Box<dyn std::error::Error + Send + Sync>),
    #[error("receiver error: {0}")]
    ReceiverError(Box<dyn std::error::Error + Send + Sync>),
}

/// A provider of random correlated OTs, sender side.
#[async_trait]
pub trait RandomCotSender<Io> {
    /// Obtains the zero-choice messages of `count` random correlated OTs.
    ///
    /// # Arguments
    ///
    /// * `io` - The I/O channel to the peer.
    /// * `count` - The number of correlations.
    async fn send_random_correlated(
        &mut self,
        io: &mut Io,
        count: usize,
    ) -> Result<RcotSenderOutput, OTError>;
}

/// A provider of random correlated OTs, receiver side.
#[async_trait]
pub trait RandomCotReceiver<Io> {
    /// Obtains random choice bits and the chosen messages of `count` random
    /// correlated OTs.
    ///
    /// # Arguments
    ///
    /// * `io` - The I/O channel to the peer.
    /// * `count` - The number of correlations.
    async fn receive_random_correlated(
        &mut self,
        io: &mut Io,
        count: usize,
    ) -> Result<RcotReceiverOutput, OTError>;
}

/// An SSP-COT sender.
#[async_trait]
pub trait SspcotSender<Io> {
    /// Runs the one-time session setup.
    ///
    /// # Arguments
    ///
    /// * `io` - The I/O channel to the receiver.
    /// * `delta` - The sender's correlation, which must match the base-COT
    ///   correlation.
    async fn setup(&mut self, io: &mut Io, delta: Block) -> Result<(), OTError>;

    /// Runs one execution, producing `count` correlated values.
    ///
    /// # Arguments
    ///
    /// * `io` - The I/O channel to the receiver.
    /// * `count` - The number of correlations to produce.
    async fn send(&mut self, io: &mut Io, count: u32) -> Result<SenderOutput, OTError>;
}

/// An SSP-COT receiver.
#[async_trait]
pub trait SspcotReceiver<Io> {
    /// Runs the one-time session setup.
    ///
    /// # Arguments
    ///
    /// * `io` - The I/O channel to the sender.
    async fn setup(&mut self, io: &mut Io) -> Result<(), OTError>;

    /// Runs one execution, producing `count` values punctured at `alpha`.
    ///
    /// # Arguments
    ///
    /// * `io` - The I/O channel to the sender.
    /// * `alpha` - The secret punctured index.
    /// * `count` - The number of correlations to produce.
    async fn receive(
        &mut self,
        io: &mut Io,
        alpha: u32,
        count: u32,
    ) -> Result<ReceiverOutput, OTError>;
}
