//! Errors raised by the SSP-COT protocol cores.

/// Errors that can occur when using the SSP-COT sender.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum SenderError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Errors that can occur when using the SSP-COT receiver.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum ReceiverError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    #[error("consistency check failed")]
    ConsistencyCheckFailed,
}

/// Errors that can occur when manipulating protocol outputs.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum OutputError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("incompatible batches: {0}")]
    Incompatible(String),
}
