use crate::OTError;

/// An SSP-COT sender error.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs, clippy::enum_variant_names)]
pub enum SenderError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error(transparent)]
    CoreError(#[from] pprf_ot_core::error::SenderError),
    #[error("{0}")]
    StateError(String),
}

impl From<SenderError> for OTError {
    fn from(err: SenderError) -> Self {
        match err {
            SenderError::IOError(e) => e.into(),
            e => OTError::SenderError(Box::new(e)),
        }
    }
}

impl From<crate::semi_honest::sender::StateError> for SenderError {
    fn from(err: crate::semi_honest::sender::StateError) -> Self {
        SenderError::StateError(err.to_string())
    }
}

impl From<crate::malicious::sender::StateError> for SenderError {
    fn from(err: crate::malicious::sender::StateError) -> Self {
        SenderError::StateError(err.to_string())
    }
}

/// An SSP-COT receiver error.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs, clippy::enum_variant_names)]
pub enum ReceiverError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error(transparent)]
    CoreError(#[from] pprf_ot_core::error::ReceiverError),
    #[error("{0}")]
    StateError(String),
}

impl From<ReceiverError> for OTError {
    fn from(err: ReceiverError) -> Self {
        match err {
            ReceiverError::IOError(e) => e.into(),
            e => OTError::ReceiverError(Box::new(e)),
        }
    }
}

impl From<crate::semi_honest::receiver::StateError> for ReceiverError {
    fn from(err: crate::semi_honest::receiver::StateError) -> Self {
        ReceiverError::StateError(err.to_string())
    }
}

impl From<crate::malicious::receiver::StateError> for ReceiverError {
    fn from(err: crate::malicious::receiver::StateError) -> Self {
        ReceiverError::StateError(err.to_string())
    }
}
