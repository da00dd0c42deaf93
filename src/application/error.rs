//! # Application Errors
//!
//! Error types for the application layer.
//!
//! A relay request that fails is reported as a [`TransferFailure`]: the
//! underlying [`RelayError`] together with the last lifecycle stage the
//! request reached.

use crate::domain::errors::{ErrorKind, RelayError};
use crate::domain::value_objects::TransferStage;
use thiserror::Error;

/// Failure of a relay request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error}")]
pub struct TransferFailure {
    /// Last stage reached before the failure.
    pub stage: TransferStage,
    /// What went wrong.
    #[source]
    pub error: RelayError,
}

impl TransferFailure {
    /// Creates a failure at `stage`.
    #[must_use]
    pub fn new(stage: TransferStage, error: RelayError) -> Self {
        Self { stage, error }
    }

    /// Category of the underlying error.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

impl From<TransferFailure> for RelayError {
    fn from(failure: TransferFailure) -> Self {
        failure.error
    }
}

/// Result type for relay use cases.
pub type ApplicationResult<T> = Result<T, TransferFailure>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_relay_error() {
        let failure = TransferFailure::new(
            TransferStage::MetadataFetched,
            RelayError::AllowanceTooLow {
                approved: "1".to_string(),
            },
        );
        assert_eq!(failure.to_string(), "Allowance too low. Approved: 1");
        assert_eq!(failure.kind(), ErrorKind::AllowanceTooLow);
    }

    #[test]
    fn converts_back_into_relay_error() {
        let failure = TransferFailure::new(TransferStage::Received, RelayError::invalid_input("bad"));
        let error: RelayError = failure.into();
        assert_eq!(error, RelayError::invalid_input("bad"));
    }
}
