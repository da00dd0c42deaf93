//! # Error Classifier
//!
//! Maps raw provider and signer failures onto the relay error taxonomy.
//!
//! Classification never fails: every input yields a [`RelayError`] whose
//! details carry the original code, short message, reason, message and data.

use crate::domain::errors::{ProviderFailure, RelayError};

const INSUFFICIENT_FUNDS_CODE: &str = "INSUFFICIENT_FUNDS";
const CALL_EXCEPTION_CODE: &str = "CALL_EXCEPTION";
/// JSON-RPC error code used by nodes for `execution reverted`.
const EXECUTION_REVERTED_RPC_CODE: &str = "3";

/// True if the failure reports that the sender cannot pay for gas.
#[must_use]
pub fn is_insufficient_funds(failure: &ProviderFailure) -> bool {
    failure.code.as_deref() == Some(INSUFFICIENT_FUNDS_CODE)
        || mentions(failure, "insufficient funds")
}

/// True if the failure is a contract revert.
#[must_use]
pub fn is_revert(failure: &ProviderFailure) -> bool {
    matches!(
        failure.code.as_deref(),
        Some(CALL_EXCEPTION_CODE | EXECUTION_REVERTED_RPC_CODE)
    ) || failure.reason.is_some()
        || mentions(failure, "revert")
}

fn mentions(failure: &ProviderFailure, needle: &str) -> bool {
    failure.message.to_lowercase().contains(needle)
        || failure
            .short_message
            .as_deref()
            .is_some_and(|m| m.to_lowercase().contains(needle))
}

fn underfunded(failure: ProviderFailure) -> RelayError {
    RelayError::RelayerUnderfunded {
        message: format!("Relayer cannot pay for gas: {}", failure.headline()),
        cause: Some(failure),
    }
}

/// Classifies a failure raised outside transaction submission.
#[must_use]
pub fn classify(failure: ProviderFailure) -> RelayError {
    if is_insufficient_funds(&failure) {
        underfunded(failure)
    } else if is_revert(&failure) {
        RelayError::CallReverted(failure)
    } else {
        RelayError::Unexpected(failure)
    }
}

/// Classifies a failure raised while sending or confirming a transaction.
///
/// Unrecognized failures become `SubmissionFailed` rather than `Unexpected`.
#[must_use]
pub fn classify_submission(failure: ProviderFailure) -> RelayError {
    match classify(failure) {
        RelayError::Unexpected(failure) => RelayError::SubmissionFailed(failure),
        other => other,
    }
}
