//! # Relay Errors
//!
//! Failure taxonomy for the relay pipeline.
//!
//! This module provides the [`RelayError`] enum, the raw [`ProviderFailure`]
//! captured from JSON-RPC providers and signers, and the [`ErrorDetails`]
//! shape exposed to API clients.
//!
//! # Error Kinds
//!
//! | Kind | Category |
//! |------|----------|
//! | `INVALID_INPUT` | Malformed address, amount or missing field |
//! | `NOT_CONFIGURED`, `UNSUPPORTED_TOKEN` | Configuration-driven rejections |
//! | `NOT_A_CONTRACT` | No bytecode at the token address |
//! | `ALLOWANCE_TOO_LOW`, `INSUFFICIENT_BALANCE` | Owner-side business rules |
//! | `RELAYER_UNDERFUNDED` | Relayer cannot pay for gas |
//! | `RPC_ERROR`, `SUBMISSION_FAILED`, `CALL_REVERTED` | Provider failures |
//! | `MISCONFIGURED`, `UNEXPECTED` | Server-side failures |
//!
//! # Examples
//!
//! ```
//! use erc20_relayer::domain::errors::{ErrorKind, RelayError};
//!
//! let error = RelayError::invalid_input("Invalid owner address");
//! assert_eq!(error.kind(), ErrorKind::InvalidInput);
//! assert!(error.details().is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Provider Failure
// ============================================================================

/// A failure reported by a JSON-RPC provider or a signer, kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderFailure {
    /// Provider error code (JSON-RPC code or client-side code).
    pub code: Option<String>,
    /// Short provider message, usually the JSON-RPC `message`.
    pub short_message: Option<String>,
    /// Decoded revert reason, when the call reverted with `Error(string)`.
    pub reason: Option<String>,
    /// Full error text.
    pub message: String,
    /// Raw error payload attached by the provider.
    pub data: Option<serde_json::Value>,
}

impl ProviderFailure {
    /// Creates a failure carrying only a message.
    #[must_use]
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Sets the provider code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the short message.
    #[must_use]
    pub fn with_short_message(mut self, short_message: impl Into<String>) -> Self {
        self.short_message = Some(short_message.into());
        self
    }

    /// Sets the revert reason.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Sets the raw data payload.
    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Returns the most specific human-readable description available:
    /// the revert reason, then the short message, then the full message.
    #[must_use]
    pub fn headline(&self) -> &str {
        self.reason
            .as_deref()
            .or(self.short_message.as_deref())
            .filter(|s| !s.is_empty())
            .unwrap_or(self.message.as_str())
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// ============================================================================
// Error Details
// ============================================================================

/// Structured diagnostics attached to failed responses.
///
/// Every field is optional; absent fields are omitted from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    /// Provider error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short provider message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_message: Option<String>,
    /// Revert reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Full error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Raw error payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl From<&ProviderFailure> for ErrorDetails {
    fn from(failure: &ProviderFailure) -> Self {
        Self {
            code: failure.code.clone(),
            short_message: failure.short_message.clone(),
            reason: failure.reason.clone(),
            message: Some(failure.message.clone()).filter(|m| !m.is_empty()),
            data: failure.data.clone(),
        }
    }
}

// ============================================================================
// Error Kind
// ============================================================================

/// Stable, machine-readable category of a [`RelayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed or missing input.
    InvalidInput,
    /// Network unknown or without RPC endpoint.
    NotConfigured,
    /// Token symbol absent from the network's table.
    UnsupportedToken,
    /// Token address holds no bytecode.
    NotAContract,
    /// Owner approved less than the requested value.
    AllowanceTooLow,
    /// Owner holds less than the requested value.
    InsufficientBalance,
    /// Relayer cannot cover gas.
    RelayerUnderfunded,
    /// Read-only RPC call failed.
    RpcError,
    /// Transaction could not be sent or confirmed.
    SubmissionFailed,
    /// Call reverted.
    CallReverted,
    /// Server-side configuration is missing or invalid.
    Misconfigured,
    /// Anything else.
    Unexpected,
}

impl ErrorKind {
    /// Returns the kind as its wire string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::NotConfigured => "NOT_CONFIGURED",
            Self::UnsupportedToken => "UNSUPPORTED_TOKEN",
            Self::NotAContract => "NOT_A_CONTRACT",
            Self::AllowanceTooLow => "ALLOWANCE_TOO_LOW",
            Self::InsufficientBalance => "INSUFFICIENT_BALANCE",
            Self::RelayerUnderfunded => "RELAYER_UNDERFUNDED",
            Self::RpcError => "RPC_ERROR",
            Self::SubmissionFailed => "SUBMISSION_FAILED",
            Self::CallReverted => "CALL_REVERTED",
            Self::Misconfigured => "MISCONFIGURED",
            Self::Unexpected => "UNEXPECTED",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Relay Error
// ============================================================================

/// Failure of a relay operation.
///
/// Display strings are the user-facing `error` messages returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// Malformed address, amount, or missing field.
    #[error("{0}")]
    InvalidInput(String),

    /// Network unknown, or no RPC endpoint configured for it.
    #[error("{0}")]
    NotConfigured(String),

    /// Token symbol not present in the network's token table.
    #[error("Token {token} not supported on {network}")]
    UnsupportedToken {
        /// Requested symbol.
        token: String,
        /// Network name.
        network: String,
    },

    /// No contract bytecode at the token address.
    #[error("Address {address} has no contract bytecode on {network}")]
    NotAContract {
        /// Token address.
        address: String,
        /// Network name.
        network: String,
    },

    /// Owner's allowance to the relayer is below the requested value.
    #[error("Allowance too low. Approved: {approved}")]
    AllowanceTooLow {
        /// Approved amount in token units.
        approved: String,
    },

    /// Owner's token balance is below the requested value.
    #[error("Owner balance too low: {balance}")]
    InsufficientBalance {
        /// Owner balance in token units.
        balance: String,
    },

    /// Relayer cannot pay for gas.
    #[error("{message}")]
    RelayerUnderfunded {
        /// Description including required and available amounts when known.
        message: String,
        /// Provider failure that revealed the condition, if any.
        cause: Option<ProviderFailure>,
    },

    /// A read-only RPC call failed.
    #[error("RPC call {operation} failed: {cause}")]
    Rpc {
        /// Name of the failed call.
        operation: String,
        /// Provider failure.
        cause: ProviderFailure,
    },

    /// Sending or confirming the transaction failed.
    #[error("{}", .0.headline())]
    SubmissionFailed(ProviderFailure),

    /// The call reverted.
    #[error("{}", .0.headline())]
    CallReverted(ProviderFailure),

    /// Server-side configuration is missing or invalid.
    #[error("{0}")]
    Misconfigured(String),

    /// Unclassified failure.
    #[error("{}", .0.headline())]
    Unexpected(ProviderFailure),
}

impl RelayError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a not configured error.
    #[must_use]
    pub fn not_configured(message: impl Into<String>) -> Self {
        Self::NotConfigured(message.into())
    }

    /// Creates an unsupported token error.
    #[must_use]
    pub fn unsupported_token(token: impl Into<String>, network: impl fmt::Display) -> Self {
        Self::UnsupportedToken {
            token: token.into(),
            network: network.to_string(),
        }
    }

    /// Creates a not-a-contract error.
    #[must_use]
    pub fn not_a_contract(address: impl Into<String>, network: impl fmt::Display) -> Self {
        Self::NotAContract {
            address: address.into(),
            network: network.to_string(),
        }
    }

    /// Creates a relayer underfunded error from known amounts.
    #[must_use]
    pub fn relayer_underfunded(required: impl fmt::Display, available: impl fmt::Display) -> Self {
        Self::RelayerUnderfunded {
            message: format!(
                "Relayer balance too low for gas: required {required}, available {available}"
            ),
            cause: None,
        }
    }

    /// Creates an RPC error.
    #[must_use]
    pub fn rpc(operation: impl Into<String>, cause: ProviderFailure) -> Self {
        Self::Rpc {
            operation: operation.into(),
            cause,
        }
    }

    /// Creates a misconfiguration error.
    #[must_use]
    pub fn misconfigured(message: impl Into<String>) -> Self {
        Self::Misconfigured(message.into())
    }

    /// Returns the stable category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::NotConfigured(_) => ErrorKind::NotConfigured,
            Self::UnsupportedToken { .. } => ErrorKind::UnsupportedToken,
            Self::NotAContract { .. } => ErrorKind::NotAContract,
            Self::AllowanceTooLow { .. } => ErrorKind::AllowanceTooLow,
            Self::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            Self::RelayerUnderfunded { .. } => ErrorKind::RelayerUnderfunded,
            Self::Rpc { .. } => ErrorKind::RpcError,
            Self::SubmissionFailed(_) => ErrorKind::SubmissionFailed,
            Self::CallReverted(_) => ErrorKind::CallReverted,
            Self::Misconfigured(_) => ErrorKind::Misconfigured,
            Self::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// Returns the underlying provider failure, if any.
    #[must_use]
    pub fn provider_failure(&self) -> Option<&ProviderFailure> {
        match self {
            Self::Rpc { cause, .. } => Some(cause),
            Self::RelayerUnderfunded { cause, .. } => cause.as_ref(),
            Self::SubmissionFailed(cause) | Self::CallReverted(cause) | Self::Unexpected(cause) => {
                Some(cause)
            }
            _ => None,
        }
    }

    /// Returns the structured diagnostics for provider-originated failures.
    #[must_use]
    pub fn details(&self) -> Option<ErrorDetails> {
        self.provider_failure().map(ErrorDetails::from)
    }
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;
