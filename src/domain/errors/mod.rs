//! # Domain Errors
//!
//! Typed error types for relay operations.
//!
//! Every failure in the pipeline is a [`RelayError`] with a stable
//! [`ErrorKind`]. Provider-originated failures keep the raw
//! [`ProviderFailure`] so it can be reported verbatim as [`ErrorDetails`].
//!
//! # Examples
//!
//! ```
//! use erc20_relayer::domain::errors::{RelayError, RelayResult};
//!
//! fn require_owner(owner: &str) -> RelayResult<&str> {
//!     if owner.is_empty() {
//!         return Err(RelayError::invalid_input("Missing owner"));
//!     }
//!     Ok(owner)
//! }
//!
//! assert!(require_owner("").is_err());
//! ```

pub mod relay_error;

pub use relay_error::{ErrorDetails, ErrorKind, ProviderFailure, RelayError, RelayResult};
