//! # Domain Services
//!
//! Stateless relay rules.
//!
//! - [`authorizer`]: Contract existence, allowance and balance checks
//! - [`fee_planner`]: Fee derivation and relayer funding
//! - [`error_classifier`]: Provider failure classification

pub mod authorizer;
pub mod error_classifier;
pub mod fee_planner;

pub use authorizer::{authorize, require_contract};
pub use error_classifier::{classify, classify_submission, is_insufficient_funds, is_revert};
pub use fee_planner::{NATIVE_DECIMALS, ensure_relayer_funded, fee_data_from_base_fee};
