//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! - [`Network`]: Supported EVM networks
//! - [`address`]: EIP-55 aware address checks
//! - [`amount`]: Decimal amount validation, scaling and formatting
//! - [`TransferStage`]: Relay request lifecycle

pub mod address;
pub mod amount;
pub mod network;
pub mod transfer_stage;

pub use address::{checksummed, is_valid_address, parse_address};
pub use amount::{format_units, is_valid_amount, scale_amount};
pub use network::Network;
pub use transfer_stage::TransferStage;
