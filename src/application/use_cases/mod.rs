//! # Use Cases
//!
//! Application use cases implementing the relay workflows.
//!
//! Each use case resolves the network, validates input, then drives the
//! chain ports.

pub mod relay_transfer;
pub mod token_info;


pub use relay_transfer::{RelaySettings, RelayTransferUseCase, TransferResult};
pub use token_info::{TokenInfo, TokenInfoRequest, TokenInfoUseCase};
