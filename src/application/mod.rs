//! # Application Layer
//!
//! Use case orchestration over the domain rules and chain ports.
//!
//! ## Use Cases
//!
//! - [`RelayTransferUseCase`]: Validate, authorize, plan fees and submit a `transferFrom`
//! - [`TokenInfoUseCase`]: Read a token's symbol and an owner's allowance
//!
//! ## Ports
//!
//! - [`ChainConnector`]: Opens per-request chain access
//! - [`ChainReader`], [`TransferSubmitter`]: Read-only and signing chain access

pub mod error;
pub mod ports;
pub mod use_cases;

pub use error::{ApplicationResult, TransferFailure};
pub use ports::{ChainConnector, ChainReader, TransferSubmitter};
pub use use_cases::{
    RelaySettings, RelayTransferUseCase, TokenInfo, TokenInfoRequest, TokenInfoUseCase,
    TransferResult,
};
