//! # Domain Entities
//!
//! Per-request relay data.
//!
//! - [`TransferRequest`]: What the caller asked for
//! - [`TokenMetadata`], [`AllowanceState`]: Chain snapshots read per request
//! - [`TransferCall`]: The resolved `transferFrom` call
//! - [`FeeData`], [`FeePlan`]: Fee inputs and chosen overrides

pub mod fees;
pub mod transfer;

pub use fees::{FeeData, FeePlan};
pub use transfer::{AllowanceState, TokenMetadata, TransferCall, TransferRequest};
