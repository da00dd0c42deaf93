//! # Domain Layer
//!
//! Core relay rules, independent of transport and chain access.
//!
//! This layer contains:
//! - **Entities**: Transfer requests, token metadata, allowance state and fee plans
//! - **Value Objects**: Networks, addresses, amounts and the transfer lifecycle
//! - **Errors**: The relay failure taxonomy
//! - **Services**: Authorization, fee planning and error classification

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;
