//! # Infrastructure Layer
//!
//! Adapters implementing the application ports.
//!
//! ## Blockchain
//!
//! JSON-RPC access to EVM networks through ethers-rs, plus the network and
//! token registries the adapters are configured from.

pub mod blockchain;
