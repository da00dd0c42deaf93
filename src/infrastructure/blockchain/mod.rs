//! # Blockchain Access
//!
//! Network registry, token tables and the ethers-rs chain client.

pub mod client;
pub mod connector;
pub mod erc20;
pub mod registry;
pub mod tokens;

pub use client::{EvmClient, HttpProvider, provider_failure};
pub use connector::EthersConnector;
pub use registry::{NetworkConfig, NetworkRegistry};
pub use tokens::{TokenRegistry, TokenTable};
