//! # ERC-20 Relayer
//!
//! Backend that moves ERC-20 tokens with `transferFrom` on behalf of owners
//! who approved the relayer wallet, paying gas from the relayer.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Domain Layer** (`domain`): Networks, amounts, authorization rules, fee planning and error classification
//! - **Application Layer** (`application`): Relay and token-info use cases over chain ports
//! - **Infrastructure Layer** (`infrastructure`): Network registry, token tables and the ethers-rs client
//! - **API Layer** (`api`): REST endpoints and middleware
//!
//! ## Example
//!
//! ```rust,ignore
//! use erc20_relayer::application::use_cases::RelayTransferUseCase;
//! use erc20_relayer::domain::entities::TransferRequest;
//! use erc20_relayer::domain::value_objects::Network;
//!
//! let request = TransferRequest::new("USDC", owner, "1.5", Network::Sepolia);
//! let result = use_case.execute(request).await?;
//! println!("{:#x}", result.tx_hash);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
