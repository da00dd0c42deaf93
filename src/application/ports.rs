//! # Chain Ports
//!
//! Traits the use cases need from the chain access layer.
//!
//! Implementations wrap provider failures as `RelayError::Rpc` for reads and
//! as classified submission errors for writes.

use crate::domain::entities::{FeeData, FeePlan, TransferCall};
use crate::domain::errors::RelayResult;
use crate::infrastructure::blockchain::NetworkConfig;
use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use std::fmt;
use std::sync::Arc;

/// Read-only chain access.
#[async_trait]
pub trait ChainReader: Send + Sync + fmt::Debug {
    /// ERC-20 `symbol()`.
    async fn symbol(&self, token: Address) -> RelayResult<String>;

    /// ERC-20 `decimals()`.
    async fn decimals(&self, token: Address) -> RelayResult<u8>;

    /// ERC-20 `allowance(owner, spender)`.
    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> RelayResult<U256>;

    /// ERC-20 `balanceOf(owner)`.
    async fn balance_of(&self, token: Address, owner: Address) -> RelayResult<U256>;

    /// True if `address` holds contract bytecode.
    async fn has_contract_code(&self, address: Address) -> RelayResult<bool>;

    /// Current fee data.
    async fn fee_data(&self) -> RelayResult<FeeData>;

    /// Chain id reported by the endpoint.
    async fn chain_id(&self) -> RelayResult<u64>;

    /// Native currency balance.
    async fn native_balance(&self, address: Address) -> RelayResult<U256>;
}

/// Chain access through the relayer's signing wallet.
#[async_trait]
pub trait TransferSubmitter: ChainReader {
    /// Address of the relayer wallet.
    fn relayer_address(&self) -> Address;

    /// Estimates gas for `call` sent from the relayer.
    async fn estimate_transfer_gas(&self, call: &TransferCall) -> RelayResult<U256>;

    /// Signs and broadcasts `call` with the plan's overrides.
    async fn send_transfer(&self, call: &TransferCall, plan: &FeePlan) -> RelayResult<H256>;

    /// Waits for one confirmation and returns the block number, or `None`
    /// when the provider returned no receipt.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::CallReverted` when the receipt reports failure.
    async fn wait_for_confirmation(&self, tx_hash: H256) -> RelayResult<Option<u64>>;
}

/// Opens chain access for a network. Called once per request.
#[async_trait]
pub trait ChainConnector: Send + Sync + fmt::Debug {
    /// Read-only access.
    async fn reader(&self, network: &NetworkConfig) -> RelayResult<Arc<dyn ChainReader>>;

    /// Signing access.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Misconfigured` when no relayer key is configured.
    async fn submitter(&self, network: &NetworkConfig) -> RelayResult<Arc<dyn TransferSubmitter>>;

    /// Address derived from the configured relayer key, if any.
    fn relayer_address(&self) -> Option<Address>;
}
