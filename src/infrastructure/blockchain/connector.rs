//! # Ethers Connector
//!
//! Opens [`EvmClient`]s for configured networks.
//!
//! A fresh provider is built for every request; the relayer wallet is parsed
//! once at startup and bound to the network's chain id on each use.

use super::client::{EvmClient, HttpProvider};
use super::registry::NetworkConfig;
use crate::application::ports::{ChainConnector, ChainReader, TransferSubmitter};
use crate::domain::errors::{RelayError, RelayResult};
use async_trait::async_trait;
use ethers::prelude::*;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Provider polling interval while waiting for receipts.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// [`ChainConnector`] backed by ethers-rs HTTP providers.
#[derive(Clone)]
pub struct EthersConnector {
    wallet: Option<LocalWallet>,
    priority_fee: U256,
}

impl EthersConnector {
    /// Creates a connector.
    ///
    /// # Arguments
    ///
    /// * `private_key` - Hex relayer key, with or without `0x`; `None` for read-only
    /// * `priority_fee_wei` - Priority fee per gas for EIP-1559 networks
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Misconfigured` if the key cannot be parsed.
    pub fn new(private_key: Option<&str>, priority_fee_wei: u64) -> RelayResult<Self> {
        let wallet = private_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| {
                let key = key.strip_prefix("0x").unwrap_or(key);
                key.parse::<LocalWallet>()
                    .map_err(|_| RelayError::misconfigured("Invalid relayer private key"))
            })
            .transpose()?;

        Ok(Self {
            wallet,
            priority_fee: U256::from(priority_fee_wei),
        })
    }

    fn provider(&self, network: &NetworkConfig) -> RelayResult<HttpProvider> {
        Provider::<Http>::try_from(network.rpc_url.as_str())
            .map(|provider| provider.interval(POLL_INTERVAL))
            .map_err(|e| {
                RelayError::misconfigured(format!(
                    "Invalid RPC URL for network {}: {e}",
                    network.network
                ))
            })
    }
}

impl fmt::Debug for EthersConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EthersConnector")
            .field("relayer", &self.relayer_address())
            .field("priority_fee", &self.priority_fee)
            .finish()
    }
}

#[async_trait]
impl ChainConnector for EthersConnector {
    async fn reader(&self, network: &NetworkConfig) -> RelayResult<Arc<dyn ChainReader>> {
        let provider = self.provider(network)?;
        Ok(Arc::new(EvmClient::new(
            provider,
            network.network,
            self.priority_fee,
        )))
    }

    async fn submitter(&self, network: &NetworkConfig) -> RelayResult<Arc<dyn TransferSubmitter>> {
        let wallet = self
            .wallet
            .clone()
            .ok_or_else(|| RelayError::misconfigured("Relayer private key not configured"))?
            .with_chain_id(network.network.chain_id());
        let provider = self.provider(network)?;

        Ok(Arc::new(EvmClient::new(
            SignerMiddleware::new(provider, wallet),
            network.network,
            self.priority_fee,
        )))
    }

    fn relayer_address(&self) -> Option<Address> {
        self.wallet.as_ref().map(Signer::address)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;
    use crate::domain::value_objects::Network;
    use crate::infrastructure::blockchain::TokenTable;

    const KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn sepolia(rpc_url: &str) -> NetworkConfig {
        NetworkConfig {
            network: Network::Sepolia,
            rpc_url: rpc_url.to_string(),
            tokens: TokenTable::new(),
        }
    }

    #[test]
    fn parses_key_with_or_without_prefix() {
        let with = EthersConnector::new(Some(KEY), 1).unwrap();
        let without = EthersConnector::new(Some(&KEY[2..]), 1).unwrap();
        assert!(with.relayer_address().is_some());
        assert_eq!(with.relayer_address(), without.relayer_address());
    }

    #[test]
    fn blank_key_is_read_only() {
        let connector = EthersConnector::new(Some("  "), 1).unwrap();
        assert_eq!(connector.relayer_address(), None);
        assert_eq!(EthersConnector::new(None, 1).unwrap().relayer_address(), None);
    }

    #[test]
    fn rejects_malformed_key() {
        let err = EthersConnector::new(Some("0x1234"), 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Misconfigured);
    }

    #[test]
    fn debug_omits_key() {
        let connector = EthersConnector::new(Some(KEY), 1).unwrap();
        let rendered = format!("{connector:?}");
        assert!(!rendered.contains(&KEY[2..]));
    }

    #[tokio::test]
    async fn submitter_requires_key() {
        let connector = EthersConnector::new(None, 1).unwrap();
        let err = connector
            .submitter(&sepolia("http://127.0.0.1:8545"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Misconfigured);
        assert_eq!(err.to_string(), "Relayer private key not configured");
    }

    #[tokio::test]
    async fn submitter_uses_relayer_wallet() {
        let connector = EthersConnector::new(Some(KEY), 1).unwrap();
        let submitter = connector
            .submitter(&sepolia("http://127.0.0.1:8545"))
            .await
            .unwrap();
        assert_eq!(Some(submitter.relayer_address()), connector.relayer_address());
    }

    #[tokio::test]
    async fn invalid_rpc_url_is_misconfigured() {
        let connector = EthersConnector::new(None, 1).unwrap();
        let err = connector.reader(&sepolia("not a url")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Misconfigured);
    }
}
