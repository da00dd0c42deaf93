//! # Network Registry
//!
//! Resolves network names to their RPC endpoint and token table.
//!
//! A network is usable only when it has both a token table and an RPC URL.
//! The registry is immutable after construction and shared across requests.
//!
//! # Examples
//!
//! ```
//! use erc20_relayer::domain::value_objects::Network;
//! use erc20_relayer::infrastructure::blockchain::{NetworkRegistry, TokenRegistry};
//! use std::collections::BTreeMap;
//!
//! let rpc_urls = BTreeMap::from([(Network::Sepolia, "https://rpc.sepolia.example".to_string())]);
//! let registry = NetworkRegistry::new(TokenRegistry::with_default_tokens(), rpc_urls);
//!
//! let sepolia = registry.resolve_network("sepolia").unwrap();
//! assert!(sepolia.resolve_token_address("USDC").is_ok());
//! assert!(registry.resolve_network("polygon").is_err());
//! ```

use super::tokens::{TokenRegistry, TokenTable};
use crate::config::AppConfig;
use crate::domain::errors::{RelayError, RelayResult};
use crate::domain::value_objects::{Network, is_valid_address};
use ethers::types::Address;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

/// A network ready for relaying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Network.
    pub network: Network,
    /// JSON-RPC endpoint.
    pub rpc_url: String,
    /// Known tokens.
    pub tokens: TokenTable,
}

impl NetworkConfig {
    /// Resolves a token given as a contract address or a symbol.
    ///
    /// A well-formed address is used as is. Input shaped like an address
    /// (`0x` plus 40 characters) that fails validation is rejected; anything
    /// else is looked up as an uppercase symbol.
    ///
    /// # Errors
    ///
    /// - `RelayError::InvalidInput` if `token` is blank or a malformed address
    /// - `RelayError::UnsupportedToken` if the symbol is unknown on this network
    pub fn resolve_token_address(&self, token: &str) -> RelayResult<Address> {
        let token = token.trim();
        if token.is_empty() {
            return Err(RelayError::invalid_input("Missing token"));
        }

        if is_valid_address(token)
            && let Ok(address) = Address::from_str(token)
        {
            return Ok(address);
        }

        if token.len() == 42 && (token.starts_with("0x") || token.starts_with("0X")) {
            return Err(RelayError::invalid_input("Invalid token address"));
        }

        self.tokens
            .get(token)
            .ok_or_else(|| RelayError::unsupported_token(token.to_uppercase(), self.network))
    }
}

/// Immutable lookup of configured networks.
#[derive(Debug, Clone, Default)]
pub struct NetworkRegistry {
    tokens: TokenRegistry,
    rpc_urls: BTreeMap<Network, String>,
    networks: BTreeMap<Network, Arc<NetworkConfig>>,
}

impl NetworkRegistry {
    /// Builds the registry from token tables and RPC endpoints.
    #[must_use]
    pub fn new(tokens: TokenRegistry, rpc_urls: BTreeMap<Network, String>) -> Self {
        let networks = rpc_urls
            .iter()
            .filter_map(|(network, rpc_url)| {
                let table = tokens.table(*network)?;
                let config = NetworkConfig {
                    network: *network,
                    rpc_url: rpc_url.clone(),
                    tokens: table.clone(),
                };
                Some((*network, Arc::new(config)))
            })
            .collect();

        Self {
            tokens,
            rpc_urls,
            networks,
        }
    }

    /// Builds the registry from validated application configuration.
    ///
    /// Built-in token tables are extended with each network's configured tokens.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let mut tokens = TokenRegistry::with_default_tokens();
        let mut rpc_urls = BTreeMap::new();

        for network in Network::ALL {
            let Some(settings) = config.network(network) else {
                continue;
            };
            for (symbol, address) in &settings.tokens {
                if let Ok(address) = Address::from_str(address.trim()) {
                    tokens.register(network, symbol, address);
                }
            }
            if let Some(url) = settings.rpc_url.as_deref().map(str::trim)
                && !url.is_empty()
            {
                rpc_urls.insert(network, url.to_string());
            }
        }

        Self::new(tokens, rpc_urls)
    }

    /// Resolves a network by name.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::NotConfigured` if the name is unknown, the network
    /// has no token table, or no RPC URL is configured for it.
    pub fn resolve_network(&self, name: &str) -> RelayResult<Arc<NetworkConfig>> {
        let network = Network::from_str(name)?;
        self.resolve(network)
    }

    /// Resolves a known network.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::NotConfigured` if the network has no token table or
    /// no RPC URL.
    pub fn resolve(&self, network: Network) -> RelayResult<Arc<NetworkConfig>> {
        if let Some(config) = self.networks.get(&network) {
            return Ok(Arc::clone(config));
        }

        if self.tokens.table(network).is_none() {
            Err(RelayError::not_configured(format!(
                "Unsupported network: {network}"
            )))
        } else {
            Err(RelayError::not_configured(format!(
                "No RPC URL configured for network {network}"
            )))
        }
    }

    /// RPC endpoint per supported network, `None` where unconfigured.
    #[must_use]
    pub fn rpc_endpoints(&self) -> BTreeMap<Network, Option<String>> {
        Network::ALL
            .into_iter()
            .map(|network| (network, self.rpc_urls.get(&network).cloned()))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::NetworkSettings;
    use crate::domain::errors::ErrorKind;

    const USDT: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";

    fn registry() -> NetworkRegistry {
        NetworkRegistry::new(
            TokenRegistry::with_default_tokens(),
            BTreeMap::from([
                (Network::Ethereum, "https://eth.example".to_string()),
                (Network::Sepolia, "https://sepolia.example".to_string()),
            ]),
        )
    }

    #[test]
    fn resolve_configured_network() {
        let config = registry().resolve_network("Ethereum").unwrap();
        assert_eq!(config.network, Network::Ethereum);
        assert_eq!(config.rpc_url, "https://eth.example");
    }

    #[test]
    fn missing_rpc_is_not_configured() {
        let err = registry().resolve(Network::Polygon).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotConfigured);
        assert_eq!(err.to_string(), "No RPC URL configured for network polygon");
    }

    #[test]
    fn missing_token_table_is_not_configured() {
        let registry = NetworkRegistry::new(
            TokenRegistry::new(),
            BTreeMap::from([(Network::Base, "https://base.example".to_string())]),
        );
        let err = registry.resolve(Network::Base).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported network: base");
    }

    #[test]
    fn unknown_network_name() {
        let err = registry().resolve_network("fantom").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotConfigured);
    }

    #[test]
    fn token_by_symbol_or_address() {
        let ethereum = registry().resolve(Network::Ethereum).unwrap();
        let by_symbol = ethereum.resolve_token_address("usdt").unwrap();
        let by_address = ethereum.resolve_token_address(USDT).unwrap();
        assert_eq!(by_symbol, by_address);

        // any valid address is accepted, listed or not
        let sepolia = registry().resolve(Network::Sepolia).unwrap();
        assert_eq!(sepolia.resolve_token_address(USDT).unwrap(), by_address);
    }

    #[test]
    fn unsupported_token() {
        let sepolia = registry().resolve(Network::Sepolia).unwrap();
        let err = sepolia.resolve_token_address("wbtc").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedToken);
        assert_eq!(err.to_string(), "Token WBTC not supported on sepolia");

        let err = sepolia.resolve_token_address(" ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn bad_checksum_address_is_invalid_input() {
        let ethereum = registry().resolve(Network::Ethereum).unwrap();
        let err = ethereum
            .resolve_token_address("0xdac17F958D2ee523a2206206994597C13D831ec7")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.to_string(), "Invalid token address");

        let err = ethereum
            .resolve_token_address("0xZZC17F958D2ee523a2206206994597C13D831ec7")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn rpc_endpoints_cover_every_network() {
        let endpoints = registry().rpc_endpoints();
        assert_eq!(endpoints.len(), Network::ALL.len());
        assert_eq!(endpoints[&Network::Ethereum].as_deref(), Some("https://eth.example"));
        assert_eq!(endpoints[&Network::Bnb], None);
    }

    #[test]
    fn from_config_merges_tokens_and_rpc() {
        let mut config = AppConfig::default();
        config.networks.insert(
            "polygon".to_string(),
            NetworkSettings {
                rpc_url: Some("https://polygon.example".to_string()),
                tokens: BTreeMap::from([(
                    "aave".to_string(),
                    "0xD6DF932A45C0f255f85145f286eA0b292B21C90B".to_string(),
                )]),
            },
        );
        config
            .networks
            .insert("bnb".to_string(), NetworkSettings::default());

        let registry = NetworkRegistry::from_config(&config);
        let polygon = registry.resolve(Network::Polygon).unwrap();
        assert!(polygon.resolve_token_address("AAVE").is_ok());
        assert!(polygon.resolve_token_address("WMATIC").is_ok());
        assert_eq!(registry.resolve(Network::Bnb).unwrap_err().kind(), ErrorKind::NotConfigured);
    }
}
