//! # Token Registry
//!
//! Token symbol to address tables per network.
//!
//! Built once at startup from the built-in tables plus any extra tokens in
//! configuration, then shared read-only.

use crate::domain::value_objects::Network;
use ethers::types::Address;
use std::collections::BTreeMap;
use std::str::FromStr;

const SEPOLIA_TOKENS: &[(&str, &str)] = &[
    ("USDT", "0x03bbb5660b8687c2aa453a0e42dcb6e0732b1266"),
    ("USDC", "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238"),
];

const ETHEREUM_TOKENS: &[(&str, &str)] = &[
    ("USDT", "0xdAC17F958D2ee523a2206206994597C13D831ec7"),
    ("USDC", "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
    ("WETH", "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
    ("DAI", "0x6B175474E89094C44Da98b954EedeAC495271d0F"),
    ("UNI", "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984"),
    ("LINK", "0x514910771AF9Ca656af840dff83E8264EcF986CA"),
    ("WBTC", "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599"),
];

const POLYGON_TOKENS: &[(&str, &str)] = &[
    ("USDT", "0xc2132D05D31c914a87C6611C10748AEb04B58e8F"),
    ("USDC", "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174"),
    ("WETH", "0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619"),
    ("DAI", "0x8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063"),
    ("WMATIC", "0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270"),
];

const ARBITRUM_TOKENS: &[(&str, &str)] = &[
    ("USDT", "0xFd086bC7CD5C481DCC9C85ebE478A1C0b69FCbb9"),
    ("USDC", "0xFF970A61A04b1cA14834A43f5dE4533eBDDB5CC8"),
    ("WETH", "0x82aF49447D8a07e3bd95BD0d56f35241523fBab1"),
    ("ARB", "0x912CE59144191C1204E64559FE8253a0e49E6548"),
];

const BNB_TOKENS: &[(&str, &str)] = &[
    ("USDT", "0x55d398326f99059fF775485246999027B3197955"),
    ("USDC", "0x8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d"),
    ("WBNB", "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c"),
    ("BUSD", "0xe9e7CEA3DedcA5984780Bafc599bD69ADd087D56"),
];

const BASE_TOKENS: &[(&str, &str)] = &[
    ("USDC", "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"),
    ("WETH", "0x4200000000000000000000000000000000000006"),
];

const fn default_table(network: Network) -> &'static [(&'static str, &'static str)] {
    match network {
        Network::Sepolia => SEPOLIA_TOKENS,
        Network::Ethereum => ETHEREUM_TOKENS,
        Network::Polygon => POLYGON_TOKENS,
        Network::Arbitrum => ARBITRUM_TOKENS,
        Network::Bnb => BNB_TOKENS,
        Network::Base => BASE_TOKENS,
    }
}

/// Symbol to address table for one network. Symbols are stored uppercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenTable {
    tokens: BTreeMap<String, Address>,
}

impl TokenTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a token.
    pub fn insert(&mut self, symbol: &str, address: Address) {
        self.tokens.insert(symbol.trim().to_uppercase(), address);
    }

    /// Looks up a symbol, case-insensitively.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<Address> {
        self.tokens.get(&symbol.trim().to_uppercase()).copied()
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Token tables for every network.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tables: BTreeMap<Network, TokenTable>,
}

impl TokenRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in token tables.
    #[must_use]
    pub fn with_default_tokens() -> Self {
        let mut registry = Self::new();
        for network in Network::ALL {
            let table = registry.tables.entry(network).or_default();
            for (symbol, address) in default_table(network) {
                if let Ok(address) = Address::from_str(address) {
                    table.insert(symbol, address);
                }
            }
        }
        registry
    }

    /// Registers a token on a network, creating the table if needed.
    pub fn register(&mut self, network: Network, symbol: &str, address: Address) {
        self.tables.entry(network).or_default().insert(symbol, address);
    }

    /// Returns the table for a network.
    #[must_use]
    pub fn table(&self, network: Network) -> Option<&TokenTable> {
        self.tables.get(&network)
    }
}
