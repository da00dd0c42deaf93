//! # Network Value Object
//!
//! Supported EVM networks.
//!
//! # Examples
//!
//! ```
//! use erc20_relayer::domain::value_objects::network::Network;
//!
//! let network: Network = "Sepolia".parse().unwrap();
//! assert_eq!(network, Network::Sepolia);
//! assert_eq!(network.to_string(), "sepolia");
//! ```

use crate::domain::errors::RelayError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An EVM network the relayer can submit to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Ethereum Sepolia testnet.
    Sepolia,
    /// Ethereum mainnet.
    Ethereum,
    /// Polygon PoS.
    Polygon,
    /// Arbitrum One.
    Arbitrum,
    /// BNB Smart Chain.
    Bnb,
    /// Base.
    Base,
}

impl Network {
    /// Every supported network, in display order.
    pub const ALL: [Self; 6] = [
        Self::Sepolia,
        Self::Ethereum,
        Self::Polygon,
        Self::Arbitrum,
        Self::Bnb,
        Self::Base,
    ];

    /// Returns the lowercase network key.
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sepolia => "sepolia",
            Self::Ethereum => "ethereum",
            Self::Polygon => "polygon",
            Self::Arbitrum => "arbitrum",
            Self::Bnb => "bnb",
            Self::Base => "base",
        }
    }

    /// Returns the EIP-155 chain id.
    ///
    /// ```
    /// use erc20_relayer::domain::value_objects::network::Network;
    ///
    /// assert_eq!(Network::Sepolia.chain_id(), 11_155_111);
    /// ```
    #[inline]
    #[must_use]
    pub const fn chain_id(&self) -> u64 {
        match self {
            Self::Sepolia => 11_155_111,
            Self::Ethereum => 1,
            Self::Polygon => 137,
            Self::Arbitrum => 42_161,
            Self::Bnb => 56,
            Self::Base => 8_453,
        }
    }

    /// Returns the environment variables that may carry this network's RPC URL,
    /// in lookup order.
    ///
    /// ```
    /// use erc20_relayer::domain::value_objects::network::Network;
    ///
    /// assert_eq!(Network::Bnb.rpc_env_vars()[0], "BNB_RPC_URL");
    /// ```
    #[must_use]
    pub fn rpc_env_vars(&self) -> [String; 3] {
        let upper = self.as_str().to_uppercase();
        [
            format!("{upper}_RPC_URL"),
            format!("RPC_{upper}"),
            format!("NEXT_PUBLIC_RPC_{upper}"),
        ]
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sepolia" => Ok(Self::Sepolia),
            "ethereum" | "mainnet" => Ok(Self::Ethereum),
            "polygon" => Ok(Self::Polygon),
            "arbitrum" => Ok(Self::Arbitrum),
            "bnb" | "bsc" => Ok(Self::Bnb),
            "base" => Ok(Self::Base),
            _ => Err(RelayError::not_configured(format!(
                "Unsupported network: {s}"
            ))),
        }
    }
}
