//! # Token Info Use Case
//!
//! Reads a token's symbol and the owner's allowance to the configured spender.

use crate::application::ports::ChainConnector;
use crate::domain::errors::{RelayError, RelayResult};
use crate::domain::value_objects::{Network, format_units, parse_address};
use crate::infrastructure::blockchain::NetworkRegistry;
use ethers::types::Address;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Token info query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfoRequest {
    /// Token symbol or contract address.
    pub token: String,
    /// Owner whose allowance is read.
    pub owner: String,
    /// Target network.
    pub network: Network,
}

/// Token symbol and formatted allowance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    /// Token symbol.
    pub symbol: String,
    /// Allowance granted to the spender, in token units.
    pub allowance: String,
    /// Token decimals.
    pub decimals: u8,
    /// Spender the allowance was read for.
    pub spender: Address,
}

/// Use case for reading token info.
#[derive(Debug)]
pub struct TokenInfoUseCase {
    registry: Arc<NetworkRegistry>,
    connector: Arc<dyn ChainConnector>,
    spender: Option<Address>,
}

impl TokenInfoUseCase {
    /// Creates a new TokenInfoUseCase.
    ///
    /// `spender` falls back to the relayer address when `None`.
    #[must_use]
    pub fn new(
        registry: Arc<NetworkRegistry>,
        connector: Arc<dyn ChainConnector>,
        spender: Option<Address>,
    ) -> Self {
        let spender = spender.or_else(|| connector.relayer_address());
        Self {
            registry,
            connector,
            spender,
        }
    }

    /// Reads the token's symbol and the owner's allowance.
    ///
    /// Read-only: repeated calls with unchanged chain state return the same
    /// result.
    ///
    /// # Errors
    ///
    /// - `RelayError::InvalidInput` for a malformed owner or blank token
    /// - `RelayError::NotConfigured` / `RelayError::UnsupportedToken`
    /// - `RelayError::Misconfigured` when no spender can be determined
    /// - `RelayError::Rpc` when a read fails
    #[instrument(skip(self, request), fields(network = %request.network, token = %request.token))]
    pub async fn execute(&self, request: TokenInfoRequest) -> RelayResult<TokenInfo> {
        let network = self.registry.resolve(request.network)?;
        let owner = parse_address("owner", &request.owner)?;
        let token = network.resolve_token_address(&request.token)?;
        let spender = self
            .spender
            .ok_or_else(|| RelayError::misconfigured("Spender address not configured"))?;

        let chain = self.connector.reader(&network).await?;
        let (symbol, decimals, allowance) = tokio::try_join!(
            chain.symbol(token),
            chain.decimals(token),
            chain.allowance(token, owner, spender),
        )?;

        debug!(symbol = %symbol, decimals, allowance = %allowance, "token info read");

        Ok(TokenInfo {
            symbol,
            allowance: format_units(allowance, decimals),
            decimals,
            spender,
        })
    }
}
