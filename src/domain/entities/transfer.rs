//! # Transfer Entities
//!
//! Inputs and per-request chain snapshots of a relayed `transferFrom`.
//!
//! # Examples
//!
//! ```
//! use erc20_relayer::domain::entities::transfer::AllowanceState;
//! use ethers::types::U256;
//!
//! let state = AllowanceState::new(U256::MAX, U256::from(10));
//! assert!(state.is_unlimited());
//! assert!(state.covers(U256::from(1_000_000)));
//! ```

use crate::domain::value_objects::Network;
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};

// ============================================================================
// Transfer Request
// ============================================================================

/// A request to move `amount` of a token from `owner` using the relayer's allowance.
///
/// Fields are kept as received; validation happens in the relay pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Token symbol or contract address.
    pub token: String,
    /// Owner address that granted the allowance.
    pub owner: String,
    /// Human-readable decimal amount.
    pub amount: String,
    /// Target network.
    pub network: Network,
    /// Optional explicit recipient.
    pub recipient: Option<String>,
}

impl TransferRequest {
    /// Creates a request without an explicit recipient.
    #[must_use]
    pub fn new(
        token: impl Into<String>,
        owner: impl Into<String>,
        amount: impl Into<String>,
        network: Network,
    ) -> Self {
        Self {
            token: token.into(),
            owner: owner.into(),
            amount: amount.into(),
            network,
            recipient: None,
        }
    }

    /// Sets the recipient.
    #[must_use]
    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    /// Returns the recipient if present and non-blank.
    #[must_use]
    pub fn explicit_recipient(&self) -> Option<&str> {
        self.recipient
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

// ============================================================================
// Token Metadata
// ============================================================================

/// On-chain token metadata, read fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    /// Contract address.
    pub address: Address,
    /// Token symbol.
    pub symbol: String,
    /// Number of decimals.
    pub decimals: u8,
}

// ============================================================================
// Allowance State
// ============================================================================

/// Owner's allowance to the relayer and token balance at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowanceState {
    allowance: U256,
    owner_balance: U256,
    unlimited: bool,
}

impl AllowanceState {
    /// Creates a snapshot; an allowance of `2^256 - 1` is unlimited.
    #[must_use]
    pub fn new(allowance: U256, owner_balance: U256) -> Self {
        Self {
            allowance,
            owner_balance,
            unlimited: allowance == U256::MAX,
        }
    }

    /// Raw allowance.
    #[inline]
    #[must_use]
    pub fn allowance(&self) -> U256 {
        self.allowance
    }

    /// Owner token balance.
    #[inline]
    #[must_use]
    pub fn owner_balance(&self) -> U256 {
        self.owner_balance
    }

    /// True for the unlimited-approval sentinel.
    #[inline]
    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        self.unlimited
    }

    /// True if the allowance permits moving `value`.
    #[must_use]
    pub fn covers(&self, value: U256) -> bool {
        self.unlimited || self.allowance >= value
    }

    /// True if the owner holds at least `value`.
    #[must_use]
    pub fn balance_covers(&self, value: U256) -> bool {
        self.owner_balance >= value
    }
}

// ============================================================================
// Transfer Call
// ============================================================================

/// A fully resolved `transferFrom(from, to, value)` call on `token`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferCall {
    /// Token contract.
    pub token: Address,
    /// Owner the tokens move from.
    pub from: Address,
    /// Recipient.
    pub to: Address,
    /// Amount in base units.
    pub value: U256,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_sentinel() {
        let state = AllowanceState::new(U256::MAX, U256::zero());
        assert!(state.is_unlimited());
        assert!(state.covers(U256::MAX));
        assert!(!state.balance_covers(U256::one()));
    }

    #[test]
    fn limited_allowance() {
        let state = AllowanceState::new(U256::from(100), U256::from(500));
        assert!(!state.is_unlimited());
        assert!(state.covers(U256::from(100)));
        assert!(!state.covers(U256::from(101)));
        assert!(state.balance_covers(U256::from(500)));
    }

    #[test]
    fn blank_recipient_is_ignored() {
        let request = TransferRequest::new("USDT", "0xabc", "1", Network::Sepolia).with_recipient("  ");
        assert_eq!(request.explicit_recipient(), None);

        let request = request.with_recipient(" 0xdef ");
        assert_eq!(request.explicit_recipient(), Some("0xdef"));
    }
}
