//! # Fee Entities
//!
//! Network fee data and the per-transaction fee plan.
//!
//! A [`FeePlan`] carries either an EIP-1559 fee pair or a legacy gas price,
//! never both. A plan with neither leaves pricing to the provider.

use ethers::types::U256;

/// Fee data reported by the network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeData {
    /// Legacy gas price.
    pub gas_price: Option<U256>,
    /// EIP-1559 max fee per gas.
    pub max_fee_per_gas: Option<U256>,
    /// EIP-1559 priority fee per gas.
    pub max_priority_fee_per_gas: Option<U256>,
}

impl FeeData {
    /// Fee data for an EIP-1559 network.
    #[must_use]
    pub fn eip1559(max_fee_per_gas: U256, max_priority_fee_per_gas: U256) -> Self {
        Self {
            gas_price: None,
            max_fee_per_gas: Some(max_fee_per_gas),
            max_priority_fee_per_gas: Some(max_priority_fee_per_gas),
        }
    }

    /// Fee data for a legacy-priced network.
    #[must_use]
    pub fn legacy(gas_price: U256) -> Self {
        Self {
            gas_price: Some(gas_price),
            ..Self::default()
        }
    }

    /// True when `maxFeePerGas` is known.
    #[inline]
    #[must_use]
    pub fn supports_eip1559(&self) -> bool {
        self.max_fee_per_gas.is_some()
    }
}

/// Transaction overrides chosen for a submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeePlan {
    gas_limit: Option<U256>,
    max_fee_per_gas: Option<U256>,
    max_priority_fee_per_gas: Option<U256>,
    gas_price: Option<U256>,
}

impl FeePlan {
    /// Plan with no overrides; the provider fills gas and pricing.
    #[must_use]
    pub fn provider_defaults() -> Self {
        Self::default()
    }

    /// Builds a plan from an optional gas estimate and network fee data.
    ///
    /// EIP-1559 fields win when `maxFeePerGas` is present; otherwise the
    /// legacy gas price is used.
    #[must_use]
    pub fn from_fee_data(gas_limit: Option<U256>, fees: &FeeData) -> Self {
        if fees.supports_eip1559() {
            Self {
                gas_limit,
                max_fee_per_gas: fees.max_fee_per_gas,
                max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
                gas_price: None,
            }
        } else {
            Self {
                gas_limit,
                max_fee_per_gas: None,
                max_priority_fee_per_gas: None,
                gas_price: fees.gas_price,
            }
        }
    }

    /// Explicit gas limit.
    #[inline]
    #[must_use]
    pub fn gas_limit(&self) -> Option<U256> {
        self.gas_limit
    }

    /// EIP-1559 max fee per gas.
    #[inline]
    #[must_use]
    pub fn max_fee_per_gas(&self) -> Option<U256> {
        self.max_fee_per_gas
    }

    /// EIP-1559 priority fee per gas.
    #[inline]
    #[must_use]
    pub fn max_priority_fee_per_gas(&self) -> Option<U256> {
        self.max_priority_fee_per_gas
    }

    /// Legacy gas price.
    #[inline]
    #[must_use]
    pub fn gas_price(&self) -> Option<U256> {
        self.gas_price
    }

    /// True if the plan is EIP-1559 priced.
    #[inline]
    #[must_use]
    pub fn is_eip1559(&self) -> bool {
        self.max_fee_per_gas.is_some()
    }

    /// Per-gas price used for funding checks.
    #[must_use]
    pub fn effective_price(&self) -> Option<U256> {
        self.max_fee_per_gas.or(self.gas_price)
    }

    /// Worst-case native cost `gas × price`, when both are known.
    #[must_use]
    pub fn required_native(&self) -> Option<U256> {
        let gas = self.gas_limit?;
        let price = self.effective_price()?;
        Some(gas.saturating_mul(price))
    }
}
