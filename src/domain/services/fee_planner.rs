//! # Fee Planner
//!
//! Fee derivation and relayer funding checks.
//!
//! # Examples
//!
//! ```
//! use erc20_relayer::domain::services::fee_planner::fee_data_from_base_fee;
//! use ethers::types::U256;
//!
//! let fees = fee_data_from_base_fee(U256::from(10), U256::from(1));
//! assert_eq!(fees.max_fee_per_gas, Some(U256::from(21)));
//! ```

use crate::domain::entities::{FeeData, FeePlan};
use crate::domain::errors::{RelayError, RelayResult};
use crate::domain::value_objects::format_units;
use ethers::types::U256;

/// Decimals of every supported chain's native currency.
pub const NATIVE_DECIMALS: u8 = 18;

/// Default priority fee: 1 gwei.
pub const DEFAULT_PRIORITY_FEE_WEI: u64 = 1_000_000_000;

/// EIP-1559 fee data from a block base fee: `maxFee = 2 × baseFee + priority`.
#[must_use]
pub fn fee_data_from_base_fee(base_fee: U256, priority_fee: U256) -> FeeData {
    let max_fee = base_fee.saturating_mul(U256::from(2)).saturating_add(priority_fee);
    FeeData::eip1559(max_fee, priority_fee)
}

/// Fails when the relayer's native balance cannot cover the planned cost.
///
/// Passes when the cost is unknown (no estimate or no price).
///
/// # Errors
///
/// Returns `RelayError::RelayerUnderfunded` with required and available
/// amounts in native units.
pub fn ensure_relayer_funded(plan: &FeePlan, native_balance: U256) -> RelayResult<()> {
    match plan.required_native() {
        Some(required) if native_balance < required => Err(RelayError::relayer_underfunded(
            format_units(required, NATIVE_DECIMALS),
            format_units(native_balance, NATIVE_DECIMALS),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;

    fn gwei(n: u64) -> U256 {
        U256::from(n) * U256::exp10(9)
    }

    #[test]
    fn max_fee_doubles_base_fee() {
        let fees = fee_data_from_base_fee(gwei(20), gwei(1));
        assert_eq!(fees.max_fee_per_gas, Some(gwei(41)));
        assert_eq!(fees.max_priority_fee_per_gas, Some(gwei(1)));
        assert_eq!(fees.gas_price, None);
    }

    #[test]
    fn underfunded_relayer_is_rejected() {
        let plan = FeePlan::from_fee_data(Some(U256::from(100_000)), &FeeData::legacy(gwei(10)));
        // 100_000 gas * 10 gwei = 0.001 ETH
        let err = ensure_relayer_funded(&plan, gwei(500_000)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RelayerUnderfunded);
        assert_eq!(
            err.to_string(),
            "Relayer balance too low for gas: required 0.001, available 0.0005"
        );
    }

    #[test]
    fn funded_relayer_passes() {
        let plan = FeePlan::from_fee_data(Some(U256::from(100_000)), &FeeData::legacy(gwei(10)));
        assert!(ensure_relayer_funded(&plan, gwei(1_000_000)).is_ok());
    }

    #[test]
    fn unknown_cost_passes() {
        let plan = FeePlan::from_fee_data(None, &FeeData::legacy(gwei(10)));
        assert!(ensure_relayer_funded(&plan, U256::zero()).is_ok());
    }
}
