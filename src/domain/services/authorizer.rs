//! # Transfer Authorizer
//!
//! Decides whether a relayed transfer may proceed.
//!
//! Checks run in a fixed order: contract existence, then allowance, then
//! balance. The first failing check wins.

use crate::domain::entities::{AllowanceState, TokenMetadata};
use crate::domain::errors::{RelayError, RelayResult};
use crate::domain::value_objects::{Network, checksummed, format_units};
use ethers::types::{Address, U256};

/// Fails with `NotAContract` when the token address holds no bytecode.
///
/// # Errors
///
/// Returns `RelayError::NotAContract` if `has_code` is false.
pub fn require_contract(token: &Address, network: Network, has_code: bool) -> RelayResult<()> {
    if has_code {
        Ok(())
    } else {
        Err(RelayError::not_a_contract(checksummed(token), network))
    }
}

/// Authorizes moving `value` base units of `token`.
///
/// An unlimited allowance skips the allowance test but never the balance test.
///
/// # Errors
///
/// - `RelayError::AllowanceTooLow` with the approved amount in token units
/// - `RelayError::InsufficientBalance` with the owner balance in token units
pub fn authorize(token: &TokenMetadata, state: &AllowanceState, value: U256) -> RelayResult<()> {
    if !state.covers(value) {
        return Err(RelayError::AllowanceTooLow {
            approved: format_units(state.allowance(), token.decimals),
        });
    }

    if !state.balance_covers(value) {
        return Err(RelayError::InsufficientBalance {
            balance: format_units(state.owner_balance(), token.decimals),
        });
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;

    fn token(decimals: u8) -> TokenMetadata {
        TokenMetadata {
            address: Address::repeat_byte(0x11),
            symbol: "TKN".to_string(),
            decimals,
        }
    }

    #[test]
    fn allowance_too_low_reports_approved_amount() {
        let state = AllowanceState::new(U256::from(100), U256::from(1_000));
        let err = authorize(&token(0), &state, U256::from(150)).unwrap_err();
        assert_eq!(
            err,
            RelayError::AllowanceTooLow {
                approved: "100".to_string()
            }
        );
    }

    #[test]
    fn insufficient_balance_after_allowance() {
        let state = AllowanceState::new(U256::from(1_000), U256::from(50));
        let err = authorize(&token(0), &state, U256::from(150)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientBalance);
        assert_eq!(err.to_string(), "Owner balance too low: 50");
    }

    #[test]
    fn allowance_checked_before_balance() {
        let state = AllowanceState::new(U256::from(10), U256::from(5));
        let err = authorize(&token(0), &state, U256::from(150)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AllowanceTooLow);
    }

    #[test]
    fn unlimited_allowance_still_checks_balance() {
        let state = AllowanceState::new(U256::MAX, U256::from(50));
        let err = authorize(&token(0), &state, U256::from(150)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientBalance);

        let state = AllowanceState::new(U256::MAX, U256::from(150));
        assert!(authorize(&token(0), &state, U256::from(150)).is_ok());
    }

    #[test]
    fn amounts_formatted_with_decimals() {
        let state = AllowanceState::new(U256::from(1_500_000u64), U256::from(10_000_000u64));
        let err = authorize(&token(6), &state, U256::from(2_000_000u64)).unwrap_err();
        assert_eq!(err.to_string(), "Allowance too low. Approved: 1.5");
    }

    #[test]
    fn exact_amounts_pass() {
        let state = AllowanceState::new(U256::from(150), U256::from(150));
        assert!(authorize(&token(0), &state, U256::from(150)).is_ok());
    }

    #[test]
    fn missing_bytecode_is_not_a_contract() {
        let address = Address::repeat_byte(0x22);
        let err = require_contract(&address, Network::Sepolia, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAContract);
        assert!(err.to_string().ends_with("has no contract bytecode on sepolia"));
        assert!(require_contract(&address, Network::Sepolia, true).is_ok());
    }
}
