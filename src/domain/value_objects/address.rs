//! # Address Validation
//!
//! Format checks for EVM account addresses.
//!
//! An address is accepted when it is `0x` followed by 40 hex digits and is
//! either single-case or carries a valid EIP-55 checksum.

use crate::domain::errors::{RelayError, RelayResult};
use ethers::types::Address;
use ethers::utils::to_checksum;
use std::str::FromStr;

/// Returns true if `input` is a well-formed address.
///
/// Mixed-case input must match its EIP-55 checksum.
///
/// ```
/// use erc20_relayer::domain::value_objects::address::is_valid_address;
///
/// assert!(is_valid_address("0xdAC17F958D2ee523a2206206994597C13D831ec7"));
/// assert!(is_valid_address("0xdac17f958d2ee523a2206206994597c13d831ec7"));
/// assert!(!is_valid_address("0xdAC17F958D2ee523a2206206994597C13D831EC7"));
/// assert!(!is_valid_address("dac17f958d2ee523a2206206994597c13d831ec7"));
/// ```
#[must_use]
pub fn is_valid_address(input: &str) -> bool {
    let Some(hex_part) = input.strip_prefix("0x") else {
        return false;
    };

    if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return false;
    }

    let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return true;
    }

    match Address::from_str(input) {
        Ok(address) => to_checksum(&address, None) == input,
        Err(_) => false,
    }
}

/// Parses an address, naming `field` in the error message.
///
/// # Errors
///
/// Returns `RelayError::InvalidInput` if the address is malformed.
pub fn parse_address(field: &str, input: &str) -> RelayResult<Address> {
    let input = input.trim();
    if !is_valid_address(input) {
        return Err(RelayError::invalid_input(format!("Invalid {field} address")));
    }

    Address::from_str(input).map_err(|_| RelayError::invalid_input(format!("Invalid {field} address")))
}

/// Formats an address with its EIP-55 checksum.
#[must_use]
pub fn checksummed(address: &Address) -> String {
    to_checksum(address, None)
}
