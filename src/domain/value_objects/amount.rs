//! # Token Amounts
//!
//! Conversion between human-readable decimal amounts and token base units.
//!
//! Scaling truncates fractional digits beyond the token's precision instead
//! of rounding, matching fixed-point on-chain arithmetic.
//!
//! # Examples
//!
//! ```
//! use erc20_relayer::domain::value_objects::amount::{format_units, scale_amount};
//! use ethers::types::U256;
//!
//! assert_eq!(scale_amount("1.23456", 2).unwrap(), U256::from(123));
//! assert_eq!(format_units(U256::from(1_500_000u64), 6), "1.5");
//! ```

use crate::domain::errors::{RelayError, RelayResult};
use ethers::types::U256;

/// Returns true if `input` is a plain non-negative decimal number.
///
/// Accepts `"10"`, `"0.5"`, `".5"` and `"5."`. Rejects signs, exponents,
/// hex, separators and whitespace inside the number.
#[must_use]
pub fn is_valid_amount(input: &str) -> bool {
    let input = input.trim();
    let mut parts = input.splitn(2, '.');
    let integer = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();

    if integer.is_empty() && fraction.is_empty() {
        return false;
    }

    integer.chars().all(|c| c.is_ascii_digit()) && fraction.chars().all(|c| c.is_ascii_digit())
}

/// Scales a decimal amount to base units: `floor(amount * 10^decimals)`.
///
/// # Errors
///
/// Returns `RelayError::InvalidInput` if the amount is malformed or does not
/// fit in 256 bits once scaled.
pub fn scale_amount(input: &str, decimals: u8) -> RelayResult<U256> {
    if !is_valid_amount(input) {
        return Err(RelayError::invalid_input(format!("Invalid amount: {input}")));
    }

    let input = input.trim();
    let (integer, fraction) = input.split_once('.').unwrap_or((input, ""));
    let precision = usize::from(decimals);

    let mut digits = String::with_capacity(integer.len() + precision);
    digits.push_str(integer);
    digits.extend(fraction.chars().take(precision));
    digits.extend(std::iter::repeat_n('0', precision.saturating_sub(fraction.len())));

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::zero());
    }

    U256::from_dec_str(digits)
        .map_err(|_| RelayError::invalid_input(format!("Amount out of range: {input}")))
}

/// Formats base units as a decimal string with `decimals` fractional digits,
/// trimming trailing zeros.
#[must_use]
pub fn format_units(value: U256, decimals: u8) -> String {
    let raw = value.to_string();
    let precision = usize::from(decimals);
    if precision == 0 {
        return raw;
    }

    let padded = format!("{raw:0>width$}", width = precision + 1);
    let (integer, fraction) = padded.split_at(padded.len() - precision);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{integer}.{fraction}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;
    use proptest::prelude::*;

    #[test]
    fn scale_truncates_rather_than_rounds() {
        assert_eq!(scale_amount("1.23456", 2).unwrap(), U256::from(123));
        assert_eq!(scale_amount("0.999", 2).unwrap(), U256::from(99));
    }

    #[test]
    fn scale_pads_short_fractions() {
        assert_eq!(scale_amount("1.5", 6).unwrap(), U256::from(1_500_000u64));
        assert_eq!(scale_amount("150", 0).unwrap(), U256::from(150));
        assert_eq!(scale_amount(".5", 1).unwrap(), U256::from(5));
        assert_eq!(scale_amount("5.", 1).unwrap(), U256::from(50));
    }

    #[test]
    fn scale_eighteen_decimals() {
        assert_eq!(
            scale_amount("1", 18).unwrap(),
            U256::from(1_000_000_000_000_000_000u64)
        );
    }

    #[test]
    fn scale_zero() {
        assert_eq!(scale_amount("0", 18).unwrap(), U256::zero());
        assert_eq!(scale_amount("0.0000001", 2).unwrap(), U256::zero());
    }

    #[test]
    fn scale_rejects_malformed() {
        for bad in ["", ".", "-1", "+1", "1e18", "1E3", "abc", "1.2.3", "0x10", "1 000", "1,5"] {
            let err = scale_amount(bad, 18).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "input {bad:?}");
        }
    }

    #[test]
    fn scale_rejects_overflow() {
        let huge = "9".repeat(80);
        let err = scale_amount(&huge, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn format_units_trims_trailing_zeros() {
        assert_eq!(format_units(U256::from(100), 0), "100");
        assert_eq!(format_units(U256::from(1_500_000u64), 6), "1.5");
        assert_eq!(format_units(U256::from(1_000_000u64), 6), "1");
        assert_eq!(format_units(U256::from(1), 18), "0.000000000000000001");
        assert_eq!(format_units(U256::zero(), 6), "0");
    }

    #[test]
    fn format_units_max_value() {
        let formatted = format_units(U256::MAX, 18);
        assert!(formatted.starts_with("115792089237316195423570985008687907853269984665640564039457"));
        assert!(formatted.contains('.'));
    }

    proptest! {
        #[test]
        fn scale_equals_integer_part_plus_truncated_fraction(
            integer in 0u64..1_000_000_000,
            fraction in "[0-9]{0,24}",
            decimals in 0u8..=18,
        ) {
            let input = if fraction.is_empty() {
                integer.to_string()
            } else {
                format!("{integer}.{fraction}")
            };

            let kept: String = fraction
                .chars()
                .chain(std::iter::repeat('0'))
                .take(usize::from(decimals))
                .collect();
            let kept = if kept.is_empty() { U256::zero() } else { U256::from_dec_str(&kept).unwrap() };
            let expected = U256::from(integer) * U256::exp10(usize::from(decimals)) + kept;

            prop_assert_eq!(scale_amount(&input, decimals).unwrap(), expected);
        }
    }
}
