//! # ERC-20 Calldata
//!
//! Encoders and decoders for the ERC-20 calls the relayer makes.
//!
//! Only the five functions the relay pipeline needs are covered. Return
//! values are decoded leniently where real tokens deviate from the standard:
//! `symbol()` may return `bytes32` instead of `string`.

use ethers::abi::{self, ParamType, Token};
use ethers::types::{Address, Bytes, U256};
use thiserror::Error;

/// `transferFrom(address,address,uint256)`
pub const TRANSFER_FROM_SELECTOR: [u8; 4] = [0x23, 0xb8, 0x72, 0xdd];
/// `allowance(address,address)`
pub const ALLOWANCE_SELECTOR: [u8; 4] = [0xdd, 0x62, 0xed, 0x3e];
/// `balanceOf(address)`
pub const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];
/// `decimals()`
pub const DECIMALS_SELECTOR: [u8; 4] = [0x31, 0x3c, 0xe5, 0x67];
/// `symbol()`
pub const SYMBOL_SELECTOR: [u8; 4] = [0x95, 0xd8, 0x9b, 0x41];
/// `Error(string)` revert payload prefix.
pub const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// Failure decoding a call's return data.
#[derive(Debug, Error)]
pub enum AbiDecodeError {
    /// The call returned no data.
    #[error("empty return data")]
    Empty,

    /// The return data is not valid ABI for the expected type.
    #[error("invalid return data: {0}")]
    Abi(#[from] abi::Error),

    /// The decoded value does not fit the target type.
    #[error("returned value out of range: {0}")]
    OutOfRange(U256),
}

// ============================================================================
// Encoding
// ============================================================================

fn calldata(selector: [u8; 4], args: &[Token]) -> Bytes {
    let encoded = abi::encode(args);
    let mut data = Vec::with_capacity(4 + encoded.len());
    data.extend_from_slice(&selector);
    data.extend_from_slice(&encoded);
    Bytes::from(data)
}

/// Encodes `allowance(owner, spender)`.
#[must_use]
pub fn encode_allowance(owner: Address, spender: Address) -> Bytes {
    calldata(
        ALLOWANCE_SELECTOR,
        &[Token::Address(owner), Token::Address(spender)],
    )
}

/// Encodes `balanceOf(owner)`.
#[must_use]
pub fn encode_balance_of(owner: Address) -> Bytes {
    calldata(BALANCE_OF_SELECTOR, &[Token::Address(owner)])
}

/// Encodes `decimals()`.
#[must_use]
pub fn encode_decimals() -> Bytes {
    calldata(DECIMALS_SELECTOR, &[])
}

/// Encodes `symbol()`.
#[must_use]
pub fn encode_symbol() -> Bytes {
    calldata(SYMBOL_SELECTOR, &[])
}

/// Encodes `transferFrom(from, to, value)`.
#[must_use]
pub fn encode_transfer_from(from: Address, to: Address, value: U256) -> Bytes {
    calldata(
        TRANSFER_FROM_SELECTOR,
        &[Token::Address(from), Token::Address(to), Token::Uint(value)],
    )
}

// ============================================================================
// Decoding
// ============================================================================

/// Decodes a single `uint256` return value.
///
/// # Errors
///
/// Returns `AbiDecodeError::Empty` for empty data and `AbiDecodeError::Abi`
/// for data shorter than one word.
pub fn decode_uint(data: &[u8]) -> Result<U256, AbiDecodeError> {
    if data.is_empty() {
        return Err(AbiDecodeError::Empty);
    }
    let mut tokens = abi::decode(&[ParamType::Uint(256)], data)?;
    tokens
        .pop()
        .and_then(Token::into_uint)
        .ok_or(AbiDecodeError::Empty)
}

/// Decodes the return value of `decimals()`.
///
/// # Errors
///
/// Returns `AbiDecodeError::OutOfRange` when the value exceeds `u8`.
pub fn decode_decimals(data: &[u8]) -> Result<u8, AbiDecodeError> {
    let value = decode_uint(data)?;
    if value > U256::from(u8::MAX) {
        return Err(AbiDecodeError::OutOfRange(value));
    }
    u8::try_from(value.low_u32()).map_err(|_| AbiDecodeError::OutOfRange(value))
}

/// Decodes the return value of `symbol()`.
///
/// Tries `string` first and falls back to a NUL-padded `bytes32`.
///
/// # Errors
///
/// Returns `AbiDecodeError::Empty` for empty data, or the `string` decoding
/// error when neither form matches.
pub fn decode_symbol(data: &[u8]) -> Result<String, AbiDecodeError> {
    if data.is_empty() {
        return Err(AbiDecodeError::Empty);
    }

    match abi::decode(&[ParamType::String], data) {
        Ok(mut tokens) => tokens
            .pop()
            .and_then(Token::into_string)
            .ok_or(AbiDecodeError::Empty),
        Err(error) => {
            let word = data.get(..32).ok_or(AbiDecodeError::Abi(error))?;
            let end = word.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
            Ok(String::from_utf8_lossy(&word[..end]).into_owned())
        }
    }
}

/// Extracts the message from an `Error(string)` revert payload.
#[must_use]
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    let payload = data.strip_prefix(&ERROR_STRING_SELECTOR[..])?;
    abi::decode(&[ParamType::String], payload)
        .ok()?
        .pop()?
        .into_string()
}

/// Finds raw revert bytes in a provider error's `data` field.
///
/// Nodes return either a hex string or an object nesting one under `data`.
#[must_use]
pub fn revert_data(value: &serde_json::Value) -> Option<Vec<u8>> {
    match value {
        serde_json::Value::String(hex) => {
            let hex = hex.strip_prefix("0x").unwrap_or(hex);
            ethers::utils::hex::decode(hex).ok()
        }
        serde_json::Value::Object(map) => map.get("data").and_then(revert_data),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn word(value: u64) -> Vec<u8> {
        abi::encode(&[Token::Uint(U256::from(value))])
    }

    #[test]
    fn transfer_from_layout() {
        let from = Address::repeat_byte(0x11);
        let to = Address::repeat_byte(0x22);
        let data = encode_transfer_from(from, to, U256::from(1_500_000));

        assert_eq!(data.len(), 4 + 3 * 32);
        assert_eq!(&data[..4], &TRANSFER_FROM_SELECTOR);
        assert_eq!(&data[16..36], from.as_bytes());
        assert_eq!(&data[48..68], to.as_bytes());
        assert_eq!(U256::from_big_endian(&data[68..100]), U256::from(1_500_000));
    }

    #[test]
    fn view_calls_carry_selectors() {
        let owner = Address::repeat_byte(0xaa);
        assert_eq!(&encode_allowance(owner, owner)[..4], &ALLOWANCE_SELECTOR);
        assert_eq!(encode_allowance(owner, owner).len(), 68);
        assert_eq!(&encode_balance_of(owner)[..4], &BALANCE_OF_SELECTOR);
        assert_eq!(encode_decimals().as_ref(), &DECIMALS_SELECTOR);
        assert_eq!(encode_symbol().as_ref(), &SYMBOL_SELECTOR);
    }

    #[test]
    fn decodes_uint_and_decimals() {
        assert_eq!(decode_uint(&word(42)).unwrap(), U256::from(42));
        assert_eq!(decode_decimals(&word(6)).unwrap(), 6);
        assert!(matches!(
            decode_decimals(&word(256)),
            Err(AbiDecodeError::OutOfRange(_))
        ));
        assert!(matches!(decode_uint(&[]), Err(AbiDecodeError::Empty)));
        assert!(matches!(decode_uint(&[0x01, 0x02]), Err(AbiDecodeError::Abi(_))));
    }

    #[test]
    fn decodes_string_symbol() {
        let data = abi::encode(&[Token::String("USDC".to_string())]);
        assert_eq!(decode_symbol(&data).unwrap(), "USDC");
    }

    #[test]
    fn decodes_bytes32_symbol() {
        let mut data = [0u8; 32];
        data[..3].copy_from_slice(b"MKR");
        assert_eq!(decode_symbol(&data).unwrap(), "MKR");
    }

    #[test]
    fn revert_reason_round_trip() {
        let mut payload = ERROR_STRING_SELECTOR.to_vec();
        payload.extend(abi::encode(&[Token::String(
            "ERC20: insufficient allowance".to_string(),
        )]));

        assert_eq!(
            decode_revert_reason(&payload).as_deref(),
            Some("ERC20: insufficient allowance")
        );
        assert_eq!(decode_revert_reason(&word(1)), None);
    }

    #[test]
    fn revert_data_from_string_or_nested_object() {
        assert_eq!(revert_data(&json!("0x08c379a0")), Some(ERROR_STRING_SELECTOR.to_vec()));
        assert_eq!(
            revert_data(&json!({ "data": "0x08c379a0" })),
            Some(ERROR_STRING_SELECTOR.to_vec())
        );
        assert_eq!(revert_data(&json!(7)), None);
        assert_eq!(revert_data(&json!("not hex")), None);
    }
}
