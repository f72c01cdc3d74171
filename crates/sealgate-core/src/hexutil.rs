//! `0x`-prefixed hex encoding used on the external-miner boundary.
//!
//! Byte strings are encoded as `0x` followed by an even number of hex digits.
//! Quantities are encoded as `0x` followed by the shortest hex representation
//! of the number (`0x0` for zero, no leading zeros otherwise).

use crate::error::HexError;

fn strip_prefix(input: &str) -> Result<&str, HexError> {
    if input.is_empty() {
        return Err(HexError::Empty);
    }
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .ok_or(HexError::MissingPrefix)
}

fn map_hex_error(err: hex::FromHexError) -> HexError {
    match err {
        hex::FromHexError::InvalidHexCharacter { c, .. } => HexError::InvalidDigit(c),
        hex::FromHexError::OddLength => HexError::OddLength,
        hex::FromHexError::InvalidStringLength => HexError::OddLength,
    }
}

/// Decode `0x`-prefixed hex into bytes. `"0x"` decodes to an empty vector.
pub fn decode(input: &str) -> Result<Vec<u8>, HexError> {
    let digits = strip_prefix(input)?;
    hex::decode(digits).map_err(map_hex_error)
}

/// Decode `0x`-prefixed hex into exactly `N` bytes.
pub fn decode_fixed<const N: usize>(input: &str) -> Result<[u8; N], HexError> {
    let bytes = decode(input)?;
    let got = bytes.len();
    bytes
        .try_into()
        .map_err(|_| HexError::WrongLength { expected: N, got })
}

/// Encode bytes as `0x`-prefixed lowercase hex.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode a hex quantity (`0x`-prefixed, no leading zeros, at most 64 bits).
pub fn decode_quantity(input: &str) -> Result<u64, HexError> {
    let digits = strip_prefix(input)?;
    if digits.is_empty() {
        return Err(HexError::EmptyNumber);
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return Err(HexError::LeadingZero);
    }
    if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(HexError::InvalidDigit(c));
    }
    if digits.len() > 16 {
        return Err(HexError::Overflow);
    }
    u64::from_str_radix(digits, 16).map_err(|_| HexError::Overflow)
}

/// Encode a number as a hex quantity.
pub fn encode_quantity(value: u64) -> String {
    format!("{value:#x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_bytes() {
        assert_eq!(decode("0x0102ff").unwrap(), vec![0x01, 0x02, 0xff]);
        assert_eq!(decode("0XABcd").unwrap(), vec![0xab, 0xcd]);
    }

    #[test]
    fn decode_bare_prefix_is_empty() {
        assert_eq!(decode("0x").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn decode_rejects_empty() {
        assert_eq!(decode(""), Err(HexError::Empty));
    }

    #[test]
    fn decode_rejects_missing_prefix() {
        assert_eq!(decode("0102"), Err(HexError::MissingPrefix));
    }

    #[test]
    fn decode_rejects_odd_length() {
        assert_eq!(decode("0x123"), Err(HexError::OddLength));
    }

    #[test]
    fn decode_rejects_bad_digit() {
        assert_eq!(decode("0xzz"), Err(HexError::InvalidDigit('z')));
    }

    #[test]
    fn decode_fixed_checks_length() {
        let arr: [u8; 2] = decode_fixed("0xbeef").unwrap();
        assert_eq!(arr, [0xbe, 0xef]);
        let err = decode_fixed::<4>("0xbeef").unwrap_err();
        assert_eq!(err, HexError::WrongLength { expected: 4, got: 2 });
    }

    #[test]
    fn encode_bytes() {
        assert_eq!(encode([0xde, 0xad]), "0xdead");
        assert_eq!(encode([]), "0x");
    }

    #[test]
    fn quantity_values() {
        assert_eq!(decode_quantity("0x0").unwrap(), 0);
        assert_eq!(decode_quantity("0x1f").unwrap(), 31);
        assert_eq!(decode_quantity("0xffffffffffffffff").unwrap(), u64::MAX);
    }

    #[test]
    fn quantity_errors() {
        assert_eq!(decode_quantity(""), Err(HexError::Empty));
        assert_eq!(decode_quantity("12"), Err(HexError::MissingPrefix));
        assert_eq!(decode_quantity("0x"), Err(HexError::EmptyNumber));
        assert_eq!(decode_quantity("0x01"), Err(HexError::LeadingZero));
        assert_eq!(decode_quantity("0xg1"), Err(HexError::InvalidDigit('g')));
        assert_eq!(decode_quantity("0x10000000000000000"), Err(HexError::Overflow));
    }

    #[test]
    fn quantity_encoding() {
        assert_eq!(encode_quantity(0), "0x0");
        assert_eq!(encode_quantity(255), "0xff");
    }
}
