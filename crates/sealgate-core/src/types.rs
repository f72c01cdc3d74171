//! Core value types: hashes, nonces, work packages, and sealing results.
//!
//! Hashes and nonces travel as `0x`-prefixed hex on the external-miner
//! boundary; [`FromStr`] and [`fmt::Display`] use that encoding, and serde
//! goes through the same strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::WORK_PACKAGE_FIELDS;
use crate::error::HexError;
use crate::hexutil;

/// A 32-byte hash value.
///
/// Used for seal hashes, mix digests, seed hashes, and submitter identifiers.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(try_from = "String", into = "String")]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// The zero hash (32 zero bytes).
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create a Hash256 from a byte array.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the zero hash.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hexutil::encode(self.0))
    }
}

impl FromStr for Hash256 {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hexutil::decode_fixed(s).map(Self)
    }
}

impl TryFrom<String> for Hash256 {
    type Error = HexError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Hash256> for String {
    fn from(hash: Hash256) -> Self {
        hash.to_string()
    }
}

impl From<[u8; 32]> for Hash256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// The 64-bit proof-of-work nonce, carried big-endian as 8 raw bytes.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(try_from = "String", into = "String")]
pub struct BlockNonce(pub [u8; 8]);

impl BlockNonce {
    /// Encode a numeric nonce.
    pub fn from_u64(value: u64) -> Self {
        Self(value.to_be_bytes())
    }

    /// Numeric value of the nonce.
    pub fn as_u64(&self) -> u64 {
        u64::from_be_bytes(self.0)
    }
}

impl fmt::Display for BlockNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hexutil::encode(self.0))
    }
}

impl FromStr for BlockNonce {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hexutil::decode_fixed(s).map(Self)
    }
}

impl TryFrom<String> for BlockNonce {
    type Error = HexError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<BlockNonce> for String {
    fn from(nonce: BlockNonce) -> Self {
        nonce.to_string()
    }
}

/// Work package handed to an external miner: eleven ordered text fields.
///
/// | index | field |
/// |---|---|
/// | 0 | header pow-hash |
/// | 1 | seed hash used for the DAG |
/// | 2 | boundary condition ("target") |
/// | 3 | block number |
/// | 4 | parent block pow-hash |
/// | 5 | gas limit |
/// | 6 | gas used |
/// | 7 | transaction count |
/// | 8 | uncle count |
/// | 9 | encoded header |
/// | 10 | profit, formatted as a decimal string |
///
/// The engine produces the strings; nothing on the facade path rewrites them.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct WorkPackage(pub [String; WORK_PACKAGE_FIELDS]);

impl WorkPackage {
    pub const POW_HASH: usize = 0;
    pub const SEED_HASH: usize = 1;
    pub const TARGET: usize = 2;
    pub const NUMBER: usize = 3;
    pub const PARENT_HASH: usize = 4;
    pub const GAS_LIMIT: usize = 5;
    pub const GAS_USED: usize = 6;
    pub const TX_COUNT: usize = 7;
    pub const UNCLE_COUNT: usize = 8;
    pub const HEADER: usize = 9;
    pub const PROFIT: usize = 10;

    pub fn new(fields: [String; WORK_PACKAGE_FIELDS]) -> Self {
        Self(fields)
    }

    /// Whether every field is empty (the failure value of `get_work`).
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(String::is_empty)
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn pow_hash(&self) -> &str {
        &self.0[Self::POW_HASH]
    }

    pub fn seed_hash(&self) -> &str {
        &self.0[Self::SEED_HASH]
    }

    pub fn target(&self) -> &str {
        &self.0[Self::TARGET]
    }

    pub fn number(&self) -> &str {
        &self.0[Self::NUMBER]
    }

    pub fn profit(&self) -> &str {
        &self.0[Self::PROFIT]
    }

    pub fn into_fields(self) -> [String; WORK_PACKAGE_FIELDS] {
        self.0
    }
}

/// A unit of work pushed into the engine by the block producer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealTask {
    /// Header hash without nonce and mix digest; the key miners submit against.
    pub seal_hash: Hash256,
    /// Height of the block being sealed.
    pub number: u64,
    /// Package served to miners while this task is current.
    pub package: WorkPackage,
}

/// An accepted solution, emitted by the engine on its results channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealedWork {
    pub seal_hash: Hash256,
    pub number: u64,
    pub nonce: BlockNonce,
    pub mix_digest: Hash256,
    pub extra_nonce: Option<Vec<u8>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_display_is_prefixed_hex() {
        let hash = Hash256([0xab; 32]);
        assert_eq!(hash.to_string(), format!("0x{}", "ab".repeat(32)));
    }

    #[test]
    fn hash_parses_from_display() {
        let text = format!("0x{}", "01".repeat(32));
        let hash: Hash256 = text.parse().unwrap();
        assert_eq!(hash, Hash256([0x01; 32]));
    }

    #[test]
    fn hash_rejects_short_input() {
        let err = "0xabcd".parse::<Hash256>().unwrap_err();
        assert_eq!(err, HexError::WrongLength { expected: 32, got: 2 });
    }

    #[test]
    fn hash_zero() {
        assert!(Hash256::ZERO.is_zero());
        assert!(!Hash256([1; 32]).is_zero());
    }

    #[test]
    fn hash_serde_uses_hex_string() {
        let json = serde_json::to_string(&Hash256([0xff; 32])).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "ff".repeat(32)));
        let back: Hash256 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Hash256([0xff; 32]));
    }

    #[test]
    fn nonce_is_big_endian() {
        let nonce = BlockNonce::from_u64(0x0102_0304_0506_0708);
        assert_eq!(nonce.0, [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(nonce.as_u64(), 0x0102_0304_0506_0708);
        assert_eq!(nonce.to_string(), "0x0102030405060708");
    }

    #[test]
    fn nonce_requires_eight_bytes() {
        assert!("0x01020304".parse::<BlockNonce>().is_err());
        assert!("0x0000000000000001".parse::<BlockNonce>().is_ok());
    }

    #[test]
    fn default_work_package_is_empty() {
        let work = WorkPackage::default();
        assert!(work.is_empty());
        assert_eq!(work.0.len(), WORK_PACKAGE_FIELDS);
    }

    #[test]
    fn work_package_accessors() {
        let fields: [String; WORK_PACKAGE_FIELDS] = std::array::from_fn(|i| format!("f{i}"));
        let work = WorkPackage::new(fields);
        assert!(!work.is_empty());
        assert_eq!(work.pow_hash(), "f0");
        assert_eq!(work.seed_hash(), "f1");
        assert_eq!(work.target(), "f2");
        assert_eq!(work.number(), "f3");
        assert_eq!(work.profit(), "f10");
        assert_eq!(work.field(WorkPackage::HEADER), Some("f9"));
        assert_eq!(work.field(11), None);
    }

    #[test]
    fn work_package_serializes_as_array() {
        let fields: [String; WORK_PACKAGE_FIELDS] = std::array::from_fn(|i| i.to_string());
        let json = serde_json::to_string(&WorkPackage::new(fields)).unwrap();
        assert_eq!(json, r#"["0","1","2","3","4","5","6","7","8","9","10"]"#);
    }
}
