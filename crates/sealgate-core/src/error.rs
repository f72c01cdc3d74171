//! Error types for the Sealgate remote sealer.
use thiserror::Error;

/// Failures of a facade round-trip or of the worker handling a message.
///
/// Submission-type operations collapse every variant to `false` at the
/// facade boundary; `get_work` surfaces them as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SealerError {
    #[error("not supported")] NotSupported,
    #[error("sealer stopped")] Stopped,
    #[error("no mining work available yet")] NoMiningWork,
    #[error("invalid proof-of-work solution")] InvalidSolution,
    #[error("stale work: solution for block {number}, current block {current}")] StaleWork { number: u64, current: u64 },
    #[error("unknown work: {0}")] UnknownWork(String),
    #[error("internal: {0}")] Internal(String),
}

/// Failures decoding `0x`-prefixed hex text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HexError {
    #[error("empty hex string")] Empty,
    #[error("hex string without 0x prefix")] MissingPrefix,
    #[error("hex string of odd length")] OddLength,
    #[error("invalid hex digit {0:?}")] InvalidDigit(char),
    #[error("hex string \"0x\"")] EmptyNumber,
    #[error("hex number with leading zero digits")] LeadingZero,
    #[error("hex number > 64 bits")] Overflow,
    #[error("wrong length: expected {expected} bytes, got {got}")] WrongLength { expected: usize, got: usize },
}

/// Failures starting the node's outer services.
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("rpc: {0}")] Rpc(String),
}
