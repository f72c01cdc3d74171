//! # sealgate-core
//! Foundation types, messages, and traits shared by the Sealgate engine and
//! the external-miner facade.

pub mod constants;
pub mod error;
pub mod hexutil;
pub mod remote;
pub mod traits;
pub mod types;
