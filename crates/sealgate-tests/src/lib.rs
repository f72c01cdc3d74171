//! Integration test suite for Sealgate.
//!
//! The tests drive the miner facade against scripted engines (where the test
//! plays the worker side of the channels) and against the real engine behind
//! the JSON-RPC server.

pub mod helpers;
