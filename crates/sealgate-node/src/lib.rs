//! # sealgate-node — External-miner facade and RPC.
//!
//! - [`api::SealerApi`] — the four miner operations as message round-trips
//!   over the engine's remote handle
//! - [`rpc`] — JSON-RPC server exposing the facade in the `eth` namespace
//! - [`devnet::DevnetWorkSource`] — synthetic work for local testing
//! - [`config::NodeConfig`] — node configuration

pub mod api;
pub mod config;
pub mod devnet;
pub mod rpc;

pub use api::SealerApi;
pub use config::NodeConfig;
pub use devnet::DevnetWorkSource;
pub use rpc::start_rpc_server;
