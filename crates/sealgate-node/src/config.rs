//! Node configuration for the Sealgate gateway.
//!
//! Provides [`NodeConfig`] with defaults for RPC binding, logging, and the
//! engine. The binary fills it from command-line flags.

use std::time::Duration;

use sealgate_core::constants::DEFAULT_RPC_PORT;
use sealgate_engine::EngineConfig;

/// Configuration for a gateway instance.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// IP address for the JSON-RPC server to bind to.
    pub rpc_bind: String,
    /// Port for the JSON-RPC server.
    pub rpc_port: u16,
    /// Log level filter string (e.g. "info", "debug", "sealgate_engine=trace").
    pub log_level: String,
    /// Log output format: "text" or "json".
    pub log_format: String,
    /// Whether the engine exposes a remote handle to external miners.
    pub remote_sealing: bool,
    /// Engine settings.
    pub engine: EngineConfig,
    /// Period of the devnet work source; `None` disables it.
    pub devnet_work_interval: Option<Duration>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            rpc_bind: "127.0.0.1".to_string(),
            rpc_port: DEFAULT_RPC_PORT,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            remote_sealing: true,
            engine: EngineConfig::default(),
            devnet_work_interval: None,
        }
    }
}

impl NodeConfig {
    /// Preset for local development: synthetic work every 15 seconds.
    pub fn devnet() -> Self {
        Self {
            devnet_work_interval: Some(Duration::from_secs(15)),
            ..Self::default()
        }
    }

    /// Socket address string for the RPC server.
    pub fn rpc_addr(&self) -> String {
        format!("{}:{}", self.rpc_bind, self.rpc_port)
    }
}
