//! Sealgate gateway binary.
//!
//! Starts the remote sealing engine and a JSON-RPC server through which
//! external miners fetch work, submit solutions, and report hash rate.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokio::sync::mpsc;
use tracing::{info, warn};

use sealgate_core::traits::{AcceptAll, SealEngine};
use sealgate_core::types::SealedWork;
use sealgate_engine::{EngineConfig, Sealer};
use sealgate_node_lib::{DevnetWorkSource, NodeConfig, SealerApi, start_rpc_server};

/// Log output format.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    /// Human-readable text
    Text,
    /// Structured JSON, one object per line
    Json,
}

impl LogFormat {
    fn as_str(self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        }
    }
}

/// Sealgate: remote proof-of-work sealing for external miners.
#[derive(Parser, Debug)]
#[command(
    name = "sealgate-node",
    version,
    about = "Remote sealing gateway serving eth_getWork / eth_submitWork"
)]
struct Args {
    /// RPC server bind address
    #[arg(long, default_value = "127.0.0.1")]
    rpc_bind: String,

    /// RPC server port
    #[arg(long, default_value_t = sealgate_core::constants::DEFAULT_RPC_PORT)]
    rpc_port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Start without a remote handle; every miner call reports "not supported"
    #[arg(long)]
    no_remote: bool,

    /// Blocks behind the current work after which a solution is stale
    #[arg(long, default_value_t = sealgate_core::constants::DEFAULT_STALE_THRESHOLD)]
    stale_threshold: u64,

    /// Push synthetic devnet work every N seconds (0 disables)
    #[arg(long, default_value_t = 0)]
    devnet_work_interval_secs: u64,
}

impl Args {
    fn into_config(self) -> NodeConfig {
        let engine = EngineConfig {
            stale_threshold: self.stale_threshold,
            ..EngineConfig::default()
        };
        let devnet_work_interval = (self.devnet_work_interval_secs > 0)
            .then(|| Duration::from_secs(self.devnet_work_interval_secs));

        NodeConfig {
            rpc_bind: self.rpc_bind,
            rpc_port: self.rpc_port,
            log_level: self.log_level,
            log_format: self.log_format.as_str().to_string(),
            remote_sealing: !self.no_remote,
            engine,
            devnet_work_interval,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Args::parse().into_config();
    init_logging(&config.log_level, &config.log_format);

    info!("Sealgate v{}", env!("CARGO_PKG_VERSION"));
    info!("rpc_addr: {}", config.rpc_addr());
    info!("remote_sealing: {}", config.remote_sealing);

    let (sealer, results) = if config.remote_sealing {
        let (sealer, results) = Sealer::start(config.engine.clone(), Arc::new(AcceptAll));
        (sealer, Some(results))
    } else {
        (Sealer::without_remote(), None)
    };
    let sealer = Arc::new(sealer);

    if let Some(results) = results {
        tokio::spawn(log_sealed(results));
    }

    if let Some(interval) = config.devnet_work_interval {
        if sealer.remote().is_some() {
            let source = DevnetWorkSource::new(interval);
            let sealer = Arc::clone(&sealer);
            tokio::spawn(async move { source.run(&sealer).await });
        } else {
            warn!("devnet work source ignored: remote sealing is disabled");
        }
    }

    let api = SealerApi::new(Arc::clone(&sealer) as Arc<dyn SealEngine>);
    let (bound, rpc_handle) = start_rpc_server(&config.rpc_addr(), api)
        .await
        .context("failed to start RPC server")?;
    info!("RPC server listening on {bound}");
    info!("Sealgate running (Ctrl+C to stop)");

    tokio::signal::ctrl_c()
        .await
        .context("failed to install Ctrl+C handler")?;
    info!("received Ctrl+C, shutting down...");

    sealer.shutdown().await;
    info!("sealer stopped");

    rpc_handle.stop().ok();
    rpc_handle.stopped().await;
    info!("RPC server stopped");
    info!("Sealgate shutdown complete");
    Ok(())
}

/// Log every accepted solution until the engine drops its sender.
async fn log_sealed(mut results: mpsc::Receiver<SealedWork>) {
    while let Some(sealed) = results.recv().await {
        info!(
            number = sealed.number,
            seal_hash = %sealed.seal_hash,
            nonce = %sealed.nonce,
            mix_digest = %sealed.mix_digest,
            "sealed block ready for import"
        );
    }
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// `format = "json"` selects structured JSON output; any other value gives
/// human-readable text.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true))
            .init();
    }
}
