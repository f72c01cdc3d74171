//! Synthetic work for development networks.
//!
//! [`DevnetWorkSource`] stands in for a block producer: it pushes a fresh
//! [`SealTask`] into the engine on a fixed interval, chaining each task's
//! parent hash to the previous seal hash. All hashes are SHA-256 derived so
//! the sequence is reproducible.

use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use sealgate_core::hexutil;
use sealgate_core::types::{Hash256, SealTask, WorkPackage};
use sealgate_engine::Sealer;

/// Blocks per DAG epoch; the seed hash changes once per epoch.
pub const EPOCH_LENGTH: u64 = 30_000;

/// Fixed devnet boundary: 2^256 / 2^32.
pub const DEVNET_TARGET: &str =
    "0x0000000100000000000000000000000000000000000000000000000000000000";

/// Gas limit advertised in devnet work packages.
pub const DEVNET_GAS_LIMIT: u64 = 30_000_000;

fn sha256(parts: &[&[u8]]) -> Hash256 {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    Hash256(hasher.finalize().into())
}

/// Produces a chain of synthetic sealing tasks.
#[derive(Debug, Clone)]
pub struct DevnetWorkSource {
    interval: Duration,
    next_number: u64,
    parent: Hash256,
}

impl DevnetWorkSource {
    /// Start at block 1 on top of the zero hash.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_number: 1,
            parent: Hash256::ZERO,
        }
    }

    /// Seed hash of the epoch containing `number`.
    pub fn seed_hash(number: u64) -> Hash256 {
        let epoch = number / EPOCH_LENGTH;
        sha256(&[b"sealgate-devnet-seed", &epoch.to_be_bytes()])
    }

    /// Build the next task and advance the chain.
    pub fn next_task(&mut self) -> SealTask {
        let number = self.next_number;
        let parent = self.parent;
        let seal_hash = sha256(&[parent.as_bytes(), &number.to_be_bytes()]);
        let seed = Self::seed_hash(number);

        let mut header = Vec::with_capacity(72);
        header.extend_from_slice(parent.as_bytes());
        header.extend_from_slice(&number.to_be_bytes());
        header.extend_from_slice(seed.as_bytes());

        let package = WorkPackage::new([
            seal_hash.to_string(),
            seed.to_string(),
            DEVNET_TARGET.to_string(),
            hexutil::encode_quantity(number),
            parent.to_string(),
            hexutil::encode_quantity(DEVNET_GAS_LIMIT),
            hexutil::encode_quantity(0),
            hexutil::encode_quantity(0),
            hexutil::encode_quantity(0),
            hexutil::encode(&header),
            "0".to_string(),
        ]);

        self.next_number += 1;
        self.parent = seal_hash;

        SealTask {
            seal_hash,
            number,
            package,
        }
    }

    /// Push a task into `sealer` every interval until the engine stops.
    pub async fn run(mut self, sealer: &Sealer) {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval = ?self.interval, "devnet work source started");

        loop {
            ticker.tick().await;
            let task = self.next_task();
            let number = task.number;
            if let Err(e) = sealer.push_work(task) {
                info!("devnet work source stopping: {e}");
                break;
            }
            debug!(number, "devnet work pushed");
        }
    }
}
