//! Shared test helpers for facade and end-to-end tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use sealgate_core::remote::{RemoteHandle, RemoteInbox};
use sealgate_core::traits::SealEngine;
use sealgate_core::types::{BlockNonce, Hash256, SealTask, WorkPackage};

/// Hash filled with a single seed byte.
pub fn hash(seed: u8) -> Hash256 {
    Hash256([seed; 32])
}

/// Nonce from a number.
pub fn nonce(value: u64) -> BlockNonce {
    BlockNonce::from_u64(value)
}

/// Work package whose fields are `"{tag}-{index}"`.
pub fn work_package(tag: &str) -> WorkPackage {
    WorkPackage::new(std::array::from_fn(|i| format!("{tag}-{i}")))
}

/// Sealing task at `number`, keyed by `hash(number as u8)`.
pub fn seal_task(number: u64) -> SealTask {
    SealTask {
        seal_hash: hash(number as u8),
        number,
        package: work_package(&format!("block{number}")),
    }
}

/// Engine whose worker side is driven by the test through a [`RemoteInbox`].
pub struct ScriptedEngine {
    handle: RemoteHandle,
    hashrate: AtomicU64,
}

impl ScriptedEngine {
    /// Engine with intake channels of the given capacity, plus the inbox the
    /// test reads from.
    pub fn wired(capacity: usize) -> (Arc<Self>, RemoteInbox) {
        let (handle, inbox) = RemoteHandle::channel(capacity);
        let engine = Arc::new(Self {
            handle,
            hashrate: AtomicU64::new(0),
        });
        (engine, inbox)
    }

    pub fn set_hashrate(&self, rate: u64) {
        self.hashrate.store(rate, Ordering::Relaxed);
    }
}

impl SealEngine for ScriptedEngine {
    fn remote(&self) -> Option<&RemoteHandle> {
        Some(&self.handle)
    }

    fn hashrate(&self) -> u64 {
        self.hashrate.load(Ordering::Relaxed)
    }
}

/// Engine with no remote handle at all.
pub struct NoEngine;

impl SealEngine for NoEngine {
    fn remote(&self) -> Option<&RemoteHandle> {
        None
    }

    fn hashrate(&self) -> u64 {
        0
    }
}
