//! Facade through which external miners reach the sealing engine.
//!
//! Each operation builds a message carrying its own reply slot, races the
//! send against the engine's shutdown signal, and then waits for that one
//! reply. Callers never touch engine state directly.
//!
//! Once a message has been handed over, the wait is not raced against
//! shutdown again. When the worker loop ends it drops every message it still
//! holds, which closes their reply slots and releases the waiting callers.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use sealgate_core::error::SealerError;
use sealgate_core::hexutil;
use sealgate_core::remote::{FetchWork, HashrateReport, MineResult, RemoteHandle};
use sealgate_core::traits::SealEngine;
use sealgate_core::types::{BlockNonce, Hash256, WorkPackage};

/// Send `msg` on `intake` unless the shutdown signal closes first.
///
/// A signal that is already closed always wins, even if the channel has room.
async fn send_or_exit<T>(
    remote: &RemoteHandle,
    intake: &mpsc::Sender<T>,
    msg: T,
) -> Result<(), SealerError> {
    tokio::select! {
        biased;
        _ = remote.exited() => Err(SealerError::Stopped),
        sent = intake.send(msg) => sent.map_err(|_| SealerError::Stopped),
    }
}

/// The external-miner API.
#[derive(Clone)]
pub struct SealerApi {
    engine: Arc<dyn SealEngine>,
}

impl SealerApi {
    pub fn new(engine: Arc<dyn SealEngine>) -> Self {
        Self { engine }
    }

    /// Fetch the current work package.
    ///
    /// Fails with [`SealerError::NotSupported`] when no remote engine is
    /// configured, [`SealerError::Stopped`] when the engine is shutting down,
    /// or whatever error the worker replied with.
    pub async fn get_work(&self) -> Result<WorkPackage, SealerError> {
        let remote = self.engine.remote().ok_or(SealerError::NotSupported)?;

        let (request, reply) = FetchWork::new();
        send_or_exit(remote, remote.fetch_work(), request).await?;

        reply.await.unwrap_or(Err(SealerError::Stopped))
    }

    /// Submit a proof-of-work solution. Returns whether it was accepted.
    ///
    /// Invalid, stale, and unknown solutions all come back as `false`; the
    /// reason is logged but never returned. A malformed `extra_nonce` is
    /// rejected without contacting the engine.
    pub async fn submit_work(
        &self,
        nonce: BlockNonce,
        hash: Hash256,
        digest: Hash256,
        extra_nonce: Option<&str>,
    ) -> bool {
        let Some(remote) = self.engine.remote() else {
            return false;
        };

        let extra_nonce = match extra_nonce.map(hexutil::decode).transpose() {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(%hash, "rejecting submission with malformed extra nonce: {e}");
                return false;
            }
        };

        let (submission, reply) = MineResult::new(nonce, hash, digest, extra_nonce);
        if send_or_exit(remote, remote.submit_work(), submission)
            .await
            .is_err()
        {
            return false;
        }

        match reply.await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                debug!(%hash, %nonce, "solution rejected: {e}");
                false
            }
            Err(_) => false,
        }
    }

    /// Report a miner's hash rate under its unique `id`.
    ///
    /// Returns `true` once the engine has recorded the report.
    pub async fn submit_hashrate(&self, rate: u64, id: Hash256) -> bool {
        let Some(remote) = self.engine.remote() else {
            return false;
        };

        let (report, done) = HashrateReport::new(rate, id);
        if send_or_exit(remote, remote.submit_rate(), report)
            .await
            .is_err()
        {
            return false;
        }

        // Block until hash rate submitted successfully.
        done.await.is_ok()
    }

    /// Aggregate hash rate as reported by the engine.
    pub fn get_hashrate(&self) -> u64 {
        self.engine.hashrate()
    }
}
