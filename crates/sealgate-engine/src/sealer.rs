//! The sealing engine implementing [`SealEngine`].
//!
//! [`Sealer::start`] creates the remote handle, spawns the worker loop on the
//! current tokio runtime, and returns the receiver for accepted solutions.
//! The engine is the only party that can close the remote's shutdown signal.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use sealgate_core::error::SealerError;
use sealgate_core::remote::RemoteHandle;
use sealgate_core::traits::{SealEngine, SealVerifier};
use sealgate_core::types::{SealTask, SealedWork};

use crate::config::EngineConfig;
use crate::worker::Worker;

/// State shared between the [`Sealer`] and its worker task.
pub(crate) struct SharedState {
    /// Sum of live remote hash-rate reports.
    pub(crate) hashrate: AtomicU64,
    /// Whether the worker loop is still running.
    pub(crate) running: AtomicBool,
}

impl SharedState {
    pub(crate) fn new() -> Self {
        Self {
            hashrate: AtomicU64::new(0),
            running: AtomicBool::new(true),
        }
    }
}

/// Remote pieces that exist only when remote sealing is enabled.
struct Remote {
    handle: RemoteHandle,
    exit: CancellationToken,
    tasks: mpsc::UnboundedSender<SealTask>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

/// Proof-of-work sealing engine serving external miners.
pub struct Sealer {
    remote: Option<Remote>,
    shared: Arc<SharedState>,
}

impl fmt::Debug for Sealer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sealer")
            .field("remote", &self.remote.is_some())
            .field("hashrate", &self.shared.hashrate.load(Ordering::Relaxed))
            .field("running", &self.shared.running.load(Ordering::Relaxed))
            .finish()
    }
}

impl Sealer {
    /// Start an engine with remote sealing enabled.
    ///
    /// Must be called from within a tokio runtime. Returns the engine and the
    /// receiver on which accepted solutions are delivered.
    pub fn start(
        config: EngineConfig,
        verifier: Arc<dyn SealVerifier>,
    ) -> (Self, mpsc::Receiver<SealedWork>) {
        let intake_capacity = config.intake_capacity.max(1);
        let (handle, inbox) = RemoteHandle::channel(intake_capacity);
        let (results_tx, results_rx) = mpsc::channel(config.results_capacity.max(1));
        let (tasks_tx, tasks_rx) = mpsc::unbounded_channel();
        let exit = inbox.exit_token();
        let shared = Arc::new(SharedState::new());

        info!(
            stale_threshold = config.stale_threshold,
            intake_capacity,
            "starting remote sealer"
        );
        let worker = Worker::new(config, verifier, results_tx, Arc::clone(&shared));
        let join = tokio::spawn(worker.run(inbox, tasks_rx));

        let sealer = Self {
            remote: Some(Remote {
                handle,
                exit,
                tasks: tasks_tx,
                worker: Mutex::new(Some(join)),
            }),
            shared,
        };
        (sealer, results_rx)
    }

    /// An engine without a remote handle; every facade operation reports
    /// "not supported".
    pub fn without_remote() -> Self {
        let shared = SharedState::new();
        shared.running.store(false, Ordering::Relaxed);
        Self {
            remote: None,
            shared: Arc::new(shared),
        }
    }

    /// Hand a new unit of work to the worker; it becomes the current package.
    pub fn push_work(&self, task: SealTask) -> Result<(), SealerError> {
        let remote = self.remote.as_ref().ok_or(SealerError::NotSupported)?;
        if remote.exit.is_cancelled() {
            return Err(SealerError::Stopped);
        }
        remote.tasks.send(task).map_err(|_| SealerError::Stopped)
    }

    /// Close the shutdown signal. Idempotent.
    pub fn close(&self) {
        if let Some(remote) = &self.remote {
            if !remote.exit.is_cancelled() {
                debug!("closing remote sealer");
            }
            remote.exit.cancel();
        }
    }

    /// Close the shutdown signal and wait for the worker loop to finish.
    pub async fn shutdown(&self) {
        self.close();
        let join = self
            .remote
            .as_ref()
            .and_then(|remote| remote.worker.lock().take());
        if let Some(join) = join {
            let _ = join.await;
        }
    }

    /// Whether the worker loop is still running.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Relaxed)
    }
}

impl SealEngine for Sealer {
    fn remote(&self) -> Option<&RemoteHandle> {
        self.remote.as_ref().map(|remote| &remote.handle)
    }

    fn hashrate(&self) -> u64 {
        self.shared.hashrate.load(Ordering::Relaxed)
    }
}

impl Drop for Sealer {
    fn drop(&mut self) {
        self.close();
    }
}
