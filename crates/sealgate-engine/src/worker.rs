//! The worker loop: the single consumer of the remote intake channels.
//!
//! All mutable sealing state (current task, pending tasks, hash-rate reports)
//! lives here and is touched by one task only. The aggregate hash rate is
//! published through [`SharedState`] so the engine can answer synchronously.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use sealgate_core::error::SealerError;
use sealgate_core::remote::{MineResult, RemoteInbox};
use sealgate_core::traits::SealVerifier;
use sealgate_core::types::{Hash256, SealTask, SealedWork, WorkPackage};

use crate::config::EngineConfig;
use crate::sealer::SharedState;

struct RateEntry {
    rate: u64,
    last_seen: Instant,
}

pub(crate) struct Worker {
    config: EngineConfig,
    verifier: Arc<dyn SealVerifier>,
    results: mpsc::Sender<SealedWork>,
    shared: Arc<SharedState>,
    current: Option<SealTask>,
    works: HashMap<Hash256, SealTask>,
    rates: HashMap<Hash256, RateEntry>,
}

impl Worker {
    pub(crate) fn new(
        config: EngineConfig,
        verifier: Arc<dyn SealVerifier>,
        results: mpsc::Sender<SealedWork>,
        shared: Arc<SharedState>,
    ) -> Self {
        Self {
            config,
            verifier,
            results,
            shared,
            current: None,
            works: HashMap::new(),
            rates: HashMap::new(),
        }
    }

    /// Drain the inbox until the shutdown signal closes.
    ///
    /// Returning drops the inbox, and with it every message still queued;
    /// callers waiting on those messages' reply slots see them close.
    pub(crate) async fn run(
        mut self,
        mut inbox: RemoteInbox,
        mut tasks: mpsc::UnboundedReceiver<SealTask>,
    ) {
        let exit = inbox.exit_token();
        let mut ticker = time::interval(self.config.cleanup_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = exit.cancelled() => {
                    info!("remote sealer exiting");
                    break;
                }
                Some(task) = tasks.recv() => {
                    self.push_task(task);
                }
                Some(req) = inbox.fetch_work.recv() => {
                    req.respond(self.current_work());
                }
                Some(submission) = inbox.submit_work.recv() => {
                    let outcome = self.submit(&submission);
                    submission.respond(outcome);
                }
                Some(report) = inbox.submit_rate.recv() => {
                    self.record_rate(report.id, report.rate, Instant::now());
                    report.complete();
                }
                _ = ticker.tick() => {
                    self.cleanup(Instant::now());
                }
            }
        }

        self.rates.clear();
        self.shared.hashrate.store(0, Ordering::Relaxed);
        self.shared.running.store(false, Ordering::Relaxed);
    }

    /// Make `task` the current work and remember it as pending.
    pub(crate) fn push_task(&mut self, task: SealTask) {
        debug!(number = task.number, seal_hash = %task.seal_hash, "new sealing work");
        self.works.insert(task.seal_hash, task.clone());
        self.current = Some(task);
    }

    pub(crate) fn current_work(&self) -> Result<WorkPackage, SealerError> {
        self.current
            .as_ref()
            .map(|task| task.package.clone())
            .ok_or(SealerError::NoMiningWork)
    }

    /// Check a submitted solution and forward it on the results channel.
    pub(crate) fn submit(&mut self, submission: &MineResult) -> Result<(), SealerError> {
        let seal_hash = submission.hash;
        let Some(current) = self.current.as_ref().map(|task| task.number) else {
            warn!(%seal_hash, "solution submitted before any work was issued");
            return Err(SealerError::UnknownWork(seal_hash.to_string()));
        };
        let Some(task) = self.works.get(&seal_hash) else {
            warn!(%seal_hash, current, "work submitted but none pending");
            return Err(SealerError::UnknownWork(seal_hash.to_string()));
        };

        if let Err(e) = self
            .verifier
            .verify(task, submission.nonce, &submission.mix_digest)
        {
            warn!(%seal_hash, number = task.number, "invalid proof-of-work submitted: {e}");
            return Err(e);
        }

        if task.number.saturating_add(self.config.stale_threshold) <= current {
            warn!(%seal_hash, number = task.number, current, "work submitted is too old");
            return Err(SealerError::StaleWork {
                number: task.number,
                current,
            });
        }

        let sealed = SealedWork {
            seal_hash,
            number: task.number,
            nonce: submission.nonce,
            mix_digest: submission.mix_digest,
            extra_nonce: submission.extra_nonce.clone(),
        };
        match self.results.try_send(sealed) {
            Ok(()) => {
                info!(%seal_hash, number = task.number, nonce = %submission.nonce, "solution accepted");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(%seal_hash, "sealing result is not read by consumer");
                Err(SealerError::Internal("results channel full".into()))
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!(%seal_hash, "results channel closed");
                Err(SealerError::Internal("results channel closed".into()))
            }
        }
    }

    /// Record a miner's report, replacing any earlier report under the same id.
    pub(crate) fn record_rate(&mut self, id: Hash256, rate: u64, now: Instant) {
        self.rates.insert(id, RateEntry { rate, last_seen: now });
        self.publish_hashrate();
    }

    /// Expire old hash-rate reports and purge pending work that went stale.
    pub(crate) fn cleanup(&mut self, now: Instant) {
        let expiry = self.config.hashrate_expiry;
        self.rates
            .retain(|_, entry| now.saturating_duration_since(entry.last_seen) <= expiry);
        self.publish_hashrate();

        if let Some(current) = self.current.as_ref().map(|task| task.number) {
            let threshold = self.config.stale_threshold;
            let before = self.works.len();
            self.works
                .retain(|_, task| task.number.saturating_add(threshold) > current);
            let purged = before - self.works.len();
            if purged > 0 {
                debug!(purged, current, "purged stale work");
            }
        }
    }

    fn publish_hashrate(&self) {
        let total = self
            .rates
            .values()
            .fold(0u64, |acc, entry| acc.saturating_add(entry.rate));
        self.shared.hashrate.store(total, Ordering::Relaxed);
    }

    #[cfg(test)]
    fn pending(&self) -> usize {
        self.works.len()
    }
}
