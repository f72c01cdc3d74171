//! Messages and channels forming the boundary between the facade and the
//! engine's worker loop.
//!
//! Every message carries its own single-use reply slot, so the worker never
//! correlates requests by identity: it answers through the slot embedded in
//! the message it is holding.
//!
//! [`RemoteHandle::channel`] creates both ends at once. The engine keeps the
//! [`RemoteInbox`] (the receivers plus the power to close the shutdown
//! signal) and hands out clones of the [`RemoteHandle`], which can send and
//! observe shutdown but never trigger it.

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

use crate::error::SealerError;
use crate::types::{BlockNonce, Hash256, WorkPackage};

/// Reply slot for a work request: exactly one of a package or an error.
pub type WorkReply = oneshot::Sender<Result<WorkPackage, SealerError>>;

/// Reply slot for a solution submission.
pub type SubmitReply = oneshot::Sender<Result<(), SealerError>>;

/// Request for the current work package.
#[derive(Debug)]
pub struct FetchWork {
    reply: WorkReply,
}

impl FetchWork {
    /// Create a request and the receiver its reply will arrive on.
    pub fn new() -> (Self, oneshot::Receiver<Result<WorkPackage, SealerError>>) {
        let (reply, rx) = oneshot::channel();
        (Self { reply }, rx)
    }

    /// Answer the request. A caller that has gone away is not an error.
    pub fn respond(self, result: Result<WorkPackage, SealerError>) {
        let _ = self.reply.send(result);
    }
}

/// A candidate proof-of-work solution submitted by an external miner.
#[derive(Debug)]
pub struct MineResult {
    pub nonce: BlockNonce,
    /// Seal hash of the work package the solution is for.
    pub hash: Hash256,
    pub mix_digest: Hash256,
    pub extra_nonce: Option<Vec<u8>>,
    reply: SubmitReply,
}

impl MineResult {
    pub fn new(
        nonce: BlockNonce,
        hash: Hash256,
        mix_digest: Hash256,
        extra_nonce: Option<Vec<u8>>,
    ) -> (Self, oneshot::Receiver<Result<(), SealerError>>) {
        let (reply, rx) = oneshot::channel();
        let msg = Self {
            nonce,
            hash,
            mix_digest,
            extra_nonce,
            reply,
        };
        (msg, rx)
    }

    pub fn respond(self, result: Result<(), SealerError>) {
        let _ = self.reply.send(result);
    }
}

/// A miner's hash-rate report. `done` is a pure rendezvous with no payload.
#[derive(Debug)]
pub struct HashrateReport {
    pub rate: u64,
    /// Submitter identifier; uniqueness across submitters is the caller's contract.
    pub id: Hash256,
    done: oneshot::Sender<()>,
}

impl HashrateReport {
    pub fn new(rate: u64, id: Hash256) -> (Self, oneshot::Receiver<()>) {
        let (done, rx) = oneshot::channel();
        (Self { rate, id, done }, rx)
    }

    /// Signal that the report has been recorded.
    pub fn complete(self) {
        let _ = self.done.send(());
    }
}

/// Facade side of the remote boundary.
#[derive(Clone, Debug)]
pub struct RemoteHandle {
    fetch_work: mpsc::Sender<FetchWork>,
    submit_work: mpsc::Sender<MineResult>,
    submit_rate: mpsc::Sender<HashrateReport>,
    exit: CancellationToken,
}

/// Engine side of the remote boundary, drained by the worker loop.
#[derive(Debug)]
pub struct RemoteInbox {
    pub fetch_work: mpsc::Receiver<FetchWork>,
    pub submit_work: mpsc::Receiver<MineResult>,
    pub submit_rate: mpsc::Receiver<HashrateReport>,
    exit: CancellationToken,
}

impl RemoteHandle {
    /// Create a connected handle/inbox pair with `capacity` slots per intake
    /// channel. A capacity of zero is raised to one.
    pub fn channel(capacity: usize) -> (RemoteHandle, RemoteInbox) {
        let capacity = capacity.max(1);
        let (fetch_tx, fetch_rx) = mpsc::channel(capacity);
        let (submit_tx, submit_rx) = mpsc::channel(capacity);
        let (rate_tx, rate_rx) = mpsc::channel(capacity);
        let exit = CancellationToken::new();

        let handle = RemoteHandle {
            fetch_work: fetch_tx,
            submit_work: submit_tx,
            submit_rate: rate_tx,
            exit: exit.clone(),
        };
        let inbox = RemoteInbox {
            fetch_work: fetch_rx,
            submit_work: submit_rx,
            submit_rate: rate_rx,
            exit,
        };
        (handle, inbox)
    }

    pub fn fetch_work(&self) -> &mpsc::Sender<FetchWork> {
        &self.fetch_work
    }

    pub fn submit_work(&self) -> &mpsc::Sender<MineResult> {
        &self.submit_work
    }

    pub fn submit_rate(&self) -> &mpsc::Sender<HashrateReport> {
        &self.submit_rate
    }

    /// Resolves once the engine has closed the shutdown signal.
    pub fn exited(&self) -> WaitForCancellationFuture<'_> {
        self.exit.cancelled()
    }

    /// Whether the shutdown signal has been closed.
    pub fn is_closed(&self) -> bool {
        self.exit.is_cancelled()
    }
}

impl RemoteInbox {
    /// Close the shutdown signal. Idempotent.
    pub fn close(&self) {
        self.exit.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.exit.is_cancelled()
    }

    /// A clone of the shutdown signal, for the engine's own bookkeeping.
    pub fn exit_token(&self) -> CancellationToken {
        self.exit.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn zero_capacity_channel_still_delivers() {
        let (handle, mut inbox) = RemoteHandle::channel(0);
        let (msg, _rx) = HashrateReport::new(7, Hash256::ZERO);
        handle.submit_rate().try_send(msg).unwrap();
        assert_eq!(inbox.submit_rate.recv().await.unwrap().rate, 7);
    }

    #[tokio::test]
    async fn fetch_work_reply_reaches_caller() {
        let (handle, mut inbox) = RemoteHandle::channel(1);
        let (msg, rx) = FetchWork::new();
        handle.fetch_work().send(msg).await.unwrap();

        let received = inbox.fetch_work.recv().await.unwrap();
        received.respond(Err(SealerError::NoMiningWork));
        assert_eq!(rx.await.unwrap(), Err(SealerError::NoMiningWork));
    }

    #[tokio::test]
    async fn mine_result_carries_fields() {
        let (handle, mut inbox) = RemoteHandle::channel(1);
        let (msg, rx) = MineResult::new(
            BlockNonce::from_u64(7),
            Hash256([1; 32]),
            Hash256([2; 32]),
            Some(vec![0xaa]),
        );
        handle.submit_work().send(msg).await.unwrap();

        let received = inbox.submit_work.recv().await.unwrap();
        assert_eq!(received.nonce.as_u64(), 7);
        assert_eq!(received.hash, Hash256([1; 32]));
        assert_eq!(received.mix_digest, Hash256([2; 32]));
        assert_eq!(received.extra_nonce.as_deref(), Some(&[0xaa][..]));
        received.respond(Ok(()));
        assert_eq!(rx.await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn hashrate_report_completes() {
        let (handle, mut inbox) = RemoteHandle::channel(1);
        let (msg, done) = HashrateReport::new(100, Hash256([9; 32]));
        handle.submit_rate().send(msg).await.unwrap();

        let received = inbox.submit_rate.recv().await.unwrap();
        assert_eq!(received.rate, 100);
        received.complete();
        assert!(done.await.is_ok());
    }

    #[tokio::test]
    async fn dropped_message_closes_reply() {
        let (msg, rx) = FetchWork::new();
        drop(msg);
        assert!(rx.await.is_err());
    }

    #[tokio::test]
    async fn close_is_observed_by_every_handle() {
        let (handle, inbox) = RemoteHandle::channel(1);
        let other = handle.clone();
        assert!(!handle.is_closed());

        inbox.close();
        inbox.close();

        handle.exited().await;
        other.exited().await;
        assert!(handle.is_closed());
        assert!(inbox.is_closed());
    }

    #[test]
    fn respond_after_caller_gone_is_silent() {
        let (msg, rx) = FetchWork::new();
        drop(rx);
        msg.respond(Ok(WorkPackage::default()));
    }
}
