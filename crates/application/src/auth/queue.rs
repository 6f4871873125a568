//! FIFO buffer of requests awaiting a refresh outcome.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use lumen_domain::{RequestSpec, ResponseSpec};
use tokio::sync::oneshot;

use crate::error::SessionResult;

/// Cancellation handle for a request queued behind a refresh.
///
/// Once the refresh settles a replay cannot be interrupted, but an entry
/// cancelled while still queued is failed with
/// [`SessionError::Cancelled`](crate::SessionError::Cancelled) instead of
/// being replayed, so its side effects never fire against stale consumers.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a live token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the token cancelled. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// True once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// A request parked while a refresh is underway.
///
/// Consumed exactly once: replayed with the new token, failed with the
/// refresh error, or failed as cancelled. Never dropped silently.
pub(crate) struct QueuedRequest {
    pub(crate) request: RequestSpec,
    pub(crate) responder: oneshot::Sender<SessionResult<ResponseSpec>>,
    pub(crate) cancellation: CancellationToken,
}

impl QueuedRequest {
    /// Delivers the final outcome to the waiting caller.
    ///
    /// A caller that stopped awaiting simply misses the delivery; the entry
    /// is still consumed.
    pub(crate) fn settle(self, result: SessionResult<ResponseSpec>) {
        let _ = self.responder.send(result);
    }
}

/// FIFO list of [`QueuedRequest`]s for one refresh cycle.
#[derive(Default)]
pub(crate) struct RequestQueue {
    entries: VecDeque<QueuedRequest>,
}

impl RequestQueue {
    /// Appends an entry; order of insertion is order of replay.
    pub(crate) fn push(&mut self, entry: QueuedRequest) {
        self.entries.push_back(entry);
    }

    /// Empties the queue, returning entries in arrival order.
    pub(crate) fn drain(&mut self) -> Vec<QueuedRequest> {
        self.entries.drain(..).collect()
    }

    /// Number of parked requests.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn entry(path: &str) -> (QueuedRequest, oneshot::Receiver<SessionResult<ResponseSpec>>) {
        let (tx, rx) = oneshot::channel();
        (
            QueuedRequest {
                request: RequestSpec::get(path),
                responder: tx,
                cancellation: CancellationToken::new(),
            },
            rx,
        )
    }

    #[test]
    fn test_drain_preserves_arrival_order() {
        let mut queue = RequestQueue::default();
        let (first, _rx1) = entry("/a");
        let (second, _rx2) = entry("/b");
        let (third, _rx3) = entry("/c");

        queue.push(first);
        queue.push(second);
        queue.push(third);
        assert_eq!(queue.len(), 3);

        let drained = queue.drain();
        let paths: Vec<_> = drained.iter().map(|e| e.request.path.clone()).collect();
        assert_eq!(paths, vec!["/a", "/b", "/c"]);
        assert_eq!(queue.len(), 0);
    }

    #[tokio::test]
    async fn test_settle_delivers_to_waiter() {
        let (queued, rx) = entry("/a");

        queued.settle(Ok(ResponseSpec::with_status(200)));

        let delivered = rx.await.unwrap().unwrap();
        assert_eq!(delivered.status, 200);
    }

    #[test]
    fn test_cancellation_token_is_shared() {
        let token = CancellationToken::new();
        let observer = token.clone();

        assert!(!observer.is_cancelled());
        token.cancel();
        assert!(observer.is_cancelled());
    }
}
