//! Single-flight refresh coordination.
//!
//! At most one token refresh runs at any time. The first request that hits
//! a 401 leads the cycle; every other request arriving while it runs parks
//! in the queue and shares the cycle's outcome. State is guarded by a
//! synchronous mutex and every observe-and-transition is one critical
//! section with no await inside, so a cycle can never be observed half
//! started and an entry can never be orphaned between cycles.

use std::sync::{Mutex, MutexGuard, PoisonError};

use lumen_domain::{RequestSpec, ResponseSpec};
use tokio::sync::oneshot;

use crate::error::{SessionError, SessionResult};

use super::queue::{CancellationToken, QueuedRequest, RequestQueue};

/// One refresh cycle: the in-flight flag plus the requests parked on it.
///
/// Both live under a single lock; flipping the flag and draining the queue
/// happen together.
#[derive(Default)]
struct Cycle {
    refreshing: bool,
    queue: RequestQueue,
}

/// The role `enroll` assigned to a caller.
pub(crate) enum Enrollment {
    /// First caller of the cycle: performs the refresh, then settles the
    /// whole queue (its own request is entry zero).
    Leader(ReplayWaiter),
    /// A refresh is already in flight; await its settlement.
    Follower(ReplayWaiter),
}

/// Receives the final outcome of a parked request.
pub(crate) struct ReplayWaiter {
    rx: oneshot::Receiver<SessionResult<ResponseSpec>>,
}

impl ReplayWaiter {
    /// Waits for the cycle to settle this request.
    pub(crate) async fn outcome(self) -> SessionResult<ResponseSpec> {
        // The sender is consumed by settle(); a dropped sender would mean
        // the entry was discarded without settlement, which the drain loop
        // does not do. Map it to Cancelled rather than panic.
        self.rx.await.unwrap_or(Err(SessionError::Cancelled))
    }
}

/// Ensures at most one in-flight refresh exists at any time.
///
/// Intended to live inside a session client instance (not as module-global
/// state) so tests get an isolated coordinator each.
#[derive(Default)]
pub struct RefreshCoordinator {
    cycle: Mutex<Cycle>,
}

impl RefreshCoordinator {
    /// Creates an idle coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parks a 401-failed request and assigns the caller its role.
    ///
    /// Exactly one caller per cycle is the leader: the one whose enroll
    /// finds the coordinator idle. Everyone else is a follower on the same
    /// cycle. Park-and-assign is atomic.
    pub(crate) fn enroll(
        &self,
        request: RequestSpec,
        cancellation: CancellationToken,
    ) -> Enrollment {
        let (tx, rx) = oneshot::channel();
        let waiter = ReplayWaiter { rx };

        let mut cycle = self.lock();
        cycle.queue.push(QueuedRequest {
            request,
            responder: tx,
            cancellation,
        });

        if cycle.refreshing {
            Enrollment::Follower(waiter)
        } else {
            cycle.refreshing = true;
            Enrollment::Leader(waiter)
        }
    }

    /// Ends the cycle: returns to idle and hands the leader every parked
    /// request, in arrival order, for settlement.
    ///
    /// Atomic with respect to `enroll`: an entry parked before this call is
    /// in the returned batch; one parked after it starts a new cycle.
    pub(crate) fn settle(&self) -> Vec<QueuedRequest> {
        let mut cycle = self.lock();
        cycle.refreshing = false;
        cycle.queue.drain()
    }

    /// True while a refresh cycle is in flight.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.lock().refreshing
    }

    /// Number of requests parked on the current cycle.
    #[must_use]
    pub fn parked(&self) -> usize {
        self.lock().queue.len()
    }

    fn lock(&self) -> MutexGuard<'_, Cycle> {
        // No code path panics while holding the lock; recover rather than
        // poison-propagate if one ever does.
        self.cycle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("refreshing", &self.is_refreshing())
            .field("parked", &self.parked())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn request(path: &str) -> RequestSpec {
        RequestSpec::get(path)
    }

    #[test]
    fn test_first_enrollee_leads_rest_follow() {
        let coordinator = RefreshCoordinator::new();

        let first = coordinator.enroll(request("/a"), CancellationToken::new());
        let second = coordinator.enroll(request("/b"), CancellationToken::new());
        let third = coordinator.enroll(request("/c"), CancellationToken::new());

        assert!(matches!(first, Enrollment::Leader(_)));
        assert!(matches!(second, Enrollment::Follower(_)));
        assert!(matches!(third, Enrollment::Follower(_)));
        assert!(coordinator.is_refreshing());
        assert_eq!(coordinator.parked(), 3);
    }

    #[test]
    fn test_settle_returns_to_idle_with_fifo_batch() {
        let coordinator = RefreshCoordinator::new();
        let _lead = coordinator.enroll(request("/a"), CancellationToken::new());
        let _follow = coordinator.enroll(request("/b"), CancellationToken::new());

        let batch = coordinator.settle();
        let paths: Vec<_> = batch.iter().map(|e| e.request.path.clone()).collect();

        assert_eq!(paths, vec!["/a", "/b"]);
        assert!(!coordinator.is_refreshing());
        assert_eq!(coordinator.parked(), 0);
    }

    #[test]
    fn test_enrollment_after_settle_starts_new_cycle() {
        let coordinator = RefreshCoordinator::new();
        let _lead = coordinator.enroll(request("/a"), CancellationToken::new());
        let batch = coordinator.settle();
        assert_eq!(batch.len(), 1);

        let next = coordinator.enroll(request("/late"), CancellationToken::new());
        assert!(matches!(next, Enrollment::Leader(_)));
        assert_eq!(coordinator.parked(), 1);
    }

    #[tokio::test]
    async fn test_dropped_entry_resolves_as_cancelled() {
        let coordinator = RefreshCoordinator::new();
        let enrollment = coordinator.enroll(request("/a"), CancellationToken::new());
        let Enrollment::Leader(waiter) = enrollment else {
            panic!("first enrollee must lead");
        };

        drop(coordinator.settle());

        assert_eq!(waiter.outcome().await, Err(SessionError::Cancelled));
    }
}
