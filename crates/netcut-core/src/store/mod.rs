// ── Reconciliation store ──
//
// Owns the authoritative status snapshot and connectivity flag. Every poll
// is stamped with a dispatch sequence before its request leaves; results
// are reconciled by that sequence, never by arrival order. Compare, swap,
// and notify happen inside one `send_if_modified` closure, which runs under
// the watch channel's lock.

mod snapshot;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::gateway::Gateway;
use crate::model::NetCutStatus;
use crate::stream::StateStream;

pub use snapshot::{PollOutcome, StoreSnapshot};

/// The poll/merge engine.
pub struct ReconciliationStore<G> {
    gateway: Arc<G>,
    /// Last sequence handed out. The first poll gets 1.
    dispatched: AtomicU64,
    state: watch::Sender<StoreSnapshot>,
}

impl<G: Gateway> ReconciliationStore<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        let (state, _) = watch::channel(StoreSnapshot::default());
        Self {
            gateway,
            dispatched: AtomicU64::new(0),
            state,
        }
    }

    /// Fetch status and reconcile the result.
    ///
    /// The sequence number is assigned and the request created when this
    /// method is called, before the returned future is first polled.
    /// Errors never escape: a failure marks the store disconnected and
    /// leaves the last snapshot in place.
    pub fn poll(&self) -> impl Future<Output = PollOutcome> + Send + '_ {
        let sequence = self.dispatched.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(sequence, "dispatching status poll");
        let request = self.gateway.fetch_status();
        async move {
            let result = request.await;
            self.reconcile(sequence, result)
        }
    }

    fn reconcile(&self, sequence: u64, result: Result<NetCutStatus, CoreError>) -> PollOutcome {
        match result {
            Ok(status) => {
                let mut outcome = PollOutcome::Stale { sequence };
                self.state.send_if_modified(|snap| {
                    if sequence < snap.applied_sequence {
                        return false;
                    }
                    snap.status = Some(Arc::new(status));
                    snap.applied_sequence = sequence;
                    snap.last_success_at = Some(Utc::now());
                    // An older success must not hide a newer failure.
                    if sequence >= snap.connectivity_sequence {
                        snap.connected = true;
                        snap.connectivity_sequence = sequence;
                        snap.consecutive_failures = 0;
                        snap.last_error = None;
                    }
                    outcome = PollOutcome::Applied { sequence };
                    true
                });
                match outcome {
                    PollOutcome::Applied { .. } => debug!(sequence, "status applied"),
                    _ => debug!(sequence, "discarding stale status response"),
                }
                outcome
            }
            Err(err) => {
                let mut outcome = PollOutcome::Stale { sequence };
                let message = err.to_string();
                self.state.send_if_modified(|snap| {
                    if sequence < snap.connectivity_sequence || sequence < snap.applied_sequence {
                        return false;
                    }
                    snap.connected = false;
                    snap.connectivity_sequence = sequence;
                    snap.consecutive_failures = snap.consecutive_failures.saturating_add(1);
                    snap.last_error = Some(message);
                    outcome = PollOutcome::Failed { sequence };
                    true
                });
                match outcome {
                    PollOutcome::Failed { .. } => {
                        warn!(sequence, error = %err, "status poll failed");
                    }
                    _ => debug!(sequence, error = %err, "ignoring failure of superseded poll"),
                }
                outcome
            }
        }
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Subscribe to every change of snapshot or connectivity.
    pub fn subscribe(&self) -> StateStream<StoreSnapshot> {
        StateStream::new(self.state.subscribe())
    }

    /// Raw watch receiver, for callers that select over several channels.
    pub fn watch(&self) -> watch::Receiver<StoreSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.borrow().clone()
    }

    /// The last successfully applied status, if any.
    pub fn current(&self) -> Option<Arc<NetCutStatus>> {
        self.state.borrow().status.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.state.borrow().connected
    }

    /// Number of polls dispatched so far.
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedGateway, lunch_status, manual_block_status, status, unreachable};
    use pretty_assertions::assert_eq;

    fn store() -> (Arc<ScriptedGateway>, ReconciliationStore<ScriptedGateway>) {
        let gateway = Arc::new(ScriptedGateway::default());
        let store = ReconciliationStore::new(Arc::clone(&gateway));
        (gateway, store)
    }

    #[tokio::test]
    async fn starts_empty_and_disconnected() {
        let (_, store) = store();
        let snap = store.snapshot();
        assert_eq!(snap.status, None);
        assert!(!snap.connected);
        assert!(!snap.has_polled());
        assert_eq!(store.dispatched(), 0);
    }

    #[tokio::test]
    async fn successful_poll_replaces_snapshot_and_connects() {
        let (gateway, store) = store();
        gateway.push_status(Ok(lunch_status()));

        let outcome = store.poll().await;

        assert_eq!(outcome, PollOutcome::Applied { sequence: 1 });
        let snap = store.snapshot();
        assert!(snap.connected);
        assert_eq!(snap.applied_sequence, 1);
        assert!(snap.last_success_at.is_some());
        assert_eq!(*snap.status.unwrap(), lunch_status());
    }

    #[tokio::test]
    async fn newer_dispatch_wins_when_older_response_arrives_last() {
        let (gateway, store) = store();
        let first_tx = gateway.defer_status();
        let second_tx = gateway.defer_status();

        let first = store.poll();
        let second = store.poll();

        second_tx.send(Ok(status(true))).unwrap();
        assert_eq!(second.await, PollOutcome::Applied { sequence: 2 });

        first_tx.send(Ok(status(false))).unwrap();
        assert_eq!(first.await, PollOutcome::Stale { sequence: 1 });

        let snap = store.snapshot();
        assert_eq!(snap.applied_sequence, 2);
        assert!(snap.status.unwrap().is_blocking);
    }

    #[tokio::test]
    async fn in_order_completion_applies_both() {
        let (gateway, store) = store();
        let first_tx = gateway.defer_status();
        let second_tx = gateway.defer_status();

        let first = store.poll();
        let second = store.poll();

        first_tx.send(Ok(status(false))).unwrap();
        assert!(first.await.is_applied());
        second_tx.send(Ok(status(true))).unwrap();
        assert!(second.await.is_applied());

        assert!(store.current().unwrap().is_blocking);
    }

    #[tokio::test]
    async fn stale_response_does_not_notify() {
        let (gateway, store) = store();
        let first_tx = gateway.defer_status();
        let second_tx = gateway.defer_status();
        let first = store.poll();
        let second = store.poll();

        second_tx.send(Ok(status(true))).unwrap();
        second.await;

        let mut rx = store.watch();
        rx.borrow_and_update();
        first_tx.send(Ok(status(false))).unwrap();
        first.await;

        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn failure_keeps_last_snapshot_and_disconnects() {
        let (gateway, store) = store();
        gateway.push_status(Ok(lunch_status()));
        gateway.push_status(Err(unreachable()));

        store.poll().await;
        let mut rx = store.watch();
        rx.borrow_and_update();

        let outcome = store.poll().await;

        assert_eq!(outcome, PollOutcome::Failed { sequence: 2 });
        assert!(rx.has_changed().unwrap());
        let snap = store.snapshot();
        assert!(!snap.connected);
        assert!(snap.is_stale());
        assert_eq!(snap.consecutive_failures, 1);
        assert_eq!(snap.applied_sequence, 1);
        assert!(snap.last_error.unwrap().contains("connection refused"));
        assert_eq!(*snap.status.unwrap(), lunch_status());
    }

    #[tokio::test]
    async fn failure_before_any_success_leaves_status_empty() {
        let (gateway, store) = store();
        gateway.push_status(Err(unreachable()));

        assert_eq!(store.poll().await, PollOutcome::Failed { sequence: 1 });
        let snap = store.snapshot();
        assert_eq!(snap.status, None);
        assert!(snap.has_polled());
        assert!(!snap.connected);
    }

    #[tokio::test]
    async fn recovery_resets_failure_count() {
        let (gateway, store) = store();
        gateway.push_status(Err(unreachable()));
        gateway.push_status(Err(unreachable()));
        gateway.push_status(Ok(status(false)));

        store.poll().await;
        store.poll().await;
        assert_eq!(store.snapshot().consecutive_failures, 2);

        store.poll().await;
        let snap = store.snapshot();
        assert!(snap.connected);
        assert_eq!(snap.consecutive_failures, 0);
        assert_eq!(snap.last_error, None);
    }

    #[tokio::test]
    async fn superseded_failure_is_ignored() {
        let (gateway, store) = store();
        let first_tx = gateway.defer_status();
        let second_tx = gateway.defer_status();
        let first = store.poll();
        let second = store.poll();

        second_tx.send(Ok(status(true))).unwrap();
        second.await;
        first_tx.send(Err(unreachable())).unwrap();

        assert_eq!(first.await, PollOutcome::Stale { sequence: 1 });
        assert!(store.is_connected());
    }

    #[tokio::test]
    async fn older_success_after_newer_failure_updates_data_but_stays_disconnected() {
        let (gateway, store) = store();
        let first_tx = gateway.defer_status();
        let second_tx = gateway.defer_status();
        let first = store.poll();
        let second = store.poll();

        second_tx.send(Err(unreachable())).unwrap();
        assert_eq!(second.await, PollOutcome::Failed { sequence: 2 });
        first_tx.send(Ok(status(true))).unwrap();
        assert_eq!(first.await, PollOutcome::Applied { sequence: 1 });

        let snap = store.snapshot();
        assert!(!snap.connected);
        assert!(snap.status.unwrap().is_blocking);
    }

    #[tokio::test]
    async fn successive_polls_replace_the_whole_snapshot() {
        let (gateway, store) = store();
        gateway.push_status(Ok(manual_block_status()));
        gateway.push_status(Ok(lunch_status()));

        store.poll().await;
        store.poll().await;

        let current = store.current().unwrap();
        assert_eq!(*current, lunch_status());
        assert_eq!(current.target, None);
        assert_eq!(current.active_mode, None);
    }

    #[tokio::test]
    async fn subscribers_see_each_applied_poll() {
        let (gateway, store) = store();
        let mut stream = store.subscribe();
        gateway.push_status(Ok(lunch_status()));

        store.poll().await;

        let snap = stream.changed().await.unwrap();
        assert!(snap.connected);
        assert_eq!(snap.applied_sequence, 1);
    }
}
