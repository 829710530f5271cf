// ── Controller ──
//
// Explicit lifecycle owner for one backend: builds the gateway from a
// validated config, wires store / coordinator / catalog together, and runs
// the periodic poll task until shutdown.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use tokio::sync::Mutex;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use netcut_api::{Health, NetcutClient};

use crate::catalog::DeviceCatalog;
use crate::command::Command;
use crate::config::ControllerConfig;
use crate::convert::convert_presets;
use crate::coordinator::{MutationCoordinator, MutationOutcome};
use crate::error::CoreError;
use crate::gateway::Gateway;
use crate::model::PresetSchedule;
use crate::store::{PollOutcome, ReconciliationStore, StoreSnapshot};
use crate::stream::StateStream;

/// The entry point for consumers.
///
/// Cheaply cloneable. Nothing runs until [`start()`](Self::start); after
/// [`shutdown()`](Self::shutdown) the poll loop is gone for good, though
/// the components stay readable.
pub struct Controller<G: Gateway = NetcutClient> {
    inner: Arc<ControllerInner<G>>,
}

impl<G: Gateway> Clone for Controller<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ControllerInner<G: Gateway> {
    config: ControllerConfig,
    gateway: Arc<G>,
    store: Arc<ReconciliationStore<G>>,
    coordinator: Arc<MutationCoordinator<G>>,
    catalog: Arc<DeviceCatalog<G>>,
    cancel: CancellationToken,
    poll_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Controller<NetcutClient> {
    /// Validate `config` and build an HTTP-backed controller.
    ///
    /// This is where a malformed base URL or a zero timeout fails; nothing
    /// is sent over the network.
    pub fn new(config: ControllerConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let client = NetcutClient::new(config.url.clone(), &config.transport())?;
        Ok(Self::with_gateway(config, client))
    }

    /// One-shot: poll once, run `f`, shut down. No background loop.
    pub async fn oneshot<F, Fut, T>(config: ControllerConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Controller) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.poll_interval = Duration::ZERO;

        let controller = Controller::new(cfg)?;
        controller.start().await;
        let result = f(controller.clone()).await;
        controller.shutdown().await;
        result
    }

    /// Current preset windows, read directly (bypasses the store).
    pub async fn presets(&self) -> Result<IndexMap<String, PresetSchedule>, CoreError> {
        let presets = self.inner.gateway.list_presets().await?;
        Ok(convert_presets(presets))
    }

    /// Backend liveness probe.
    pub async fn health(&self) -> Result<Health, CoreError> {
        Ok(self.inner.gateway.health().await?)
    }
}

impl<G: Gateway> Controller<G> {
    /// Wire a controller around an arbitrary gateway.
    pub fn with_gateway(config: ControllerConfig, gateway: G) -> Self {
        let gateway = Arc::new(gateway);
        let store = Arc::new(ReconciliationStore::new(Arc::clone(&gateway)));
        let coordinator = Arc::new(MutationCoordinator::new(
            Arc::clone(&gateway),
            Arc::clone(&store),
        ));
        let catalog = Arc::new(DeviceCatalog::new(
            Arc::clone(&gateway),
            Arc::clone(&coordinator),
        ));

        Self {
            inner: Arc::new(ControllerInner {
                config,
                gateway,
                store,
                coordinator,
                catalog,
                cancel: CancellationToken::new(),
                poll_handle: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<ReconciliationStore<G>> {
        &self.inner.store
    }

    pub fn coordinator(&self) -> &Arc<MutationCoordinator<G>> {
        &self.inner.coordinator
    }

    pub fn catalog(&self) -> &Arc<DeviceCatalog<G>> {
        &self.inner.catalog
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Poll once, then spawn the periodic poll task (unless the interval
    /// is zero or the task is already running).
    pub async fn start(&self) -> PollOutcome {
        let outcome = self.inner.store.poll().await;

        let period = self.inner.config.poll_interval;
        if period.is_zero() || self.inner.cancel.is_cancelled() {
            return outcome;
        }

        let mut handle = self.inner.poll_handle.lock().await;
        if handle.is_none() {
            info!(
                url = %self.inner.config.url,
                interval_ms = period.as_millis(),
                "starting status poll loop"
            );
            *handle = Some(tokio::spawn(poll_task(
                Arc::clone(&self.inner.store),
                period,
                self.inner.cancel.clone(),
            )));
        }
        outcome
    }

    /// Cancel the poll loop and abandon its in-flight requests.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let handle = self.inner.poll_handle.lock().await.take();
        if let Some(handle) = handle {
            let _ = handle.await;
            info!("status poll loop stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        !self.inner.cancel.is_cancelled()
    }

    // ── Shortcuts ────────────────────────────────────────────────────

    pub async fn poll(&self) -> PollOutcome {
        self.inner.store.poll().await
    }

    pub async fn execute(&self, command: Command) -> MutationOutcome {
        self.inner.coordinator.execute(command).await
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.inner.store.snapshot()
    }

    pub fn subscribe(&self) -> StateStream<StoreSnapshot> {
        self.inner.store.subscribe()
    }
}

// ── Background tasks ─────────────────────────────────────────────────

/// Fire one poll per tick. Each poll runs as its own task, so a slow
/// response never delays the next tick; the store's sequence guard sorts
/// out overlapping completions.
async fn poll_task<G: Gateway>(
    store: Arc<ReconciliationStore<G>>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // start() already polled

    let mut in_flight = JoinSet::new();
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                while in_flight.try_join_next().is_some() {}
                let store = Arc::clone(&store);
                in_flight.spawn(async move {
                    store.poll().await;
                });
            }
        }
    }

    if !in_flight.is_empty() {
        debug!(pending = in_flight.len(), "abandoning in-flight polls");
    }
    in_flight.shutdown().await;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedGateway, status, unreachable};

    fn config(poll_interval: Duration) -> ControllerConfig {
        let mut cfg = ControllerConfig::from_url_str("http://netcut.test:8000").unwrap();
        cfg.poll_interval = poll_interval;
        cfg
    }

    #[tokio::test(start_paused = true)]
    async fn poll_loop_fires_on_every_tick() {
        let gateway = ScriptedGateway::default();
        for _ in 0..4 {
            gateway.push_status(Ok(status(false)));
        }
        let controller = Controller::with_gateway(config(Duration::from_secs(2)), gateway);

        assert!(controller.start().await.is_applied());
        tokio::time::sleep(Duration::from_millis(6_500)).await;

        assert_eq!(controller.store().dispatched(), 4);
        assert!(controller.snapshot().connected);
        controller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_polling() {
        let gateway = ScriptedGateway::default();
        gateway.push_status(Ok(status(false)));
        let controller = Controller::with_gateway(config(Duration::from_secs(2)), gateway);

        controller.start().await;
        controller.shutdown().await;
        assert!(!controller.is_running());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(controller.store().dispatched(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_polls_only_once() {
        let gateway = ScriptedGateway::default();
        gateway.push_status(Err(unreachable()));
        let controller = Controller::with_gateway(config(Duration::ZERO), gateway);

        assert_eq!(controller.start().await, PollOutcome::Failed { sequence: 1 });
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(controller.store().dispatched(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_abandons_a_hung_poll() {
        let gateway = ScriptedGateway::default();
        gateway.push_status(Ok(status(false)));
        let hung = gateway.defer_status();
        let controller = Controller::with_gateway(config(Duration::from_secs(2)), gateway);

        controller.start().await;
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(controller.store().dispatched(), 2);

        controller.shutdown().await;
        drop(hung);
        assert_eq!(controller.snapshot().applied_sequence, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_tick_does_not_hold_back_the_next_one() {
        let gateway = ScriptedGateway::default();
        gateway.push_status(Ok(status(false)));
        let slow = gateway.defer_status();
        gateway.push_status(Ok(status(false)));
        let controller = Controller::with_gateway(config(Duration::from_secs(2)), gateway);

        controller.start().await;
        tokio::time::sleep(Duration::from_millis(4_500)).await;

        assert_eq!(controller.store().dispatched(), 3);
        assert_eq!(controller.snapshot().applied_sequence, 3);

        // Tick 2 finally answers with a different picture; it is older
        // than what the store holds and must not land.
        slow.send(Ok(status(true))).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.applied_sequence, 3);
        assert!(!snapshot.status.unwrap().is_blocking);
        controller.shutdown().await;
    }

    #[test]
    fn new_rejects_unusable_urls() {
        let mut cfg = config(Duration::from_secs(2));
        cfg.url = url::Url::parse("ftp://netcut.test").unwrap();
        assert!(matches!(
            Controller::new(cfg),
            Err(CoreError::Config { .. })
        ));
    }
}
