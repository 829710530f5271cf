// ── Device catalog ──
//
// Ephemeral cache of the last ARP scan. Lives apart from the status
// snapshot: scan failures never touch connectivity, and picking a device
// goes through the coordinator, never by writing the target directly.
//
// Scans are sequenced like status polls. A result lands only if no later
// scan has already settled, so overlapping scans cannot roll the list back.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::coordinator::{MutationCoordinator, MutationOutcome};
use crate::error::CoreError;
use crate::gateway::Gateway;
use crate::model::{DeviceInfo, MacAddress};
use crate::stream::StateStream;

/// Lifecycle of the most recent scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum ScanPhase {
    /// No scan has run yet.
    #[default]
    Idle,
    Scanning,
    /// The last scan succeeded; `devices` holds its result, possibly empty.
    Ready,
    /// The last scan failed; `devices` still holds the previous result.
    Failed { reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogState {
    pub devices: Arc<Vec<DeviceInfo>>,
    pub phase: ScanPhase,
    /// Sequence of the scan that last settled `phase`. Zero before any.
    #[serde(skip)]
    pub settled_sequence: u64,
}

impl CatalogState {
    pub fn find(&self, mac: &MacAddress) -> Option<&DeviceInfo> {
        self.devices.iter().find(|d| &d.mac == mac)
    }
}

pub struct DeviceCatalog<G> {
    gateway: Arc<G>,
    coordinator: Arc<MutationCoordinator<G>>,
    /// Last scan sequence handed out. The first scan gets 1.
    dispatched: AtomicU64,
    state: watch::Sender<CatalogState>,
}

impl<G: Gateway> DeviceCatalog<G> {
    pub fn new(gateway: Arc<G>, coordinator: Arc<MutationCoordinator<G>>) -> Self {
        let (state, _) = watch::channel(CatalogState::default());
        Self {
            gateway,
            coordinator,
            dispatched: AtomicU64::new(0),
            state,
        }
    }

    /// Run an ARP scan through the backend.
    ///
    /// Success replaces the cached list wholesale, including with an empty
    /// one. Failure keeps the previous list and moves to
    /// [`ScanPhase::Failed`]. The sequence is assigned when this method is
    /// called; a result older than the last settled scan is returned to
    /// the caller but leaves the catalog untouched. The phase stays
    /// [`ScanPhase::Scanning`] while a newer scan is still out.
    pub fn scan(
        &self,
    ) -> impl Future<Output = Result<Arc<Vec<DeviceInfo>>, CoreError>> + Send + '_ {
        let sequence = self.dispatched.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(sequence, "dispatching device scan");
        self.state.send_modify(|s| s.phase = ScanPhase::Scanning);
        let request = self.gateway.scan_devices();
        async move {
            match request.await {
                Ok(devices) => {
                    let devices = Arc::new(devices);
                    let applied = self.settle(sequence, |s, phase| {
                        s.devices = Arc::clone(&devices);
                        s.phase = phase.unwrap_or(ScanPhase::Ready);
                    });
                    if applied {
                        info!(count = devices.len(), "device scan complete");
                    } else {
                        debug!(sequence, "discarding superseded scan result");
                    }
                    Ok(devices)
                }
                Err(err) => {
                    warn!(sequence, error = %err, "device scan failed");
                    let reason = err.to_string();
                    self.settle(sequence, |s, phase| {
                        s.phase = phase.unwrap_or(ScanPhase::Failed { reason });
                    });
                    Err(err)
                }
            }
        }
    }

    /// Apply a finished scan if nothing newer has settled. `apply` gets
    /// `Some(Scanning)` when a later scan is still outstanding.
    fn settle(
        &self,
        sequence: u64,
        apply: impl FnOnce(&mut CatalogState, Option<ScanPhase>),
    ) -> bool {
        self.state.send_if_modified(|s| {
            if sequence < s.settled_sequence {
                return false;
            }
            let pending = self.dispatched.load(Ordering::SeqCst) > sequence;
            apply(s, pending.then_some(ScanPhase::Scanning));
            s.settled_sequence = sequence;
            true
        })
    }

    /// Make `device` the blocking target (mutate-then-resync).
    pub async fn select_target(&self, device: &DeviceInfo) -> MutationOutcome {
        self.coordinator
            .select_target(device.mac.clone(), device.name.clone())
            .await
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn subscribe(&self) -> StateStream<CatalogState> {
        StateStream::new(self.state.subscribe())
    }

    pub fn state(&self) -> CatalogState {
        self.state.borrow().clone()
    }

    pub fn devices(&self) -> Arc<Vec<DeviceInfo>> {
        Arc::clone(&self.state.borrow().devices)
    }

    pub fn phase(&self) -> ScanPhase {
        self.state.borrow().phase.clone()
    }
}
