// Scripted gateway for engine tests.
//
// Every status fetch and scan is backed by a oneshot channel the test
// resolves explicitly, so tests decide completion order independently of
// dispatch order. The receiver is taken synchronously when the request is
// created, which pins each dispatch sequence to its script slot.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;

use tokio::sync::oneshot;

use netcut_api::Ack;

use crate::error::CoreError;
use crate::gateway::Gateway;
use crate::model::{DeviceInfo, MacAddress, NetCutStatus, PresetSchedule, Target};

type StatusReply = Result<NetCutStatus, CoreError>;
type ScanReply = Result<Vec<DeviceInfo>, CoreError>;

/// A write the engine sent to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Write {
    SetBlocking(bool),
    ActivateMode(String),
    UpdateSchedule {
        preset: String,
        start: String,
        end: String,
        enabled: bool,
    },
    SelectTarget(MacAddress, Option<String>),
    ClearTarget,
}

#[derive(Default)]
pub(crate) struct ScriptedGateway {
    statuses: Mutex<VecDeque<oneshot::Receiver<StatusReply>>>,
    acks: Mutex<VecDeque<Result<Ack, CoreError>>>,
    scans: Mutex<VecDeque<oneshot::Receiver<ScanReply>>>,
    writes: Mutex<Vec<Write>>,
}

impl ScriptedGateway {
    /// Queue a status reply the test resolves later.
    pub(crate) fn defer_status(&self) -> oneshot::Sender<StatusReply> {
        let (tx, rx) = oneshot::channel();
        self.statuses.lock().unwrap().push_back(rx);
        tx
    }

    /// Queue an immediately-available status reply.
    pub(crate) fn push_status(&self, reply: StatusReply) {
        let tx = self.defer_status();
        let _ = tx.send(reply);
    }

    pub(crate) fn push_ack(&self, reply: Result<Ack, CoreError>) {
        self.acks.lock().unwrap().push_back(reply);
    }

    /// Queue a scan reply the test resolves later.
    pub(crate) fn defer_scan(&self) -> oneshot::Sender<ScanReply> {
        let (tx, rx) = oneshot::channel();
        self.scans.lock().unwrap().push_back(rx);
        tx
    }

    pub(crate) fn push_scan(&self, reply: ScanReply) {
        let tx = self.defer_scan();
        let _ = tx.send(reply);
    }

    pub(crate) fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    fn record(&self, write: Write) -> Result<Ack, CoreError> {
        self.writes.lock().unwrap().push(write);
        self.acks
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Ack::default()))
    }
}

impl Gateway for ScriptedGateway {
    fn fetch_status(&self) -> impl Future<Output = StatusReply> + Send {
        let slot = self.statuses.lock().unwrap().pop_front();
        async move {
            match slot {
                Some(rx) => rx.await.unwrap_or_else(|_| Err(unreachable())),
                None => Err(unreachable()),
            }
        }
    }

    async fn set_blocking(&self, block: bool) -> Result<Ack, CoreError> {
        self.record(Write::SetBlocking(block))
    }

    async fn activate_mode(&self, mode: &str) -> Result<Ack, CoreError> {
        self.record(Write::ActivateMode(mode.to_owned()))
    }

    async fn update_schedule(
        &self,
        preset: &str,
        start: &str,
        end: &str,
        enabled: bool,
    ) -> Result<Ack, CoreError> {
        self.record(Write::UpdateSchedule {
            preset: preset.to_owned(),
            start: start.to_owned(),
            end: end.to_owned(),
            enabled,
        })
    }

    fn scan_devices(&self) -> impl Future<Output = ScanReply> + Send {
        let slot = self.scans.lock().unwrap().pop_front();
        async move {
            match slot {
                Some(rx) => rx.await.unwrap_or_else(|_| Err(unreachable())),
                None => Err(unreachable()),
            }
        }
    }

    async fn select_target(&self, mac: &MacAddress, name: Option<&str>) -> Result<Ack, CoreError> {
        self.record(Write::SelectTarget(mac.clone(), name.map(str::to_owned)))
    }

    async fn clear_target(&self) -> Result<Ack, CoreError> {
        self.record(Write::ClearTarget)
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────

pub(crate) fn unreachable() -> CoreError {
    CoreError::Disconnected {
        url: "http://netcut.test/".into(),
        reason: "connection refused".into(),
    }
}

pub(crate) fn status(is_blocking: bool) -> NetCutStatus {
    NetCutStatus {
        is_blocking,
        ..NetCutStatus::default()
    }
}

/// Unblocked, with a single Lunch preset 12:00-13:00.
pub(crate) fn lunch_status() -> NetCutStatus {
    let mut status = status(false);
    status.presets.insert(
        "Lunch".into(),
        PresetSchedule {
            start: "12:00".into(),
            end: "13:00".into(),
            enabled: true,
        },
    );
    status
}

/// Blocked in manual mode against `AA:BB:CC:DD:EE:FF`.
pub(crate) fn manual_block_status() -> NetCutStatus {
    NetCutStatus {
        is_blocking: true,
        active_mode: Some("Manual".into()),
        target: Some(Target {
            mac: MacAddress::new("AA:BB:CC:DD:EE:FF"),
            name: None,
        }),
        ..NetCutStatus::default()
    }
}

pub(crate) fn device(mac: &str, ip: &str, name: Option<&str>) -> DeviceInfo {
    DeviceInfo {
        mac: MacAddress::new(mac),
        ip: ip.into(),
        name: name.map(str::to_owned),
    }
}
