// ── Published store state ──

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::NetCutStatus;

/// Everything the store publishes to subscribers, swapped as one value.
///
/// `status` is the last successfully applied poll and survives
/// disconnection; `connected` reflects the newest poll attempt whose
/// outcome was applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreSnapshot {
    pub status: Option<Arc<NetCutStatus>>,
    pub connected: bool,
    /// Dispatch sequence of the poll that produced `status` (0 = none yet).
    pub applied_sequence: u64,
    /// Dispatch sequence of the newest poll that decided `connected`.
    pub connectivity_sequence: u64,
    pub consecutive_failures: u32,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl StoreSnapshot {
    /// `true` once any poll outcome has been applied.
    pub fn has_polled(&self) -> bool {
        self.connectivity_sequence > 0
    }

    /// A snapshot exists but the backend is currently unreachable.
    pub fn is_stale(&self) -> bool {
        self.status.is_some() && !self.connected
    }
}

/// What one `poll()` did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum PollOutcome {
    /// The response replaced the snapshot.
    Applied { sequence: u64 },
    /// A newer poll had already been applied; nothing changed.
    Stale { sequence: u64 },
    /// The request failed and the store is now marked disconnected.
    Failed { sequence: u64 },
}

impl PollOutcome {
    pub fn sequence(self) -> u64 {
        match self {
            Self::Applied { sequence } | Self::Stale { sequence } | Self::Failed { sequence } => {
                sequence
            }
        }
    }

    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}
