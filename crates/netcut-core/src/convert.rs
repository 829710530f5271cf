// ── API-to-domain type conversions ──
//
// Bridges raw `netcut_api` wire types into `netcut_core::model` domain
// types. Wire defaults have already been applied by the decoder; this layer
// normalizes identifiers and enforces the target invariant.

use indexmap::IndexMap;
use tracing::debug;

use netcut_api::{DeviceEntry, PresetWindow, StatusResponse};

use crate::model::{DeviceInfo, MacAddress, NetCutStatus, PresetSchedule, Target};

// ── Helpers ────────────────────────────────────────────────────────

/// Treat blank strings the same as absent ones.
fn non_blank(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

// ── Conversions ────────────────────────────────────────────────────

impl From<PresetWindow> for PresetSchedule {
    fn from(w: PresetWindow) -> Self {
        Self {
            start: w.start,
            end: w.end,
            enabled: w.enabled,
        }
    }
}

impl From<DeviceEntry> for DeviceInfo {
    fn from(d: DeviceEntry) -> Self {
        Self {
            mac: MacAddress::new(d.mac),
            ip: d.ip,
            name: non_blank(d.name),
        }
    }
}

impl From<StatusResponse> for NetCutStatus {
    fn from(s: StatusResponse) -> Self {
        let target_name = non_blank(s.target_name);
        // A name without a MAC cannot identify anything.
        let target = match non_blank(s.target_mac) {
            Some(mac) => Some(Target {
                mac: MacAddress::new(mac),
                name: target_name,
            }),
            None => {
                if let Some(name) = target_name {
                    debug!(target_name = %name, "dropping target name reported without a MAC");
                }
                None
            }
        };

        Self {
            is_blocking: s.is_blocking,
            active_mode: non_blank(s.active_mode),
            target,
            presets: convert_presets(s.presets),
            next_scheduled_action: non_blank(s.next_scheduled_action),
        }
    }
}

pub(crate) fn convert_presets(
    presets: IndexMap<String, PresetWindow>,
) -> IndexMap<String, PresetSchedule> {
    presets
        .into_iter()
        .map(|(name, window)| (name, PresetSchedule::from(window)))
        .collect()
}
