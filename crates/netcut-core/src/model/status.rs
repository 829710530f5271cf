// ── Status snapshot ──
//
// The authoritative picture of the backend. Always replaced whole; there
// is no field-level merging anywhere in the crate.

use chrono::NaiveTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::device::MacAddress;
use super::schedule::PresetSchedule;

/// Mode name the backend uses when no preset is driving the block.
pub const MANUAL_MODE: &str = "Manual";

/// Preset slots the backend ships with, in display order.
pub const KNOWN_PRESETS: [&str; 4] = ["Breakfast", "Lunch", "Dinner", "Bedtime"];

/// The device that blocking applies to.
///
/// A target is identified by its MAC; the name is optional decoration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub mac: MacAddress,
    pub name: Option<String>,
}

impl Target {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.mac.as_str())
    }
}

/// Backend status as returned by one successful poll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetCutStatus {
    pub is_blocking: bool,
    pub active_mode: Option<String>,
    pub target: Option<Target>,
    pub presets: IndexMap<String, PresetSchedule>,
    pub next_scheduled_action: Option<String>,
}

impl NetCutStatus {
    pub fn is_manual(&self) -> bool {
        self.active_mode.as_deref() == Some(MANUAL_MODE)
    }

    pub fn target_mac(&self) -> Option<&MacAddress> {
        self.target.as_ref().map(|t| &t.mac)
    }

    pub fn preset(&self, name: &str) -> Option<&PresetSchedule> {
        self.presets.get(name)
    }

    /// Enabled presets whose window contains `now`.
    pub fn presets_active_at(&self, now: NaiveTime) -> impl Iterator<Item = &str> + '_ {
        self.presets
            .iter()
            .filter(move |(_, p)| p.enabled && p.is_active_at(now))
            .map(|(name, _)| name.as_str())
    }
}
