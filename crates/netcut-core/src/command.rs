// ── Command API ──
//
// Typed write intents. Inputs are validated when a command is built, so
// the coordinator only ever sees requests the backend could accept.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;
use crate::model::{MacAddress, parse_hhmm};

/// A user-initiated write against the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "command")]
pub enum Command {
    SetBlocking {
        block: bool,
    },
    ActivateMode {
        mode: String,
    },
    UpdateSchedule(ScheduleUpdate),
    SelectTarget {
        mac: MacAddress,
        name: Option<String>,
    },
    ClearTarget,
}

impl Command {
    /// Activate a preset (or the manual sentinel) by name.
    pub fn activate_mode(mode: impl Into<String>) -> Result<Self, CoreError> {
        let mode = mode.into();
        let trimmed = mode.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation {
                message: "mode name must not be empty".into(),
            });
        }
        Ok(Self::ActivateMode {
            mode: trimmed.to_owned(),
        })
    }

    /// Point blocking at a device. The MAC must be well formed.
    pub fn select_target(mac: &str, name: Option<&str>) -> Result<Self, CoreError> {
        Ok(Self::SelectTarget {
            mac: MacAddress::parse(mac)?,
            name: name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_owned),
        })
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetBlocking { .. } => "set_blocking",
            Self::ActivateMode { .. } => "activate_mode",
            Self::UpdateSchedule(_) => "update_schedule",
            Self::SelectTarget { .. } => "select_target",
            Self::ClearTarget => "clear_target",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetBlocking { block: true } => f.write_str("block"),
            Self::SetBlocking { block: false } => f.write_str("unblock"),
            Self::ActivateMode { mode } => write!(f, "activate mode {mode}"),
            Self::UpdateSchedule(update) => write!(
                f,
                "schedule {} {}-{} ({})",
                update.preset,
                update.start,
                update.end,
                if update.enabled { "enabled" } else { "disabled" }
            ),
            Self::SelectTarget { mac, name: Some(name) } => write!(f, "target {name} ({mac})"),
            Self::SelectTarget { mac, name: None } => write!(f, "target {mac}"),
            Self::ClearTarget => f.write_str("clear target"),
        }
    }
}

/// A validated edit to one preset window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleUpdate {
    preset: String,
    start: String,
    end: String,
    enabled: bool,
}

impl ScheduleUpdate {
    /// Validate `start`/`end` as strict 24-hour `HH:MM` times.
    pub fn new(
        preset: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
        enabled: bool,
    ) -> Result<Self, CoreError> {
        let preset = preset.into().trim().to_owned();
        if preset.is_empty() {
            return Err(CoreError::Validation {
                message: "preset name must not be empty".into(),
            });
        }
        let start = start.into();
        let end = end.into();
        parse_hhmm(&start)?;
        parse_hhmm(&end)?;
        Ok(Self {
            preset,
            start,
            end,
            enabled,
        })
    }

    pub fn preset(&self) -> &str {
        &self.preset
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

impl From<ScheduleUpdate> for Command {
    fn from(update: ScheduleUpdate) -> Self {
        Self::UpdateSchedule(update)
    }
}
