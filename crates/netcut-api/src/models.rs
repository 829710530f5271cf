// Wire types for the NetCut backend REST contract.
//
// Field names are the wire contract. Every optional field carries an
// explicit default, and an explicit JSON `null` is read as "absent", so a
// structurally valid body never fails on a missing field.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

const MIDNIGHT: &str = "00:00";

fn midnight() -> String {
    MIDNIGHT.to_owned()
}

fn enabled_by_default() -> bool {
    true
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_midnight<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(midnight))
}

fn null_as_enabled<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

// ── GET /status ─────────────────────────────────────────────────────

/// Response body of `GET /status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_blocking: bool,
    #[serde(default)]
    pub active_mode: Option<String>,
    #[serde(default)]
    pub target_mac: Option<String>,
    #[serde(default)]
    pub target_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub presets: IndexMap<String, PresetWindow>,
    #[serde(default)]
    pub next_scheduled_action: Option<String>,
}

/// One preset slot as it appears in `presets` (and in `GET /presets`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetWindow {
    #[serde(default = "midnight", deserialize_with = "null_as_midnight")]
    pub start: String,
    #[serde(default = "midnight", deserialize_with = "null_as_midnight")]
    pub end: String,
    #[serde(default = "enabled_by_default", deserialize_with = "null_as_enabled")]
    pub enabled: bool,
}

impl Default for PresetWindow {
    fn default() -> Self {
        Self {
            start: midnight(),
            end: midnight(),
            enabled: true,
        }
    }
}

// ── GET /devices ────────────────────────────────────────────────────

/// One entry of the `GET /devices` scan result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEntry {
    pub mac: String,
    pub ip: String,
    #[serde(default)]
    pub name: Option<String>,
}

// ── GET / ───────────────────────────────────────────────────────────

/// Response body of the health-check root endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl Health {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

// ── Acknowledgements ────────────────────────────────────────────────

/// Acknowledgement returned by every write endpoint.
///
/// The contract treats the body as opaque: any JSON value is accepted,
/// and the known fields are picked out when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default = "enabled_by_default", deserialize_with = "null_as_enabled")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub is_blocking: Option<bool>,
    #[serde(default)]
    pub active_mode: Option<String>,
}

impl Default for Ack {
    fn default() -> Self {
        Self {
            success: true,
            message: None,
            is_blocking: None,
            active_mode: None,
        }
    }
}

impl Ack {
    /// Pick the known fields out of an arbitrary JSON value.
    ///
    /// Non-object bodies, and objects whose known fields have unexpected
    /// types, yield a bare successful ack.
    pub fn from_value(value: serde_json::Value) -> Self {
        if value.is_object() {
            serde_json::from_value(value).unwrap_or_default()
        } else {
            Self::default()
        }
    }
}

// ── Request bodies ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ToggleBlockRequest {
    pub block: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetModeRequest<'a> {
    pub mode: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleUpdateRequest<'a> {
    pub preset: &'a str,
    pub start: &'a str,
    pub end: &'a str,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetRequest<'a> {
    pub mac: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
}
