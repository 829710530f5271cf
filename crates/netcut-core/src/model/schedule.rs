// ── Preset schedule types ──

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Time-of-day format used on the wire for preset windows.
pub const TIME_FORMAT: &str = "%H:%M";

/// One named blocking window ("Lunch 12:00–13:00").
///
/// Times are kept as the backend's `"HH:MM"` strings; the parsed forms
/// are available through [`start_time`](Self::start_time) and
/// [`end_time`](Self::end_time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetSchedule {
    pub start: String,
    pub end: String,
    pub enabled: bool,
}

impl PresetSchedule {
    pub fn start_time(&self) -> Option<NaiveTime> {
        parse_hhmm(&self.start).ok()
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        parse_hhmm(&self.end).ok()
    }

    /// A window whose start is later than its end wraps past midnight
    /// (Bedtime 21:00–06:00).
    pub fn crosses_midnight(&self) -> bool {
        matches!((self.start_time(), self.end_time()), (Some(s), Some(e)) if s > e)
    }

    /// Whether `now` falls inside the window: `start <= now < end`, or
    /// `now >= start || now < end` for windows that wrap. The enabled flag
    /// is not consulted. Unparseable times are never active.
    pub fn is_active_at(&self, now: NaiveTime) -> bool {
        let (Some(start), Some(end)) = (self.start_time(), self.end_time()) else {
            return false;
        };
        if start > end {
            now >= start || now < end
        } else {
            start <= now && now < end
        }
    }
}

/// Parse a strict `"HH:MM"` time (two digits each, 24-hour clock).
pub fn parse_hhmm(raw: &str) -> Result<NaiveTime, CoreError> {
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 5
        && bytes.get(2) == Some(&b':')
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || b.is_ascii_digit());
    if !shaped {
        return Err(CoreError::Validation {
            message: format!("'{raw}' is not a time (expected HH:MM)"),
        });
    }
    NaiveTime::parse_from_str(raw, TIME_FORMAT).map_err(|e| CoreError::Validation {
        message: format!("'{raw}' is not a valid time of day: {e}"),
    })
}
