// ── Domain model ──

pub mod device;
pub mod schedule;
pub mod status;

pub use device::{DeviceInfo, MacAddress};
pub use schedule::{PresetSchedule, TIME_FORMAT, parse_hhmm};
pub use status::{KNOWN_PRESETS, MANUAL_MODE, NetCutStatus, Target};
