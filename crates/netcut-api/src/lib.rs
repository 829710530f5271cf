// netcut-api: Async Rust client for the NetCut parental-control backend

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::NetcutClient;
pub use error::Error;
pub use models::{Ack, DeviceEntry, Health, PresetWindow, StatusResponse};
pub use transport::{DEFAULT_SCAN_TIMEOUT, DEFAULT_TIMEOUT, TransportConfig};
