//! Client-side state engine between `netcut-api` and the NetCut CLI.
//!
//! The backend is only reachable by polling an unreliable local-network
//! REST endpoint. This crate keeps one authoritative picture of it:
//!
//! - **[`ReconciliationStore`]**: Owns the status snapshot and the
//!   connectivity flag. Every poll is stamped with a dispatch sequence;
//!   a response older than the last applied one is discarded, so a slow
//!   reply can never overwrite a fresher one. Failures mark the store
//!   disconnected but keep the last snapshot.
//!
//! - **[`MutationCoordinator`]**: Runs user writes as mutate-then-resync:
//!   send the [`Command`], then force a poll whatever the result. No
//!   optimistic updates, no retries.
//!
//! - **[`DeviceCatalog`]**: Last ARP scan result, replaced wholesale on
//!   success and kept on failure.
//!
//! - **[`Controller`]**: Wires the three together around a [`Gateway`]
//!   and runs the periodic poll task until [`shutdown()`](Controller::shutdown).
//!
//! All published state flows through `tokio::sync::watch` channels and is
//! exposed as [`StateStream`] subscriptions.

pub mod catalog;
pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod coordinator;
pub mod error;
pub mod gateway;
pub mod model;
pub mod store;
pub mod stream;

#[cfg(test)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use catalog::{CatalogState, DeviceCatalog, ScanPhase};
pub use command::{Command, ScheduleUpdate};
pub use config::{ControllerConfig, DEFAULT_POLL_INTERVAL};
pub use controller::Controller;
pub use coordinator::{MutationCoordinator, MutationOutcome, MutationState};
pub use error::CoreError;
pub use gateway::Gateway;
pub use store::{PollOutcome, ReconciliationStore, StoreSnapshot};
pub use stream::{StateStream, StateWatchStream};

pub use model::{
    DeviceInfo, KNOWN_PRESETS, MANUAL_MODE, MacAddress, NetCutStatus, PresetSchedule, Target,
    parse_hhmm,
};

// Wire-level types that surface through the public API.
pub use netcut_api::{Ack, Health};
