//! Shared helpers for command handlers.

use tracing::warn;

use netcut_core::{Controller, MutationOutcome, StoreSnapshot};

use crate::cli::GlobalOpts;
use crate::error::CliError;

use super::status;

/// Unreachable-backend error carrying the store's last failure reason.
pub fn connection_error(controller: &Controller, snapshot: &StoreSnapshot) -> CliError {
    CliError::ConnectionFailed {
        url: controller.config().url.to_string(),
        reason: snapshot
            .last_error
            .clone()
            .unwrap_or_else(|| "no response".into()),
    }
}

/// Poll once and require a fresh status.
pub async fn poll_once(controller: &Controller) -> Result<StoreSnapshot, CliError> {
    controller.start().await;
    let snapshot = controller.snapshot();
    if snapshot.status.is_none() || !snapshot.connected {
        return Err(connection_error(controller, &snapshot));
    }
    Ok(snapshot)
}

/// Print whatever the resync poll left in the store, then turn a failed
/// write into an error.
///
/// A write that failed while the backend is unreachable reports as a
/// connection error; one the backend answered but refused reports as
/// `NotApplied`.
pub fn report_mutation(
    controller: &Controller,
    label: &str,
    outcome: &MutationOutcome,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let snapshot = controller.snapshot();
    status::print_snapshot(&snapshot, global)?;

    if outcome.accepted {
        if !outcome.resync.is_applied() {
            warn!("{label} was accepted but the status refresh failed");
        }
        return Ok(());
    }

    if snapshot.connected {
        Err(CliError::NotApplied {
            command: label.to_owned(),
            reason: outcome
                .message
                .clone()
                .unwrap_or_else(|| "rejected by backend".into()),
        })
    } else {
        Err(connection_error(controller, &snapshot))
    }
}
