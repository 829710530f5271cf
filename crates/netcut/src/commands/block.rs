//! Blocking and mode handlers.

use netcut_core::{Command as CoreCommand, Controller, KNOWN_PRESETS, MANUAL_MODE};
use tracing::info;

use crate::cli::{GlobalOpts, ModeArgs};
use crate::error::CliError;

use super::util;

pub async fn handle(
    controller: &Controller,
    block: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let command = CoreCommand::SetBlocking { block };
    let label = command.to_string();
    let outcome = controller.execute(command).await;
    util::report_mutation(controller, &label, &outcome, global)
}

pub async fn mode(
    controller: &Controller,
    args: ModeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let command = CoreCommand::activate_mode(canonical_mode(&args.name))?;
    if let CoreCommand::ActivateMode { mode } = &command {
        if mode != MANUAL_MODE && !KNOWN_PRESETS.contains(&mode.as_str()) {
            info!(mode = %mode, "mode is not a built-in preset; sending as given");
        }
    }
    let label = command.to_string();
    let outcome = controller.execute(command).await;
    util::report_mutation(controller, &label, &outcome, global)
}

/// Match built-in preset names case-insensitively; anything else is passed
/// through so custom backend presets keep working.
fn canonical_mode(raw: &str) -> String {
    let trimmed = raw.trim();
    KNOWN_PRESETS
        .iter()
        .chain(std::iter::once(&MANUAL_MODE))
        .find(|known| known.eq_ignore_ascii_case(trimmed))
        .map_or_else(|| trimmed.to_owned(), |known| (*known).to_owned())
}
