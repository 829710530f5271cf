//! Command dispatch: bridges CLI args -> core intents -> output formatting.

pub mod block;
pub mod config_cmd;
pub mod devices;
pub mod health;
pub mod schedule;
pub mod status;
pub mod target;
pub mod util;

use netcut_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(controller, global).await,
        Command::Watch(args) => status::watch(controller, args, global).await,
        Command::Block => block::handle(controller, true, global).await,
        Command::Unblock => block::handle(controller, false, global).await,
        Command::Mode(args) => block::mode(controller, args, global).await,
        Command::Schedule(args) => schedule::handle(controller, args, global).await,
        Command::Presets => schedule::presets(controller, global).await,
        Command::Devices(args) => devices::handle(controller, args, global).await,
        Command::Target(args) => target::handle(controller, args, global).await,
        Command::Health => health::handle(controller, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
