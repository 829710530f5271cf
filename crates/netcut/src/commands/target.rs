//! Target handlers.

use netcut_core::{Command as CoreCommand, Controller};

use crate::cli::{GlobalOpts, TargetArgs, TargetCommand};
use crate::error::CliError;

use super::util;

pub async fn handle(
    controller: &Controller,
    args: TargetArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let command = match args.command {
        TargetCommand::Set { mac, name } => CoreCommand::select_target(&mac, name.as_deref())?,
        TargetCommand::Clear => CoreCommand::ClearTarget,
    };
    let label = command.to_string();
    let outcome = controller.execute(command).await;
    util::report_mutation(controller, &label, &outcome, global)
}
