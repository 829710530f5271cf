//! Health probe handler.

use netcut_core::{Controller, Health};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

fn detail(h: &Health, color: bool) -> String {
    let mut lines = vec![format!("Status:  {}", output::paint(&h.status, h.is_ok(), color))];
    if let Some(message) = &h.message {
        lines.push(format!("Message: {message}"));
    }
    lines.join("\n")
}

pub async fn handle(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let health = controller.health().await?;
    let color = output::should_color(&global.color_mode());
    let out = output::render_single(
        &global.output_format(),
        &health,
        |h| detail(h, color),
        |h| h.status.clone(),
    )?;
    output::print_output(&out, global.quiet);

    if health.is_ok() {
        Ok(())
    } else {
        Err(CliError::Api {
            message: health
                .message
                .unwrap_or_else(|| format!("backend reports '{}'", health.status)),
            status: None,
        })
    }
}
