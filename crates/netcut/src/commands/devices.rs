//! Device scan handler.

use tabled::Tabled;

use netcut_core::{Controller, DeviceInfo, MacAddress};

use crate::cli::{DevicesArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Target")]
    target: String,
}

fn row(d: &DeviceInfo, target: Option<&MacAddress>) -> DeviceRow {
    DeviceRow {
        name: d.name.clone().unwrap_or_default(),
        ip: d.ip.clone(),
        mac: d.mac.to_string(),
        target: if target == Some(&d.mac) { "*" } else { "" }.into(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // Reject a malformed MAC before the scan.
    let wanted = args.select.as_deref().map(MacAddress::parse).transpose()?;

    let catalog = controller.catalog();
    let devices = catalog.scan().await?;

    match wanted {
        None => {
            // Best effort: mark the current target if the backend answers.
            controller.poll().await;
            let snapshot = controller.snapshot();
            let target = snapshot.status.as_deref().and_then(|s| s.target_mac());

            let out = output::render_list(
                &global.output_format(),
                devices.as_slice(),
                |d| row(d, target),
                |d| d.mac.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        Some(mac) => {
            let state = catalog.state();
            let device = state.find(&mac).ok_or_else(|| CliError::DeviceNotFound {
                mac: mac.to_string(),
            })?;
            let label = format!("target {}", device.display_name());
            let outcome = catalog.select_target(device).await;
            util::report_mutation(controller, &label, &outcome, global)
        }
    }
}
