//! Status and watch handlers.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use netcut_core::{Controller, NetCutStatus, StoreSnapshot};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Serialized view ─────────────────────────────────────────────────

/// What `status` emits for json / yaml: the backend status plus how fresh
/// it is.
#[derive(Debug, Serialize)]
struct StatusView<'a> {
    connected: bool,
    #[serde(flatten)]
    status: &'a NetCutStatus,
    last_success_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_error: Option<&'a str>,
}

impl<'a> StatusView<'a> {
    fn new(snapshot: &'a StoreSnapshot, status: &'a NetCutStatus) -> Self {
        Self {
            connected: snapshot.connected,
            status,
            last_success_at: snapshot.last_success_at,
            last_error: snapshot.last_error.as_deref(),
        }
    }
}

fn blocking_label(status: &NetCutStatus) -> &'static str {
    if status.is_blocking { "BLOCKING" } else { "allowed" }
}

fn detail(view: &StatusView<'_>, color: bool) -> String {
    let status = view.status;
    let now = Local::now().time();

    let mut lines = vec![
        format!(
            "Blocking: {}",
            output::paint(blocking_label(status), !status.is_blocking, color)
        ),
        format!("Mode:     {}", status.active_mode.as_deref().unwrap_or("-")),
        format!(
            "Target:   {}",
            status.target.as_ref().map_or_else(
                || "-".into(),
                |t| match &t.name {
                    Some(name) => format!("{name} ({})", t.mac),
                    None => t.mac.to_string(),
                }
            )
        ),
        format!(
            "Next:     {}",
            status.next_scheduled_action.as_deref().unwrap_or("-")
        ),
    ];

    if !status.presets.is_empty() {
        lines.push("Presets:".into());
        for (name, preset) in &status.presets {
            let mut line = format!(
                "  {name:<10} {}-{}  {}",
                preset.start,
                preset.end,
                if preset.enabled { "enabled " } else { "disabled" }
            );
            if preset.enabled && preset.is_active_at(now) {
                line.push_str("  (active now)");
            }
            lines.push(line);
        }
    }

    if !view.connected {
        let since = view.last_success_at.map_or_else(
            || "never".into(),
            |t| t.with_timezone(&Local).format("%H:%M:%S").to_string(),
        );
        lines.push(output::warn_paint(
            &format!("Backend unreachable; showing state from {since}"),
            color,
        ));
    }
    lines.join("\n")
}

// ── Rendering ───────────────────────────────────────────────────────

/// Print the store's current status, if it has one.
pub fn print_snapshot(snapshot: &StoreSnapshot, global: &GlobalOpts) -> Result<(), CliError> {
    let Some(status) = snapshot.status.as_deref() else {
        return Ok(());
    };
    let color = output::should_color(&global.color_mode());
    let view = StatusView::new(snapshot, status);
    let out = output::render_single(
        &global.output_format(),
        &view,
        |v| detail(v, color),
        |v| blocking_label(v.status).to_lowercase(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// One line per change for `watch`.
fn watch_line(
    snapshot: &StoreSnapshot,
    format: &OutputFormat,
    color: bool,
) -> Result<String, CliError> {
    let stamp = Local::now().format("%H:%M:%S");
    let Some(status) = snapshot.status.as_deref() else {
        let reason = snapshot.last_error.as_deref().unwrap_or("no response");
        let line = output::warn_paint(&format!("unreachable: {reason}"), color);
        return Ok(format!("[{stamp}] {line}"));
    };
    let view = StatusView::new(snapshot, status);
    match format {
        OutputFormat::Table => {
            let mut line = format!(
                "[{stamp}] {}  mode={}  target={}",
                output::paint(blocking_label(status), !status.is_blocking, color),
                status.active_mode.as_deref().unwrap_or("-"),
                status.target.as_ref().map_or("-", |t| t.display_name()),
            );
            if !snapshot.connected {
                line.push_str(&format!("  {}", output::warn_paint("(stale)", color)));
            }
            Ok(line)
        }
        OutputFormat::Plain => Ok(blocking_label(status).to_lowercase()),
        OutputFormat::Json | OutputFormat::JsonCompact => output::render_json(&view, true),
        OutputFormat::Yaml => Ok(format!("---\n{}", output::render_yaml(&view)?)),
    }
}

/// Whether two snapshots would render the same for `watch`.
fn same_picture(a: &StoreSnapshot, b: &StoreSnapshot) -> bool {
    a.connected == b.connected && a.status == b.status
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = util::poll_once(controller).await?;
    print_snapshot(&snapshot, global)
}

/// Run the poll loop and print every visible change until Ctrl-C or
/// `--count` updates.
pub async fn watch(
    controller: &Controller,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color_mode());
    let format = global.output_format();

    controller.start().await;
    let mut updates = controller.subscribe();
    let mut last = updates.current().clone();
    output::print_output(&watch_line(&last, &format, color)?, global.quiet);
    let mut printed: u64 = 1;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        if args.count.is_some_and(|n| printed >= n) {
            break;
        }
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            next = updates.changed() => {
                let Some(snapshot) = next else { break };
                if same_picture(&last, &snapshot) {
                    continue;
                }
                let line = watch_line(&snapshot, &format, color)?;
                output::print_output(&line, global.quiet);
                printed += 1;
                last = snapshot;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use indexmap::IndexMap;
    use netcut_core::{MacAddress, PresetSchedule, Target};

    use super::*;

    fn snapshot(connected: bool) -> StoreSnapshot {
        let mut presets = IndexMap::new();
        presets.insert(
            "Lunch".to_string(),
            PresetSchedule {
                start: "12:00".into(),
                end: "13:00".into(),
                enabled: true,
            },
        );
        StoreSnapshot {
            status: Some(Arc::new(NetCutStatus {
                is_blocking: true,
                active_mode: Some("Lunch".into()),
                target: Some(Target {
                    mac: MacAddress::new("aa:bb:cc:dd:ee:ff"),
                    name: Some("Kid-iPad".into()),
                }),
                presets,
                next_scheduled_action: None,
            })),
            connected,
            applied_sequence: 1,
            connectivity_sequence: 1,
            ..StoreSnapshot::default()
        }
    }

    #[test]
    fn detail_lists_state_target_and_presets() {
        let snap = snapshot(true);
        let view = StatusView::new(&snap, snap.status.as_deref().unwrap());
        let text = detail(&view, false);
        assert!(text.contains("Blocking: BLOCKING"));
        assert!(text.contains("Kid-iPad (AA:BB:CC:DD:EE:FF)"));
        assert!(text.contains("Lunch      12:00-13:00"));
        assert!(!text.contains("unreachable"));
    }

    #[test]
    fn stale_snapshot_is_flagged() {
        let snap = snapshot(false);
        let view = StatusView::new(&snap, snap.status.as_deref().unwrap());
        assert!(detail(&view, false).contains("Backend unreachable; showing state from never"));
        let line = watch_line(&snap, &OutputFormat::Table, false).unwrap();
        assert!(line.ends_with("(stale)"));
    }

    #[test]
    fn json_view_flattens_status_fields() {
        let snap = snapshot(true);
        let view = StatusView::new(&snap, snap.status.as_deref().unwrap());
        let json: serde_json::Value =
            serde_json::from_str(&output::render_json(&view, true).unwrap()).unwrap();
        assert_eq!(json["connected"], true);
        assert_eq!(json["is_blocking"], true);
        assert_eq!(json["target"]["name"], "Kid-iPad");
        assert!(json.get("last_error").is_none());
    }

    #[test]
    fn unchanged_pictures_are_not_reprinted() {
        let a = snapshot(true);
        let mut b = a.clone();
        b.applied_sequence = 2;
        b.last_success_at = Some(Utc::now());
        assert!(same_picture(&a, &b));
        assert!(!same_picture(&a, &snapshot(false)));
    }
}
