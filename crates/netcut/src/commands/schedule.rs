//! Preset window handlers.

use chrono::{Local, NaiveTime};
use serde::Serialize;
use tabled::Tabled;

use netcut_core::{Command as CoreCommand, Controller, PresetSchedule, ScheduleUpdate};

use crate::cli::{GlobalOpts, ScheduleArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct PresetEntry {
    name: String,
    #[serde(flatten)]
    window: PresetSchedule,
    active_now: bool,
}

impl PresetEntry {
    fn new(name: String, window: PresetSchedule, now: NaiveTime) -> Self {
        let active_now = window.enabled && window.is_active_at(now);
        Self {
            name,
            window,
            active_now,
        }
    }
}

#[derive(Tabled)]
struct PresetRow {
    #[tabled(rename = "Preset")]
    name: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Active")]
    active: String,
}

impl From<&PresetEntry> for PresetRow {
    fn from(p: &PresetEntry) -> Self {
        let end = if p.window.crosses_midnight() {
            format!("{} (+1d)", p.window.end)
        } else {
            p.window.end.clone()
        };
        Self {
            name: p.name.clone(),
            start: p.window.start.clone(),
            end,
            enabled: if p.window.enabled { "yes" } else { "no" }.into(),
            active: if p.active_now { "now" } else { "" }.into(),
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: ScheduleArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let update = ScheduleUpdate::new(&args.preset, &args.start, &args.end, !args.disable)?;
    let command = CoreCommand::from(update);
    let label = command.to_string();
    let outcome = controller.execute(command).await;
    util::report_mutation(controller, &label, &outcome, global)
}

pub async fn presets(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let now = Local::now().time();
    let entries: Vec<PresetEntry> = controller
        .presets()
        .await?
        .into_iter()
        .map(|(name, window)| PresetEntry::new(name, window, now))
        .collect();

    let out = output::render_list(
        &global.output_format(),
        &entries,
        |p| PresetRow::from(p),
        |p| p.name.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: &str, end: &str, enabled: bool) -> PresetSchedule {
        PresetSchedule {
            start: start.into(),
            end: end.into(),
            enabled,
        }
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default()
    }

    #[test]
    fn overnight_windows_are_marked() {
        let entry = PresetEntry::new("Bedtime".into(), window("21:00", "06:00", true), at(23, 30));
        let row = PresetRow::from(&entry);
        assert_eq!(row.end, "06:00 (+1d)");
        assert_eq!(row.active, "now");
    }

    #[test]
    fn disabled_windows_are_never_active() {
        let entry = PresetEntry::new("Lunch".into(), window("12:00", "13:00", false), at(12, 30));
        assert!(!entry.active_now);
        assert_eq!(PresetRow::from(&entry).enabled, "no");
    }
}
