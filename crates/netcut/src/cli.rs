//! Clap derive structures for the `netcut` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netcut -- control a NetCut parental-control scheduler
#[derive(Debug, Parser)]
#[command(
    name = "netcut",
    version,
    about = "Control a NetCut parental-control backend from the command line",
    long_about = "Inspect and change blocking state, presets, and the target device\n\
        of a NetCut scheduler reachable over the local network.\n\n\
        Every write is followed by a fresh status poll, so what is printed\n\
        afterwards is what the backend reports, not what was requested.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Clone, Args)]
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(long, short = 'p', env = "NETCUT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile), e.g. http://192.168.1.5:8000
    #[arg(long, short = 'b', env = "NETCUT_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Output format [default: config `defaults.output`, else table]
    #[arg(long, short = 'o', env = "NETCUT_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: config `defaults.color`, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in milliseconds (overrides profile)
    #[arg(long, env = "NETCUT_TIMEOUT_MS", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    /// The output format in effect. Unset means table.
    pub fn output_format(&self) -> OutputFormat {
        self.output.clone().unwrap_or(OutputFormat::Table)
    }

    /// The color mode in effect. Unset means auto.
    pub fn color_mode(&self) -> ColorMode {
        self.color.clone().unwrap_or(ColorMode::Auto)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show blocking state, mode, target, and presets
    #[command(alias = "st")]
    Status,

    /// Poll continuously and print every change
    Watch(WatchArgs),

    /// Start blocking the target device
    Block,

    /// Stop blocking the target device
    Unblock,

    /// Activate a preset (or "Manual")
    Mode(ModeArgs),

    /// Edit a preset's time window
    Schedule(ScheduleArgs),

    /// List preset windows
    Presets,

    /// Scan the network for devices
    #[command(alias = "dev")]
    Devices(DevicesArgs),

    /// Set or clear the blocking target
    Target(TargetArgs),

    /// Check that the backend is up
    Health,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Subcommand arguments ─────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Stop after this many updates
    #[arg(long, short = 'n')]
    pub count: Option<u64>,

    /// Poll interval in milliseconds (overrides profile)
    #[arg(long)]
    pub interval: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ModeArgs {
    /// Preset name (Breakfast, Lunch, Dinner, Bedtime) or "Manual"
    pub name: String,
}

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    /// Preset to edit
    pub preset: String,

    /// Window start, HH:MM (24-hour)
    #[arg(long)]
    pub start: String,

    /// Window end, HH:MM (24-hour); may be earlier than start for overnight windows
    #[arg(long)]
    pub end: String,

    /// Save the window but leave the preset disabled
    #[arg(long)]
    pub disable: bool,
}

#[derive(Debug, Args)]
pub struct DevicesArgs {
    /// After scanning, make the device with this MAC the target
    #[arg(long)]
    pub select: Option<String>,
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    #[command(subcommand)]
    pub command: TargetCommand,
}

#[derive(Debug, Subcommand)]
pub enum TargetCommand {
    /// Target a device by MAC address
    Set {
        /// MAC address (AA:BB:CC:DD:EE:FF)
        mac: String,

        /// Friendly name to store alongside the MAC
        #[arg(long)]
        name: Option<String>,
    },

    /// Forget the current target
    Clear,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with one profile
    Init {
        /// Backend URL for the profile, e.g. http://192.168.1.5:8000
        url: String,

        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,

        /// Update an existing config file (other profiles are kept)
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
