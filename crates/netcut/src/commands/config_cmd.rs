//! Config subcommand handlers.

use netcut_config::{
    Config, Profile, load_config_from, parse_backend_url, profile_to_controller_config,
    save_config_to,
};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init ────────────────────────────────────────────────────
        ConfigCommand::Init { url, name, force } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            // Validate before anything touches disk.
            let backend = parse_backend_url(&url)?;
            let profile = Profile::new(backend.as_str().trim_end_matches('/'));

            let mut cfg = if path.exists() {
                load_config_from(&path)?
            } else {
                Config::default()
            };
            profile_to_controller_config(&profile, &cfg.defaults)?;

            cfg.profiles.insert(name.clone(), profile);
            cfg.default_profile = Some(name.clone());
            save_config_to(&cfg, &path)?;

            if !global.quiet {
                eprintln!("Configuration written to {}", path.display());
                eprintln!("  Active profile: {name}");
                eprintln!("  Test it: netcut health");
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let global = &config::with_defaults(global, &cfg.defaults)?;
            let out = output::render_single(
                &global.output_format(),
                &cfg,
                |c| show_detail(c, global),
                |c| config::active_profile_name(global, c),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}

fn show_detail(cfg: &Config, global: &GlobalOpts) -> String {
    let active = config::active_profile_name(global, cfg);
    let mut lines = vec![
        format!("Config file:   {}", config::config_path().display()),
        format!("Active:        {active}"),
        format!("Timeout:       {}ms", cfg.defaults.timeout_ms),
        format!("Scan timeout:  {}ms", cfg.defaults.scan_timeout_ms),
        format!("Poll interval: {}ms", cfg.defaults.poll_interval_ms),
        format!("Output:        {}", cfg.defaults.output),
        format!("Color:         {}", cfg.defaults.color),
    ];
    if cfg.profiles.is_empty() {
        lines.push("Profiles:      (none)".into());
    } else {
        lines.push("Profiles:".into());
        for (name, profile) in &cfg.profiles {
            let marker = if *name == active { "*" } else { " " };
            lines.push(format!("  {marker} {name:<12} {}", profile.backend));
        }
    }
    if let Some(backend) = &global.backend {
        lines.push(format!("Override:      --backend {backend}"));
    }
    lines.join("\n")
}
