//! CLI-side configuration: profile selection and flag overrides on top of
//! `netcut-config`.
//!
//! Precedence for every setting: flag / env var > profile > defaults.

use std::time::Duration;

use clap::ValueEnum;
use netcut_config::{Config, Defaults, Profile, profile_to_controller_config};
use netcut_core::ControllerConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use netcut_config::{config_path, load_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Fill `--output` / `--color` from the config's `[defaults]` when neither
/// the flag nor its env var was given.
pub fn with_defaults(global: &GlobalOpts, defaults: &Defaults) -> Result<GlobalOpts, CliError> {
    let mut resolved = global.clone();
    if resolved.output.is_none() {
        resolved.output = Some(parse_default::<OutputFormat>("output", &defaults.output)?);
    }
    if resolved.color.is_none() {
        resolved.color = Some(parse_default::<ColorMode>("color", &defaults.color)?);
    }
    Ok(resolved)
}

fn parse_default<T: ValueEnum>(field: &str, raw: &str) -> Result<T, CliError> {
    T::from_str(raw.trim(), true).map_err(|reason| CliError::Validation {
        field: format!("defaults.{field}"),
        reason,
    })
}

/// Build a validated `ControllerConfig` from the loaded config, the active
/// profile, and CLI overrides.
pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<ControllerConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        // An explicitly named profile must exist.
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(cfg),
            });
        }
        None => {
            let backend = global.backend.as_deref().ok_or_else(|| CliError::NoConfig {
                path: config_path().display().to_string(),
            })?;
            Profile::new(backend)
        }
    };

    if let Some(backend) = &global.backend {
        profile.backend.clone_from(backend);
    }
    if let Some(timeout_ms) = global.timeout {
        profile.timeout_ms = Some(timeout_ms);
    }

    Ok(profile_to_controller_config(&profile, &cfg.defaults)?)
}

/// One-shot commands never run the background poll loop.
pub fn oneshot(mut cfg: ControllerConfig) -> ControllerConfig {
    cfg.poll_interval = Duration::ZERO;
    cfg
}

/// `watch` keeps the profile's poll interval unless `--interval` is given.
pub fn watching(
    mut cfg: ControllerConfig,
    interval_ms: Option<u64>,
) -> Result<ControllerConfig, CliError> {
    match interval_ms {
        Some(0) => Err(CliError::Validation {
            field: "interval".into(),
            reason: "must be greater than zero".into(),
        }),
        Some(ms) => {
            cfg.poll_interval = Duration::from_millis(ms);
            Ok(cfg)
        }
        None => Ok(cfg),
    }
}

pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn global(backend: Option<&str>, profile: Option<&str>) -> GlobalOpts {
        GlobalOpts {
            profile: profile.map(Into::into),
            backend: backend.map(Into::into),
            output: None,
            color: None,
            verbose: 0,
            quiet: false,
            timeout: None,
        }
    }

    fn config_with_home() -> Config {
        let mut cfg = Config::default();
        let mut home = Profile::new("http://192.168.1.5:8000");
        home.timeout_ms = Some(4_000);
        cfg.profiles.insert("home".into(), home);
        cfg.default_profile = Some("home".into());
        cfg
    }

    #[test]
    fn backend_flag_works_without_any_profile() {
        let resolved = resolve(&global(Some("10.0.0.2:8000"), None), &Config::default()).unwrap();
        assert_eq!(resolved.url.as_str(), "http://10.0.0.2:8000/");
        assert_eq!(resolved.timeout, Duration::from_secs(3));
    }

    #[test]
    fn no_backend_anywhere_is_a_config_error() {
        let err = resolve(&global(None, None), &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn default_profile_is_used_and_flags_override_it() {
        let cfg = config_with_home();

        let from_profile = resolve(&global(None, None), &cfg).unwrap();
        assert_eq!(from_profile.url.host_str(), Some("192.168.1.5"));
        assert_eq!(from_profile.timeout, Duration::from_secs(4));

        let mut opts = global(Some("http://10.0.0.9:9000"), None);
        opts.timeout = Some(1_500);
        let overridden = resolve(&opts, &cfg).unwrap();
        assert_eq!(overridden.url.port(), Some(9000));
        assert_eq!(overridden.timeout, Duration::from_millis(1_500));
    }

    #[test]
    fn config_defaults_fill_unset_output_and_color() {
        let defaults = Defaults {
            output: "json-compact".into(),
            color: "Never".into(),
            ..Defaults::default()
        };

        let resolved = with_defaults(&global(None, None), &defaults).unwrap();
        assert!(matches!(resolved.output_format(), OutputFormat::JsonCompact));
        assert!(matches!(resolved.color_mode(), ColorMode::Never));

        let mut opts = global(None, None);
        opts.output = Some(OutputFormat::Yaml);
        let flagged = with_defaults(&opts, &defaults).unwrap();
        assert!(matches!(flagged.output_format(), OutputFormat::Yaml));
        assert!(matches!(flagged.color_mode(), ColorMode::Never));
    }

    #[test]
    fn built_in_defaults_are_table_and_auto() {
        let resolved = with_defaults(&global(None, None), &Defaults::default()).unwrap();
        assert!(matches!(resolved.output_format(), OutputFormat::Table));
        assert!(matches!(resolved.color_mode(), ColorMode::Auto));
    }

    #[test]
    fn unknown_default_output_is_rejected() {
        let defaults = Defaults {
            output: "xml".into(),
            ..Defaults::default()
        };
        let err = with_defaults(&global(None, None), &defaults).unwrap_err();
        assert!(matches!(err, CliError::Validation { field, .. } if field == "defaults.output"));
    }

    #[test]
    fn unknown_named_profile_lists_alternatives() {
        let err = resolve(&global(None, Some("cabin")), &config_with_home()).unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "cabin");
                assert_eq!(available, "home");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
