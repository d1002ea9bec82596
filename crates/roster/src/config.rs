//! CLI configuration: thin wrapper around `roster_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--api-url, --timeout, --profile).

use std::time::Duration;

use clap::ValueEnum;
use roster_config::{ClientSettings, parse_api_url};
use tracing::warn;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use roster_config::{
    Config, DEFAULT_API_URL, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

/// Fill `--output` and `--color` from `[defaults]` when neither the flag
/// nor its env var was given. Unrecognized values are ignored.
pub fn apply_defaults(global: &mut GlobalOpts, config: &Config) {
    if global.output.is_none() {
        global.output = parse_default("output", &config.defaults.output);
    }
    if global.color.is_none() {
        global.color = parse_default("color", &config.defaults.color);
    }
}

fn parse_default<T: ValueEnum>(key: &str, raw: &str) -> Option<T> {
    T::from_str(raw, true)
        .inspect_err(|e| warn!(key, value = raw, error = %e, "ignoring config default"))
        .ok()
}

/// Profile values with CLI flag overrides applied on top.
///
/// An explicitly requested profile must exist; the implicit default may be
/// absent, in which case the public service is used.
pub fn resolve_settings(global: &GlobalOpts, config: &Config) -> Result<ClientSettings, CliError> {
    if let Some(name) = &global.profile {
        if config.profile(name).is_none() && global.api_url.is_none() {
            return Err(profile_not_found(config, name.clone()));
        }
    }

    let mut settings = ClientSettings::resolve(config, global.profile.as_deref())?;
    if let Some(url) = &global.api_url {
        settings.api_url = parse_api_url(url)?;
    }
    if let Some(secs) = global.timeout {
        settings.timeout = Duration::from_secs(secs);
    }
    Ok(settings)
}

/// Error for a profile name absent from `config`, listing what exists.
pub fn profile_not_found(config: &Config, name: String) -> CliError {
    let available: Vec<_> = config.profiles.keys().cloned().collect();
    CliError::ProfileNotFound {
        name,
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, ColorMode, OutputFormat};

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["roster"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["students", "list"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with(output: &str, color: &str) -> Config {
        let mut cfg = Config::default();
        cfg.defaults.output = output.into();
        cfg.defaults.color = color.into();
        cfg
    }

    #[test]
    fn config_defaults_fill_missing_flags() {
        let mut opts = global(&[]);
        apply_defaults(&mut opts, &config_with("json", "never"));

        assert_eq!(opts.output(), OutputFormat::Json);
        assert_eq!(opts.color(), ColorMode::Never);
    }

    #[test]
    fn flags_win_over_config_defaults() {
        let mut opts = global(&["-o", "yaml", "--color", "always"]);
        apply_defaults(&mut opts, &config_with("json", "never"));

        assert_eq!(opts.output(), OutputFormat::Yaml);
        assert_eq!(opts.color(), ColorMode::Always);
    }

    #[test]
    fn unknown_config_values_fall_back() {
        let mut opts = global(&[]);
        apply_defaults(&mut opts, &config_with("xml", "sometimes"));

        assert_eq!(opts.output(), OutputFormat::Table);
        assert_eq!(opts.color(), ColorMode::Auto);
    }
}
