//! Shared configuration for the roster CLI and TUI.
//!
//! TOML profiles merged with `ROSTER_`-prefixed environment variables, and
//! translation to a ready [`RemoteStudents`]. The CLI layers its flag
//! overrides on top of [`ClientSettings`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use roster_api::{StudentClient, TransportConfig};
use roster_core::RemoteStudents;

/// Service root used when no profile names one.
pub const DEFAULT_API_URL: &str = "https://student-api-nestjs.onrender.com";

/// Profile used when neither a flag nor the config names one.
pub const DEFAULT_PROFILE: &str = "default";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] roster_api::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named service profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// The requested profile name, else the configured default.
    pub fn profile_name(&self, requested: Option<&str>) -> String {
        requested
            .or(self.default_profile.as_deref())
            .unwrap_or(DEFAULT_PROFILE)
            .to_owned()
    }

    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    /// Output format used when `--output` is not given.
    #[serde(default = "default_output")]
    pub output: String,

    /// Color mode used when `--color` is not given.
    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named service profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Service root (e.g., "https://student-api.example.com").
    pub api_url: String,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "roster", "roster").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("roster");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment.
///
/// Nested keys use a double underscore: `ROSTER_DEFAULTS__TIMEOUT=5`,
/// `ROSTER_PROFILES__STAGING__API_URL=...`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ROSTER_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Client settings ─────────────────────────────────────────────────

/// Validate a service root. Only http(s) URLs are accepted.
pub fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Validation {
        field: "api_url".into(),
        reason,
    };
    let url: Url = raw
        .trim()
        .parse()
        .map_err(|e| invalid(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}' in {raw}"))),
    }
}

/// The profile's service root, or [`DEFAULT_API_URL`] without a profile.
pub fn resolve_api_url(profile: Option<&Profile>) -> Result<Url, ConfigError> {
    parse_api_url(profile.map_or(DEFAULT_API_URL, |p| p.api_url.as_str()))
}

/// Everything needed to talk to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_url: Url,
    pub timeout: Duration,
}

impl ClientSettings {
    /// Resolve from a loaded config and an optional profile name. A missing
    /// profile falls back to the default service.
    pub fn resolve(cfg: &Config, profile_name: Option<&str>) -> Result<Self, ConfigError> {
        let name = cfg.profile_name(profile_name);
        let profile = cfg.profile(&name);
        let api_url = resolve_api_url(profile)?;
        let secs = profile
            .and_then(|p| p.timeout)
            .unwrap_or(cfg.defaults.timeout);
        Ok(Self {
            api_url,
            timeout: Duration::from_secs(secs),
        })
    }

    /// Build the HTTP-backed student API.
    pub fn connect(&self) -> Result<RemoteStudents, ConfigError> {
        let transport = TransportConfig::default().with_timeout(self.timeout);
        let client = StudentClient::new(self.api_url.as_str(), &transport)?;
        Ok(RemoteStudents::new(client))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.timeout, 30);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn file_values_merge_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            r#"
default_profile = "staging"

[defaults]
output = "json"

[profiles.staging]
api_url = "http://localhost:3000"
timeout = 5
"#,
        );

        let cfg = load_config_from(&path).unwrap();

        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.color, "auto");
        assert_eq!(cfg.profile_name(None), "staging");
        assert_eq!(cfg.profile_name(Some("other")), "other");
        assert_eq!(
            cfg.profile("staging").unwrap().api_url,
            "http://localhost:3000"
        );
    }

    #[test]
    fn settings_prefer_profile_timeout() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                api_url: "http://localhost:3000/".into(),
                timeout: Some(7),
            },
        );

        let settings = ClientSettings::resolve(&cfg, None).unwrap();

        assert_eq!(settings.api_url.as_str(), "http://localhost:3000/");
        assert_eq!(settings.timeout, Duration::from_secs(7));
    }

    #[test]
    fn unknown_profile_falls_back_to_default_service() {
        let settings = ClientSettings::resolve(&Config::default(), Some("nope")).unwrap();
        assert_eq!(settings.api_url.as_str(), "https://student-api-nestjs.onrender.com/");
        assert_eq!(settings.timeout, Duration::from_secs(30));
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(parse_api_url("ftp://example.com").is_err());
        assert!(parse_api_url("not a url").is_err());
        assert!(parse_api_url("https://example.com").is_ok());
    }

    #[test]
    fn save_then_load_preserves_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                api_url: "https://students.example.com".into(),
                timeout: None,
            },
        );

        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded, cfg);
    }

    #[test]
    fn settings_build_a_client() {
        let settings = ClientSettings::resolve(&Config::default(), None).unwrap();
        let remote = settings.connect().unwrap();
        assert_eq!(
            remote.client().base_url().as_str(),
            "https://student-api-nestjs.onrender.com/"
        );
    }
}
