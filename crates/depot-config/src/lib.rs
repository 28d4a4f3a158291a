//! Configuration for the depot dashboard.
//!
//! A flat TOML file merged over built-in defaults, then `DEPOT_*`
//! environment variables on top, and translation into the validated
//! `depot_core::DashboardConfig`.

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

use depot_core::DashboardConfig;
use depot_core::config::{DEFAULT_POLL_INTERVAL, DEFAULT_SERVER_URL, DEFAULT_TIMEOUT};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl From<ConfigError> for depot_core::CoreError {
    fn from(err: ConfigError) -> Self {
        Self::Config {
            message: err.to_string(),
        }
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// On-disk configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Server root URL (e.g., "http://127.0.0.1:5000").
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Network statistics refresh period in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Directory downloads are written to.
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Log file override; the binary falls back to its own default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            timeout: default_timeout(),
            poll_interval_ms: default_poll_interval_ms(),
            download_dir: default_download_dir(),
            log_file: None,
        }
    }
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.into()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}
fn default_poll_interval_ms() -> u64 {
    u64::try_from(DEFAULT_POLL_INTERVAL.as_millis()).unwrap_or(5000)
}
fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

/// Lower bound for `poll_interval_ms`.
const MIN_POLL_INTERVAL_MS: u64 = 250;

impl Config {
    /// Validate and convert into the runtime configuration.
    pub fn to_dashboard_config(&self) -> Result<DashboardConfig, ConfigError> {
        let server_url = Url::parse(&self.server_url).map_err(|e| ConfigError::Validation {
            field: "server_url".into(),
            reason: e.to_string(),
        })?;
        if !matches!(server_url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "server_url".into(),
                reason: format!("unsupported scheme '{}'", server_url.scheme()),
            });
        }
        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        if self.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            return Err(ConfigError::Validation {
                field: "poll_interval_ms".into(),
                reason: format!("must be at least {MIN_POLL_INTERVAL_MS}"),
            });
        }

        let mut dashboard = DashboardConfig::new(server_url);
        dashboard.timeout = Duration::from_secs(self.timeout);
        dashboard.poll_interval = Duration::from_millis(self.poll_interval_ms);
        dashboard.download_dir.clone_from(&self.download_dir);
        Ok(dashboard)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "depot", "depot").map_or_else(
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
    p.push("depot");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file + environment. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("DEPOT_"));

    let config: Config = figment.extract()?;
    Ok(config)
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(cfg.timeout, 30);
        assert_eq!(cfg.poll_interval_ms, 5000);
        assert_eq!(cfg.download_dir, PathBuf::from("downloads"));
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "server_url = \"http://files.lan:8080\"\npoll_interval_ms = 2000\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.server_url, "http://files.lan:8080");
        assert_eq!(cfg.poll_interval_ms, 2000);
        assert_eq!(cfg.timeout, 30);
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config {
            download_dir: PathBuf::from("/srv/incoming"),
            log_file: Some(PathBuf::from("/var/log/depot.log")),
            ..Config::default()
        };

        save_config_to(&cfg, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("download_dir = \"/srv/incoming\""));
        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }

    #[test]
    fn dashboard_config_carries_durations() {
        let cfg = Config {
            timeout: 5,
            poll_interval_ms: 1500,
            ..Config::default()
        };
        let dash = cfg.to_dashboard_config().unwrap();

        assert_eq!(dash.server_url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(dash.timeout, Duration::from_secs(5));
        assert_eq!(dash.poll_interval, Duration::from_millis(1500));
    }

    #[test]
    fn rejects_bad_values() {
        let bad_url = Config {
            server_url: "not a url".into(),
            ..Config::default()
        };
        assert!(matches!(
            bad_url.to_dashboard_config(),
            Err(ConfigError::Validation { ref field, .. }) if field == "server_url"
        ));

        let ftp = Config {
            server_url: "ftp://files.lan".into(),
            ..Config::default()
        };
        assert!(ftp.to_dashboard_config().is_err());

        let zero_poll = Config {
            poll_interval_ms: 0,
            ..Config::default()
        };
        let err = zero_poll.to_dashboard_config().unwrap_err();
        assert_eq!(err.to_string(), "invalid poll_interval_ms: must be at least 250");
    }
}
