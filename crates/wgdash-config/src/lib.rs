//! Shared configuration for the wgdash TUI.
//!
//! TOML file + environment merging via figment, and translation to
//! `wgdash_core::ControllerConfig`. The binary layers its CLI flags on
//! top of what this crate loads.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wgdash_core::ControllerConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Backend connection settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Dashboard behavior.
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// wghttp base URL.
    #[serde(default = "default_url")]
    pub url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    /// Client-list poll interval in milliseconds. Zero disables polling.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Initial usage ceiling in gigabytes; editable at runtime.
    #[serde(default = "default_ceiling_gb")]
    pub ceiling_gb: f64,

    /// Where downloaded tunnel configs land. Defaults to the platform
    /// download directory, then the working directory.
    pub download_dir: Option<PathBuf>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            ceiling_gb: default_ceiling_gb(),
            download_dir: None,
        }
    }
}

fn default_url() -> String {
    "http://localhost:3000".into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_poll_interval_ms() -> u64 {
    1000
}
fn default_ceiling_gb() -> f64 {
    100.0
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "wgdash", "wgdash").map_or_else(
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
    p.push("wgdash");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load configuration from the canonical path plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load configuration from an explicit file path plus environment.
///
/// A missing file is fine -- defaults plus `WGDASH_*` variables apply.
/// Environment keys use `__` as the section separator, e.g.
/// `WGDASH_SERVER__URL` or `WGDASH_UI__CEILING_GB`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("WGDASH_").split("__"))
        .extract()?;

    validate_ceiling(config.ui.ceiling_gb)?;
    Ok(config)
}

// ── Validation ──────────────────────────────────────────────────────

/// Check that a usage ceiling is a positive, finite number of gigabytes.
///
/// Applied to the config file at load time; the TUI applies the same
/// rule to operator edits before accepting them.
pub fn validate_ceiling(gb: f64) -> Result<f64, ConfigError> {
    if gb.is_finite() && gb > 0.0 {
        Ok(gb)
    } else {
        Err(ConfigError::Validation {
            field: "ui.ceiling_gb".into(),
            reason: format!("must be a positive number of gigabytes, got {gb}"),
        })
    }
}

// ── Translation to core settings ────────────────────────────────────

/// Build a `ControllerConfig` from loaded configuration.
pub fn controller_config(config: &Config) -> Result<ControllerConfig, ConfigError> {
    let url: url::Url = config
        .server
        .url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "server.url".into(),
            reason: format!("invalid URL: {}", config.server.url),
        })?;

    Ok(ControllerConfig {
        url,
        timeout: Duration::from_secs(config.server.timeout_secs),
        poll_interval: Duration::from_millis(config.ui.poll_interval_ms),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_apply_without_file_or_env() {
        Jail::expect_with(|_jail| {
            let config = load_config_from(Path::new("missing.toml")).unwrap();
            assert_eq!(config.server.url, "http://localhost:3000");
            assert_eq!(config.server.timeout_secs, 10);
            assert_eq!(config.ui.poll_interval_ms, 1000);
            assert!((config.ui.ceiling_gb - 100.0).abs() < f64::EPSILON);
            assert_eq!(config.ui.download_dir, None);
            Ok(())
        });
    }

    #[test]
    fn toml_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [server]
                url = "http://10.0.0.1:3000"
                timeout_secs = 3

                [ui]
                poll_interval_ms = 250
                ceiling_gb = 20.0
                download_dir = "/tmp/wg"
            "#,
            )?;

            let config = load_config_from(Path::new("config.toml")).unwrap();
            assert_eq!(config.server.url, "http://10.0.0.1:3000");
            assert_eq!(config.server.timeout_secs, 3);
            assert_eq!(config.ui.poll_interval_ms, 250);
            assert!((config.ui.ceiling_gb - 20.0).abs() < f64::EPSILON);
            assert_eq!(config.ui.download_dir, Some(PathBuf::from("/tmp/wg")));
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [server]
                url = "http://10.0.0.1:3000"
            "#,
            )?;
            jail.set_env("WGDASH_SERVER__URL", "http://192.168.1.5:3000");
            jail.set_env("WGDASH_UI__POLL_INTERVAL_MS", "500");

            let config = load_config_from(Path::new("config.toml")).unwrap();
            assert_eq!(config.server.url, "http://192.168.1.5:3000");
            assert_eq!(config.ui.poll_interval_ms, 500);
            Ok(())
        });
    }

    #[test]
    fn nonpositive_ceiling_is_rejected_at_load() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r"
                [ui]
                ceiling_gb = 0.0
            ",
            )?;

            let err = load_config_from(Path::new("config.toml")).unwrap_err();
            assert!(matches!(err, ConfigError::Validation { .. }));
            Ok(())
        });
    }

    #[test]
    fn ceiling_validation_rules() {
        assert!(validate_ceiling(100.0).is_ok());
        assert!(validate_ceiling(0.5).is_ok());
        assert!(validate_ceiling(0.0).is_err());
        assert!(validate_ceiling(-3.0).is_err());
        assert!(validate_ceiling(f64::NAN).is_err());
        assert!(validate_ceiling(f64::INFINITY).is_err());
    }

    #[test]
    fn controller_config_translation() {
        let config = Config::default();
        let cc = controller_config(&config).unwrap();
        assert_eq!(cc.url.as_str(), "http://localhost:3000/");
        assert_eq!(cc.timeout, Duration::from_secs(10));
        assert_eq!(cc.poll_interval, Duration::from_millis(1000));
    }

    #[test]
    fn invalid_url_is_rejected() {
        let mut config = Config::default();
        config.server.url = "not a url".into();
        let err = controller_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }
}
