//! Configuration loading for the network lab.
//!
//! Layered resolution of [`LabConfig`]: built-in defaults, then
//! `netlab.toml` from the platform config directory, then `NETLAB_*`
//! environment variables. The core itself never reads files -- embedding
//! frontends call into this crate and hand the result to the session.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use thiserror::Error;

use netlab_core::LabConfig;

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

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "netlab", "netlab").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("netlab.toml");
            p
        },
        |dirs| dirs.config_dir().join("netlab.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("netlab");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the lab config from the canonical file + environment.
pub fn load_config() -> Result<LabConfig, ConfigError> {
    load_config_from(config_path())
}

/// Load the lab config layering defaults, the given TOML file (which may
/// be absent), and `NETLAB_*` environment variables.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<LabConfig, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(LabConfig::default()))
        .merge(Toml::file(path.as_ref()))
        .merge(Env::prefixed("NETLAB_"));

    let config: LabConfig = figment.extract()?;
    validate(&config)?;
    Ok(config)
}

/// Load config, falling back to defaults on any error.
pub fn load_config_or_default() -> LabConfig {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &LabConfig) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Validation ──────────────────────────────────────────────────────

/// Reject configs no lab could run with.
pub fn validate(config: &LabConfig) -> Result<(), ConfigError> {
    if config.switch_port_count == 0 {
        return Err(ConfigError::Validation {
            field: "switch_port_count".into(),
            reason: "a switch needs at least one port".into(),
        });
    }
    if !config.icon_offset.is_finite() || config.icon_offset < 0.0 {
        return Err(ConfigError::Validation {
            field: "icon_offset".into(),
            reason: format!("must be a non-negative number, got {}", config.icon_offset),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_config_from("/nonexistent/netlab.toml").unwrap();
        assert_eq!(config, LabConfig::default());
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "switch_port_count = 24\nreboot_delay_ms = 500").unwrap();

        let config = load_config_from(file.path()).unwrap();

        assert_eq!(config.switch_port_count, 24);
        assert_eq!(config.reboot_delay_ms, 500);
        // Untouched keys keep their defaults.
        assert_eq!(config.icon_offset, LabConfig::default().icon_offset);
    }

    #[test]
    fn portless_switch_config_is_rejected() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "switch_port_count = 0").unwrap();

        let err = load_config_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn roundtrips_through_toml() {
        let config = LabConfig {
            switch_port_count: 16,
            reboot_delay_ms: 1_000,
            icon_offset: 32.0,
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let back: LabConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
