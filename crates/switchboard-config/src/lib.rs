//! Configuration loading and device inventory backends.
//!
//! TOML file + `SWITCHBOARD_`-prefixed environment variables feed an
//! [`AppConfig`]; the [`inventory`] module provides the YAML-file
//! device backend.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod inventory;

pub use inventory::YamlInventory;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("failed to read inventory {path}: {source}")]
    InventoryRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse inventory {path}: {source}")]
    InventoryParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── App configuration ───────────────────────────────────────────────

/// Process-level settings: file values overridden by environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Path to the YAML device inventory.
    pub inventory: PathBuf,

    /// When set, internal error text reaches the caller unmasked.
    #[serde(default)]
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            inventory: PathBuf::from("devices.yaml"),
            debug: false,
        }
    }
}

/// Load configuration from an optional TOML file plus the
/// environment. `SWITCHBOARD_INVENTORY` and `SWITCHBOARD_DEBUG`
/// override file values.
pub fn load_config(path: Option<&PathBuf>) -> Result<AppConfig, ConfigError> {
    let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));
    if let Some(path) = path {
        figment = figment.merge(Toml::file(path));
    }
    let config: AppConfig = figment.merge(Env::prefixed("SWITCHBOARD_")).extract()?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_without_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config.inventory, PathBuf::from("devices.yaml"));
        assert!(!config.debug);
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "inventory = \"/etc/switchboard/devices.yaml\"").unwrap();
        writeln!(file, "debug = true").unwrap();
        let config = load_config(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(
            config.inventory,
            PathBuf::from("/etc/switchboard/devices.yaml")
        );
        assert!(config.debug);
    }
}
