//! YAML-file device inventory.
//!
//! The file maps device ids to connection records:
//!
//! ```yaml
//! sw1:
//!   address: 198.18.0.10
//!   driver: memory
//!   credentials:
//!     username: admin
//!     password: hunter2
//!   attributes:
//!     site: lab1
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;
use tracing::debug;

use switchboard_core::{Device, DeviceBackend, DeviceCredentials, Error};

use crate::ConfigError;

#[derive(Debug, Clone, Deserialize)]
struct CredentialRecord {
    username: String,
    password: String,
}

#[derive(Debug, Clone, Deserialize)]
struct DeviceRecord {
    address: String,
    #[serde(default)]
    driver: String,
    #[serde(default)]
    credentials: Option<CredentialRecord>,
    #[serde(default)]
    attributes: serde_json::Map<String, serde_json::Value>,
}

/// Device backend reading a YAML inventory once at startup.
#[derive(Debug, Clone)]
pub struct YamlInventory {
    path: PathBuf,
    devices: HashMap<String, DeviceRecord>,
}

fn valid_device_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

impl YamlInventory {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::InventoryRead {
            path: path.clone(),
            source,
        })?;
        let devices: HashMap<String, DeviceRecord> =
            serde_yaml::from_str(&raw).map_err(|source| ConfigError::InventoryParse {
                path: path.clone(),
                source,
            })?;
        for id in devices.keys() {
            if !valid_device_id(id) {
                return Err(ConfigError::Validation {
                    field: "device_id".into(),
                    reason: format!(
                        "'{id}' may only contain ASCII letters, digits, and hyphens"
                    ),
                });
            }
        }
        debug!(path = %path.display(), devices = devices.len(), "inventory loaded");
        Ok(Self { path, devices })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DeviceBackend for YamlInventory {
    fn name(&self) -> &str {
        "yamlfile"
    }

    fn device(&self, device_id: &str) -> Result<Option<Device>, Error> {
        Ok(self.devices.get(device_id).map(|record| Device {
            id: device_id.to_owned(),
            address: record.address.clone(),
            driver: record.driver.clone(),
            credentials: record.credentials.as_ref().map(|c| DeviceCredentials {
                username: c.username.clone(),
                password: SecretString::from(c.password.clone()),
            }),
            attributes: record.attributes.clone(),
        }))
    }

    fn device_ids(&self) -> Result<Vec<String>, Error> {
        let mut ids: Vec<String> = self.devices.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
