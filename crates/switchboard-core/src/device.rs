//! Device inventory records and the backend seam.

use secrecy::SecretString;
use serde::Deserialize;

use crate::error::Error;

/// Login material for a device. The secret never appears in logs or
/// debug output.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceCredentials {
    pub username: String,
    pub password: SecretString,
}

/// An inventory record: where a device lives and which driver speaks
/// to it.
#[derive(Debug, Clone, Deserialize)]
pub struct Device {
    pub id: String,
    pub address: String,
    pub driver: String,
    #[serde(default)]
    pub credentials: Option<DeviceCredentials>,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// Source of inventory records. Implementations return `Ok(None)` for
/// an unknown id; [`resolve_device`] turns that into the not-found
/// error with the backend name attached.
pub trait DeviceBackend: Send + Sync {
    /// Backend name used in error messages.
    fn name(&self) -> &str;

    fn device(&self, device_id: &str) -> Result<Option<Device>, Error>;

    fn device_ids(&self) -> Result<Vec<String>, Error>;
}

/// Look up a device and check the record is actionable: it must name
/// a driver and carry credentials.
pub fn resolve_device(backend: &dyn DeviceBackend, device_id: &str) -> Result<Device, Error> {
    let device = backend
        .device(device_id)?
        .ok_or_else(|| Error::DeviceNotFound {
            device_id: device_id.to_owned(),
            backend: backend.name().to_owned(),
        })?;
    if device.driver.is_empty() {
        return Err(Error::DeviceDriverNotDefined {
            device_id: device_id.to_owned(),
            backend: backend.name().to_owned(),
        });
    }
    if device.credentials.is_none() {
        return Err(Error::DeviceCredentialsNotFound {
            device_id: device_id.to_owned(),
            backend: backend.name().to_owned(),
        });
    }
    Ok(device)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct FixedBackend {
        devices: Vec<Device>,
    }

    impl DeviceBackend for FixedBackend {
        fn name(&self) -> &str {
            "fixed"
        }

        fn device(&self, device_id: &str) -> Result<Option<Device>, Error> {
            Ok(self.devices.iter().find(|d| d.id == device_id).cloned())
        }

        fn device_ids(&self) -> Result<Vec<String>, Error> {
            Ok(self.devices.iter().map(|d| d.id.clone()).collect())
        }
    }

    fn device(id: &str, driver: &str, with_credentials: bool) -> Device {
        Device {
            id: id.to_owned(),
            address: "198.18.0.10".to_owned(),
            driver: driver.to_owned(),
            credentials: with_credentials.then(|| DeviceCredentials {
                username: "admin".to_owned(),
                password: SecretString::from("hunter2"),
            }),
            attributes: serde_json::Map::new(),
        }
    }

    #[test]
    fn unknown_device_is_not_found() {
        let backend = FixedBackend { devices: vec![] };
        let err = resolve_device(&backend, "sw1").unwrap_err();
        assert!(matches!(err, Error::DeviceNotFound { ref backend, .. } if backend == "fixed"));
    }

    #[test]
    fn missing_driver_reported() {
        let backend = FixedBackend {
            devices: vec![device("sw1", "", true)],
        };
        let err = resolve_device(&backend, "sw1").unwrap_err();
        assert!(matches!(err, Error::DeviceDriverNotDefined { .. }));
    }

    #[test]
    fn missing_credentials_reported() {
        let backend = FixedBackend {
            devices: vec![device("sw1", "memory", false)],
        };
        let err = resolve_device(&backend, "sw1").unwrap_err();
        assert!(matches!(err, Error::DeviceCredentialsNotFound { .. }));
    }

    #[test]
    fn complete_record_resolves() {
        let backend = FixedBackend {
            devices: vec![device("sw1", "memory", true)],
        };
        let resolved = resolve_device(&backend, "sw1").unwrap();
        assert_eq!(resolved.driver, "memory");
    }
}
