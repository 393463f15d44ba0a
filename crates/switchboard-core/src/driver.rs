//! The device driver contract.
//!
//! A driver translates canonical objects into device configuration.
//! Every operation a driver can perform is declared up front in its
//! [`Capabilities`] table; the service layer consults the table before
//! dispatch so an unsupported request is answered identically whether
//! or not the driver implements the method.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::device::Device;
use crate::error::Error;
use crate::model::{Interface, Lag, Vlan, Vrf, Vxlan};

// ── Resource kinds and actions ──────────────────────────────────────

/// The configurable resource families, with their wire names.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum ResourceKind {
    #[strum(serialize = "interface")]
    Interface,
    #[strum(serialize = "interface:lag")]
    Lag,
    #[strum(serialize = "bridge:vlan")]
    Vlan,
    #[strum(serialize = "vrf")]
    Vrf,
    #[strum(serialize = "tunnels:vxlan")]
    Vxlan,
}

/// Driver-level actions. A PUT and a PATCH both dispatch to `update`;
/// the flag on the driver call tells them apart.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::Read,
        Action::Create,
        Action::Update,
        Action::Delete,
    ];
}

/// Canonical `kind:action` operation name used in errors and logs.
pub fn operation_name(kind: ResourceKind, action: Action) -> String {
    format!("{kind}:{action}")
}

// ── Capabilities ────────────────────────────────────────────────────

/// The set of operations a driver declares support for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    supported: BTreeSet<(ResourceKind, Action)>,
}

impl Capabilities {
    pub fn builder() -> CapabilitiesBuilder {
        CapabilitiesBuilder::default()
    }

    pub fn supports(&self, kind: ResourceKind, action: Action) -> bool {
        self.supported.contains(&(kind, action))
    }

    /// Wire names of the supported operations, sorted.
    pub fn operation_names(&self) -> Vec<String> {
        self.supported
            .iter()
            .map(|(kind, action)| operation_name(*kind, *action))
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct CapabilitiesBuilder {
    supported: BTreeSet<(ResourceKind, Action)>,
}

impl CapabilitiesBuilder {
    /// Declare support for a subset of actions on a resource kind.
    #[must_use]
    pub fn actions(mut self, kind: ResourceKind, actions: &[Action]) -> Self {
        for action in actions {
            self.supported.insert((kind, *action));
        }
        self
    }

    /// Declare support for every action on a resource kind.
    #[must_use]
    pub fn full(self, kind: ResourceKind) -> Self {
        self.actions(kind, &Action::ALL)
    }

    pub fn build(self) -> Capabilities {
        Capabilities {
            supported: self.supported,
        }
    }
}

// ── Driver responses and errors ─────────────────────────────────────

/// What a read hands back: one object, a listing, or nothing.
///
/// The shape matters to the service layer: a keyed read must produce
/// [`DriverResponse::One`] or [`DriverResponse::None`], a listing must
/// produce [`DriverResponse::Many`]; anything else is a driver bug
/// surfaced as [`Error::DriverResponseInvalid`].
#[derive(Debug, Clone, PartialEq)]
pub enum DriverResponse<T> {
    One(T),
    Many(Vec<T>),
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
    /// The driver does not implement this operation at all.
    #[error("driver does not support {operation}")]
    Unsupported { operation: String },
    /// The driver implements the operation but this device cannot
    /// perform it (platform or firmware limitation).
    #[error("device does not support {operation}")]
    DeviceUnsupported { operation: String },
    /// The request is canonically valid but unacceptable to the
    /// device.
    #[error("{message}")]
    Request { message: String },
}

impl DriverError {
    pub fn unsupported(kind: ResourceKind, action: Action) -> Self {
        Self::Unsupported {
            operation: operation_name(kind, action),
        }
    }

    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    /// Attach driver and device identity for the user-facing error.
    pub fn into_error(self, driver: &str, device_id: &str) -> Error {
        match self {
            Self::Unsupported { operation } => Error::DriverOperationUnsupported {
                driver: driver.to_owned(),
                operation,
            },
            Self::DeviceUnsupported { operation } => Error::DeviceOperationUnsupported {
                driver: driver.to_owned(),
                operation,
                device_id: device_id.to_owned(),
            },
            Self::Request { message } => Error::DriverRequest { message },
        }
    }
}

// ── The driver trait ────────────────────────────────────────────────

macro_rules! driver_methods {
    ($kind:expr, $entity:ty, $read:ident, $create:ident, $update:ident, $delete:ident) => {
        /// Read one object by key, or list all when `key` is `None`.
        fn $read(&self, _key: Option<&str>) -> Result<DriverResponse<$entity>, DriverError> {
            Err(DriverError::unsupported($kind, Action::Read))
        }
        fn $create(&self, _entity: $entity) -> Result<$entity, DriverError> {
            Err(DriverError::unsupported($kind, Action::Create))
        }
        /// Apply an object. `update` distinguishes a merge already
        /// performed by the caller (PATCH) from a full replacement
        /// (PUT); either way the object arrives complete and the
        /// driver must not re-apply defaults.
        fn $update(&self, _entity: $entity, _update: bool) -> Result<$entity, DriverError> {
            Err(DriverError::unsupported($kind, Action::Update))
        }
        /// Remove one object by key. Success carries no payload; the
        /// return type is what guarantees a delete never invents one.
        fn $delete(&self, _key: &str) -> Result<(), DriverError> {
            Err(DriverError::unsupported($kind, Action::Delete))
        }
    };
}

/// One driver instance serves one device. Keys are the string form of
/// the resource identity (interface name, VLAN id, VNI). Write
/// methods take canonical objects already validated, defaulted, and
/// (for PATCH) merged with device state by the service layer.
///
/// Default bodies refuse every operation, so a driver only writes the
/// methods it declares in its capability table.
pub trait DeviceDriver: Send + Sync {
    fn capabilities(&self) -> &Capabilities;

    driver_methods!(
        ResourceKind::Interface,
        Interface,
        interface_read,
        interface_create,
        interface_update,
        interface_delete
    );

    driver_methods!(ResourceKind::Lag, Lag, lag_read, lag_create, lag_update, lag_delete);

    driver_methods!(
        ResourceKind::Vlan,
        Vlan,
        vlan_read,
        vlan_create,
        vlan_update,
        vlan_delete
    );

    driver_methods!(ResourceKind::Vrf, Vrf, vrf_read, vrf_create, vrf_update, vrf_delete);

    driver_methods!(
        ResourceKind::Vxlan,
        Vxlan,
        vxlan_read,
        vxlan_create,
        vxlan_update,
        vxlan_delete
    );
}

// ── Registry ────────────────────────────────────────────────────────

type DriverFactory = Box<dyn Fn(&Device) -> Result<Box<dyn DeviceDriver>, Error> + Send + Sync>;

/// Maps driver names (as they appear in device records) to
/// constructors.
#[derive(Default)]
pub struct DriverRegistry {
    factories: HashMap<String, DriverFactory>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&Device) -> Result<Box<dyn DeviceDriver>, Error> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Instantiate the driver a device record names.
    pub fn build(&self, device: &Device) -> Result<Box<dyn DeviceDriver>, Error> {
        let factory = self
            .factories
            .get(&device.driver)
            .ok_or_else(|| Error::DriverNotFound {
                name: device.driver.clone(),
            })?;
        factory(device)
    }

    pub fn driver_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("drivers", &self.driver_names())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    struct NullDriver {
        capabilities: Capabilities,
    }

    impl DeviceDriver for NullDriver {
        fn capabilities(&self) -> &Capabilities {
            &self.capabilities
        }
    }

    #[test]
    fn default_methods_refuse_everything() {
        let driver = NullDriver {
            capabilities: Capabilities::default(),
        };
        let err = driver.vlan_read(None).unwrap_err();
        assert_eq!(
            err,
            DriverError::Unsupported {
                operation: "bridge:vlan:read".into()
            }
        );
        let err = driver.vxlan_delete("70000").unwrap_err();
        assert_eq!(
            err,
            DriverError::Unsupported {
                operation: "tunnels:vxlan:delete".into()
            }
        );
    }

    #[test]
    fn capability_builder_round_trip() {
        let capabilities = Capabilities::builder()
            .full(ResourceKind::Vlan)
            .actions(ResourceKind::Vrf, &[Action::Read])
            .build();
        assert!(capabilities.supports(ResourceKind::Vlan, Action::Delete));
        assert!(capabilities.supports(ResourceKind::Vrf, Action::Read));
        assert!(!capabilities.supports(ResourceKind::Vrf, Action::Create));
        assert!(!capabilities.supports(ResourceKind::Interface, Action::Read));
    }

    #[test]
    fn operation_names_are_wire_names() {
        let capabilities = Capabilities::builder()
            .actions(ResourceKind::Lag, &[Action::Create])
            .build();
        assert_eq!(capabilities.operation_names(), vec!["interface:lag:create"]);
    }

    #[test]
    fn unsupported_error_maps_to_core() {
        let err = DriverError::unsupported(ResourceKind::Vrf, Action::Update)
            .into_error("memory", "sw1");
        assert_eq!(err.status(), 501);
    }

    #[test]
    fn registry_reports_unknown_driver() {
        let registry = DriverRegistry::new();
        let device = Device {
            id: "sw1".into(),
            address: "198.18.0.10".into(),
            driver: "ghost".into(),
            credentials: None,
            attributes: serde_json::Map::new(),
        };
        let err = registry.build(&device).err().unwrap();
        assert!(matches!(err, Error::DriverNotFound { ref name } if name == "ghost"));
    }
}
