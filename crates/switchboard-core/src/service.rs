//! Request orchestration.
//!
//! `DeviceService` applies one policy to every resource family: the
//! capability gate, identity precedence, required-field checks,
//! orchestration-layer defaulting, existence pre-checks, and response
//! shape enforcement all live here, so drivers stay thin and every
//! resource behaves the same way.

use serde_json::Value;
use tracing::{debug, warn};

use crate::device::{resolve_device, Device, DeviceBackend};
use crate::driver::{
    Action, DeviceDriver, DriverError, DriverRegistry, DriverResponse, ResourceKind,
};
use crate::error::Error;
use crate::model::{Interface, Lag, Vlan, Vrf, Vxlan};
use crate::payload::Payload;

// ── Resource binding ────────────────────────────────────────────────

/// Binds a canonical entity to its identity field, required fields,
/// defaults, and driver methods. Implemented by the five resource
/// families; `DeviceService` is generic over it.
pub trait Resource: Sized {
    const KIND: ResourceKind;
    /// Payload field that names the object.
    const IDENTITY: &'static str;
    /// Fields a full build (POST/PUT) must supply.
    const REQUIRED: &'static [&'static str];

    fn from_payload(payload: &Payload, partial: bool) -> Result<Self, Error>;

    /// String form of the object's identity, as used in driver keys.
    fn key(&self) -> String;

    fn merge(&mut self, update: &Self);

    /// Cross-field invariants a complete object must satisfy.
    /// Re-checked on the merged result of a partial update, since a
    /// patch can combine with device state into an invalid whole.
    fn validate_full(&self) -> Result<(), Error> {
        Ok(())
    }

    /// Inject orchestration-owned defaults into a full-build payload.
    /// Drivers never re-default.
    fn apply_defaults(_payload: &mut Payload) {}

    /// Identity precedence: a body identity must agree with the
    /// addressed key; when absent the key is injected.
    fn normalize_identity(payload: &mut Payload, key: &str) -> Result<(), Error>;

    /// Identity of a collection-level request, read from the body.
    fn payload_key(payload: &Payload) -> Result<String, Error>;

    fn read(driver: &dyn DeviceDriver, key: Option<&str>)
        -> Result<DriverResponse<Self>, DriverError>;
    fn create(driver: &dyn DeviceDriver, entity: Self) -> Result<Self, DriverError>;
    fn update(driver: &dyn DeviceDriver, entity: Self, update: bool)
        -> Result<Self, DriverError>;
    fn delete(driver: &dyn DeviceDriver, key: &str) -> Result<(), DriverError>;
}

fn normalize_str_identity(payload: &mut Payload, field: &str, key: &str) -> Result<(), Error> {
    match payload.get_str(field)? {
        Some(existing) if existing != key => Err(Error::request_value(field, existing)),
        _ => {
            payload.set(field, Value::String(key.to_owned()));
            Ok(())
        }
    }
}

fn normalize_u32_identity(payload: &mut Payload, field: &str, key: &str) -> Result<(), Error> {
    let addressed: u32 = key.parse().map_err(|_| Error::request_value(field, key))?;
    match payload.get_u32(field)? {
        Some(existing) if existing != addressed => Err(Error::request_value(field, existing)),
        _ => {
            payload.set(field, Value::from(addressed));
            Ok(())
        }
    }
}

fn str_payload_key(payload: &Payload, field: &str) -> Result<String, Error> {
    payload
        .get_str(field)?
        .ok_or_else(|| Error::RequestValueMissing {
            field: field.to_owned(),
        })
}

fn u32_payload_key(payload: &Payload, field: &str) -> Result<String, Error> {
    payload
        .get_u32(field)?
        .map(|id| id.to_string())
        .ok_or_else(|| Error::RequestValueMissing {
            field: field.to_owned(),
        })
}

macro_rules! driver_binding {
    ($read:ident, $create:ident, $update:ident, $delete:ident) => {
        fn read(
            driver: &dyn DeviceDriver,
            key: Option<&str>,
        ) -> Result<DriverResponse<Self>, DriverError> {
            driver.$read(key)
        }
        fn create(driver: &dyn DeviceDriver, entity: Self) -> Result<Self, DriverError> {
            driver.$create(entity)
        }
        fn update(
            driver: &dyn DeviceDriver,
            entity: Self,
            update: bool,
        ) -> Result<Self, DriverError> {
            driver.$update(entity, update)
        }
        fn delete(driver: &dyn DeviceDriver, key: &str) -> Result<(), DriverError> {
            driver.$delete(key)
        }
    };
}

impl Resource for Interface {
    const KIND: ResourceKind = ResourceKind::Interface;
    const IDENTITY: &'static str = "name";
    const REQUIRED: &'static [&'static str] = &["name", "mode", "attributes"];

    fn from_payload(payload: &Payload, partial: bool) -> Result<Self, Error> {
        Interface::from_payload(payload, partial)
    }

    fn key(&self) -> String {
        self.name.clone()
    }

    fn merge(&mut self, update: &Self) {
        Interface::merge(self, update);
    }

    fn validate_full(&self) -> Result<(), Error> {
        self.validate(false)
    }

    fn apply_defaults(payload: &mut Payload) {
        payload.set_default("admin_enabled", Value::Bool(true));
        payload.set_default("mtu", Value::from(1500));
    }

    fn normalize_identity(payload: &mut Payload, key: &str) -> Result<(), Error> {
        normalize_str_identity(payload, Self::IDENTITY, key)
    }

    fn payload_key(payload: &Payload) -> Result<String, Error> {
        str_payload_key(payload, Self::IDENTITY)
    }

    driver_binding!(interface_read, interface_create, interface_update, interface_delete);
}

impl Resource for Lag {
    const KIND: ResourceKind = ResourceKind::Lag;
    const IDENTITY: &'static str = "name";
    const REQUIRED: &'static [&'static str] = &["name"];

    fn from_payload(payload: &Payload, _partial: bool) -> Result<Self, Error> {
        Lag::from_payload(payload)
    }

    fn key(&self) -> String {
        self.name.clone()
    }

    fn merge(&mut self, update: &Self) {
        Lag::merge(self, update);
    }

    fn normalize_identity(payload: &mut Payload, key: &str) -> Result<(), Error> {
        normalize_str_identity(payload, Self::IDENTITY, key)
    }

    fn payload_key(payload: &Payload) -> Result<String, Error> {
        str_payload_key(payload, Self::IDENTITY)
    }

    driver_binding!(lag_read, lag_create, lag_update, lag_delete);
}

impl Resource for Vlan {
    const KIND: ResourceKind = ResourceKind::Vlan;
    const IDENTITY: &'static str = "id";
    const REQUIRED: &'static [&'static str] = &["id"];

    fn from_payload(payload: &Payload, _partial: bool) -> Result<Self, Error> {
        Vlan::from_payload(payload)
    }

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn merge(&mut self, update: &Self) {
        Vlan::merge(self, update);
    }

    fn apply_defaults(payload: &mut Payload) {
        payload.set_default("admin_enabled", Value::Bool(true));
    }

    fn normalize_identity(payload: &mut Payload, key: &str) -> Result<(), Error> {
        normalize_u32_identity(payload, Self::IDENTITY, key)
    }

    fn payload_key(payload: &Payload) -> Result<String, Error> {
        u32_payload_key(payload, Self::IDENTITY)
    }

    driver_binding!(vlan_read, vlan_create, vlan_update, vlan_delete);
}

impl Resource for Vrf {
    const KIND: ResourceKind = ResourceKind::Vrf;
    const IDENTITY: &'static str = "name";
    const REQUIRED: &'static [&'static str] = &["name"];

    fn from_payload(payload: &Payload, _partial: bool) -> Result<Self, Error> {
        Vrf::from_payload(payload)
    }

    fn key(&self) -> String {
        self.name.clone()
    }

    fn merge(&mut self, update: &Self) {
        Vrf::merge(self, update);
    }

    fn normalize_identity(payload: &mut Payload, key: &str) -> Result<(), Error> {
        normalize_str_identity(payload, Self::IDENTITY, key)
    }

    fn payload_key(payload: &Payload) -> Result<String, Error> {
        str_payload_key(payload, Self::IDENTITY)
    }

    driver_binding!(vrf_read, vrf_create, vrf_update, vrf_delete);
}

impl Resource for Vxlan {
    const KIND: ResourceKind = ResourceKind::Vxlan;
    const IDENTITY: &'static str = "id";
    const REQUIRED: &'static [&'static str] = &["id", "layer"];

    fn from_payload(payload: &Payload, _partial: bool) -> Result<Self, Error> {
        Vxlan::from_payload(payload)
    }

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn merge(&mut self, update: &Self) {
        Vxlan::merge(self, update);
    }

    fn validate_full(&self) -> Result<(), Error> {
        self.check_binding()
    }

    fn normalize_identity(payload: &mut Payload, key: &str) -> Result<(), Error> {
        normalize_u32_identity(payload, Self::IDENTITY, key)
    }

    fn payload_key(payload: &Payload) -> Result<String, Error> {
        u32_payload_key(payload, Self::IDENTITY)
    }

    driver_binding!(vxlan_read, vxlan_create, vxlan_update, vxlan_delete);
}

// ── The service ─────────────────────────────────────────────────────

/// One service instance serves one device for the life of a request.
pub struct DeviceService {
    device: Device,
    driver: Box<dyn DeviceDriver>,
}

impl DeviceService {
    pub fn new(device: Device, driver: Box<dyn DeviceDriver>) -> Self {
        Self { device, driver }
    }

    /// Resolve a device record and instantiate its driver.
    pub fn open(
        backend: &dyn DeviceBackend,
        registry: &DriverRegistry,
        device_id: &str,
    ) -> Result<Self, Error> {
        let device = resolve_device(backend, device_id)?;
        let driver = registry.build(&device)?;
        debug!(device_id, driver = %device.driver, "device service opened");
        Ok(Self::new(device, driver))
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    fn gate(&self, kind: ResourceKind, action: Action) -> Result<(), Error> {
        if self.driver.capabilities().supports(kind, action) {
            Ok(())
        } else {
            Err(DriverError::unsupported(kind, action)
                .into_error(&self.device.driver, &self.device.id))
        }
    }

    fn driver_err(&self, err: DriverError) -> Error {
        err.into_error(&self.device.driver, &self.device.id)
    }

    fn invalid_response(&self) -> Error {
        warn!(device_id = %self.device.id, driver = %self.device.driver, "driver returned a malformed response");
        Error::DriverResponseInvalid {
            driver: self.device.driver.clone(),
        }
    }

    /// Keyed read against the driver, shape-checked. `Ok(None)` means
    /// the object does not exist.
    fn probe<R: Resource>(&self, key: &str) -> Result<Option<R>, Error> {
        match R::read(self.driver.as_ref(), Some(key)).map_err(|e| self.driver_err(e))? {
            DriverResponse::One(entity) => Ok(Some(entity)),
            DriverResponse::None => Ok(None),
            DriverResponse::Many(_) => Err(self.invalid_response()),
        }
    }

    /// List every object of a resource family.
    pub fn list<R: Resource>(&self) -> Result<Vec<R>, Error> {
        self.gate(R::KIND, Action::Read)?;
        debug!(device_id = %self.device.id, kind = %R::KIND, "read all");
        match R::read(self.driver.as_ref(), None).map_err(|e| self.driver_err(e))? {
            DriverResponse::Many(entities) => Ok(entities),
            DriverResponse::One(_) | DriverResponse::None => Err(self.invalid_response()),
        }
    }

    /// Read one object; absence is [`Error::ObjectNotFound`].
    pub fn read<R: Resource>(&self, key: &str) -> Result<R, Error> {
        self.gate(R::KIND, Action::Read)?;
        debug!(device_id = %self.device.id, kind = %R::KIND, key, "read");
        self.probe::<R>(key)?.ok_or(Error::ObjectNotFound)
    }

    /// Create a new object from a collection-level request. Identity
    /// comes from the body; an existing object is a conflict.
    pub fn create<R: Resource>(&self, payload: Payload) -> Result<R, Error> {
        self.gate(R::KIND, Action::Create)?;
        payload.require(R::REQUIRED)?;
        let key = R::payload_key(&payload)?;
        debug!(device_id = %self.device.id, kind = %R::KIND, key, "create");
        if self.probe::<R>(&key)?.is_some() {
            return Err(Error::ObjectExists { name: Some(key) });
        }
        let mut payload = payload;
        R::apply_defaults(&mut payload);
        let entity = R::from_payload(&payload, false)?;
        R::create(self.driver.as_ref(), entity).map_err(|e| self.driver_err(e))
    }

    /// Replace the addressed object wholesale. The body must be a
    /// complete object; orchestration defaults fill the usual gaps.
    pub fn replace<R: Resource>(&self, key: &str, payload: Payload) -> Result<R, Error> {
        // Identity precedence is checked before the capability gate: a
        // conflicting body identifier is a bad request even when the
        // driver could not have carried it out.
        let mut payload = payload;
        R::normalize_identity(&mut payload, key)?;
        self.gate(R::KIND, Action::Update)?;
        payload.require(R::REQUIRED)?;
        R::apply_defaults(&mut payload);
        debug!(device_id = %self.device.id, kind = %R::KIND, key, "replace");
        let entity = R::from_payload(&payload, false)?;
        R::update(self.driver.as_ref(), entity, false).map_err(|e| self.driver_err(e))
    }

    /// Merge the supplied fields into the addressed object. Unset
    /// fields keep their device state; no defaults are injected.
    pub fn update<R: Resource>(&self, key: &str, payload: Payload) -> Result<R, Error> {
        let mut payload = payload;
        R::normalize_identity(&mut payload, key)?;
        self.gate(R::KIND, Action::Update)?;
        debug!(device_id = %self.device.id, kind = %R::KIND, key, "update");
        // Pre-check before the rest of body validation: an absent
        // object is 404 regardless of what else is wrong with it.
        let mut current = self.probe::<R>(key)?.ok_or(Error::ObjectNotFound)?;
        let patch = R::from_payload(&payload, true)?;
        current.merge(&patch);
        // The merged result must satisfy the same cross-field
        // invariants a full build does before the driver sees it.
        current.validate_full()?;
        R::update(self.driver.as_ref(), current, true).map_err(|e| self.driver_err(e))
    }

    /// Delete the addressed object; absence is [`Error::ObjectNotFound`].
    pub fn delete<R: Resource>(&self, key: &str) -> Result<(), Error> {
        self.gate(R::KIND, Action::Delete)?;
        debug!(device_id = %self.device.id, kind = %R::KIND, key, "delete");
        if self.probe::<R>(key)?.is_none() {
            return Err(Error::ObjectNotFound);
        }
        R::delete(self.driver.as_ref(), key).map_err(|e| self.driver_err(e))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::driver::Capabilities;

    // A driver that supports reads for one fixed VLAN and nothing
    // else, for exercising the gate and shape checks.
    struct ReadOnlyVlans {
        capabilities: Capabilities,
        vlans: Vec<Vlan>,
    }

    impl ReadOnlyVlans {
        fn with(vlans: Vec<Vlan>) -> DeviceService {
            let driver = Self {
                capabilities: Capabilities::builder()
                    .actions(ResourceKind::Vlan, &[Action::Read])
                    .build(),
                vlans,
            };
            DeviceService::new(
                Device {
                    id: "sw1".into(),
                    address: "198.18.0.10".into(),
                    driver: "test".into(),
                    credentials: None,
                    attributes: serde_json::Map::new(),
                },
                Box::new(driver),
            )
        }
    }

    impl DeviceDriver for ReadOnlyVlans {
        fn capabilities(&self) -> &Capabilities {
            &self.capabilities
        }

        fn vlan_read(&self, key: Option<&str>) -> Result<DriverResponse<Vlan>, DriverError> {
            match key {
                None => Ok(DriverResponse::Many(self.vlans.clone())),
                Some(key) => Ok(self
                    .vlans
                    .iter()
                    .find(|v| v.id.to_string() == key)
                    .cloned()
                    .map_or(DriverResponse::None, DriverResponse::One)),
            }
        }
    }

    fn vlan(id: u16) -> Vlan {
        Vlan {
            id,
            name: None,
            bridge_domain: None,
            admin_enabled: Some(true),
        }
    }

    #[test]
    fn read_all_returns_listing() {
        let service = ReadOnlyVlans::with(vec![vlan(10), vlan(20)]);
        let vlans: Vec<Vlan> = service.list().unwrap();
        assert_eq!(vlans.len(), 2);
    }

    #[test]
    fn read_miss_is_not_found() {
        let service = ReadOnlyVlans::with(vec![vlan(10)]);
        let err = service.read::<Vlan>("99").unwrap_err();
        assert_eq!(err, Error::ObjectNotFound);
    }

    #[test]
    fn ungated_action_is_unsupported_before_dispatch() {
        let service = ReadOnlyVlans::with(vec![vlan(10)]);
        let err = service.delete::<Vlan>("10").unwrap_err();
        assert_eq!(err.status(), 501);
        // Consistent on repeat queries.
        let again = service.delete::<Vlan>("10").unwrap_err();
        assert_eq!(err, again);
    }

    #[test]
    fn unsupported_kind_is_gated() {
        let service = ReadOnlyVlans::with(vec![]);
        let err = service.list::<Vrf>().unwrap_err();
        assert!(matches!(err, Error::DriverOperationUnsupported { ref operation, .. }
            if operation == "vrf:read"));
    }

    #[test]
    fn identity_conflict_rejected() {
        // This driver cannot update at all; the conflicting body id is
        // still a bad request, not an unsupported operation.
        let service = ReadOnlyVlans::with(vec![vlan(10)]);
        let payload = Payload::from_value(json!({"id": 20, "name": "blue"})).unwrap();
        let err = service.update::<Vlan>("10", payload).unwrap_err();
        assert!(matches!(err, Error::RequestValue { ref field, .. } if field == "id"));
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn identity_injected_when_body_omits_it() {
        let service = ReadOnlyVlans::with(vec![vlan(10)]);
        // The addressed key is injected cleanly; the capability check
        // then fires before any dispatch.
        let payload = Payload::from_value(json!({"name": "blue"})).unwrap();
        let err = service.update::<Vlan>("10", payload).unwrap_err();
        assert_eq!(err.status(), 501);
    }
}
