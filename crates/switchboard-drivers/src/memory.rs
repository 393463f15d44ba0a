//! In-memory driver.
//!
//! Stores canonical objects in per-resource maps, faithfully keeping
//! whatever the service layer hands it. Useful as a test double and as
//! the reference for how a driver honors the contract: reads return
//! exactly what was stored, writes store exactly what arrives, and no
//! defaulting happens here.

use dashmap::DashMap;
use tracing::trace;

use switchboard_core::driver::{
    Capabilities, DeviceDriver, DriverError, DriverResponse, ResourceKind,
};
use switchboard_core::model::{Interface, Lag, Vlan, Vrf, Vxlan};
use switchboard_core::Resource;

pub struct MemoryDriver {
    capabilities: Capabilities,
    interfaces: DashMap<String, Interface>,
    lags: DashMap<String, Lag>,
    vlans: DashMap<String, Vlan>,
    vrfs: DashMap<String, Vrf>,
    vxlans: DashMap<String, Vxlan>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self {
            capabilities: Capabilities::builder()
                .full(ResourceKind::Interface)
                .full(ResourceKind::Lag)
                .full(ResourceKind::Vlan)
                .full(ResourceKind::Vrf)
                .full(ResourceKind::Vxlan)
                .build(),
            interfaces: DashMap::new(),
            lags: DashMap::new(),
            vlans: DashMap::new(),
            vrfs: DashMap::new(),
            vxlans: DashMap::new(),
        }
    }
}

impl Default for MemoryDriver {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! memory_table {
    ($table:ident, $kind:expr, $entity:ty,
     $read:ident, $create:ident, $update:ident, $delete:ident) => {
        fn $read(&self, key: Option<&str>) -> Result<DriverResponse<$entity>, DriverError> {
            match key {
                None => Ok(DriverResponse::Many(
                    self.$table.iter().map(|entry| entry.value().clone()).collect(),
                )),
                Some(key) => Ok(self
                    .$table
                    .get(key)
                    .map(|entry| entry.value().clone())
                    .map_or(DriverResponse::None, DriverResponse::One)),
            }
        }

        fn $create(&self, entity: $entity) -> Result<$entity, DriverError> {
            trace!(kind = %$kind, key = %Resource::key(&entity), "create");
            self.$table.insert(Resource::key(&entity), entity.clone());
            Ok(entity)
        }

        fn $update(&self, entity: $entity, _update: bool) -> Result<$entity, DriverError> {
            trace!(kind = %$kind, key = %Resource::key(&entity), "update");
            self.$table.insert(Resource::key(&entity), entity.clone());
            Ok(entity)
        }

        fn $delete(&self, key: &str) -> Result<(), DriverError> {
            trace!(kind = %$kind, key, "delete");
            self.$table
                .remove(key)
                .map(|_| ())
                .ok_or_else(|| DriverError::request(format!("no such object: {key}")))
        }
    };
}

impl DeviceDriver for MemoryDriver {
    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    memory_table!(
        interfaces,
        ResourceKind::Interface,
        Interface,
        interface_read,
        interface_create,
        interface_update,
        interface_delete
    );

    memory_table!(lags, ResourceKind::Lag, Lag, lag_read, lag_create, lag_update, lag_delete);

    memory_table!(
        vlans,
        ResourceKind::Vlan,
        Vlan,
        vlan_read,
        vlan_create,
        vlan_update,
        vlan_delete
    );

    memory_table!(vrfs, ResourceKind::Vrf, Vrf, vrf_read, vrf_create, vrf_update, vrf_delete);

    memory_table!(
        vxlans,
        ResourceKind::Vxlan,
        Vxlan,
        vxlan_read,
        vxlan_create,
        vxlan_update,
        vxlan_delete
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use switchboard_core::driver::Action;

    use super::*;

    #[test]
    fn full_capability_matrix() {
        let driver = MemoryDriver::new();
        for kind in [
            ResourceKind::Interface,
            ResourceKind::Lag,
            ResourceKind::Vlan,
            ResourceKind::Vrf,
            ResourceKind::Vxlan,
        ] {
            for action in Action::ALL {
                assert!(driver.capabilities().supports(kind, action));
            }
        }
    }

    #[test]
    fn stored_objects_round_trip() {
        let driver = MemoryDriver::new();
        let vlan = Vlan {
            id: 72,
            name: Some("vlan72".into()),
            bridge_domain: None,
            admin_enabled: Some(true),
        };
        driver.vlan_create(vlan.clone()).unwrap();
        let read = driver.vlan_read(Some("72")).unwrap();
        assert_eq!(read, DriverResponse::One(vlan));
    }

    #[test]
    fn delete_missing_is_request_error() {
        let driver = MemoryDriver::new();
        let err = driver.vlan_delete("72").unwrap_err();
        assert!(matches!(err, DriverError::Request { .. }));
    }
}
