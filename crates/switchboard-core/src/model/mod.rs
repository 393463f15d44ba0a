//! Canonical, vendor-neutral configuration objects.
//!
//! Every non-identity field is an `Option`: `None` means "not set in
//! this request", which is how PATCH merges know what to leave alone.

pub mod interface;
pub mod lag;
pub mod mac;
pub mod vlan;
pub mod vrf;
pub mod vxlan;

pub use interface::{
    AddressFamily, BridgeAttributes, Interface, InterfaceAddress, InterfaceAttributes,
    InterfaceMode, RouteAttributes, VirtualAddressType,
};
pub use lag::Lag;
pub use mac::MacAddress;
pub use vlan::{glob_to_vlan_list, vlan_list_to_glob, Vlan};
pub use vrf::Vrf;
pub use vxlan::{BoundObject, Vxlan};
