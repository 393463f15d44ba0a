// ── Interface domain types ──
//
// An interface's attributes are a tagged sum keyed by its mode:
// routed interfaces carry addresses and a VRF binding, bridged
// interfaces carry 802.1Q state, aggregated interfaces carry nothing
// (their config lives on the LAG). The mode/attributes pairing is an
// invariant enforced at construction and preserved by merge.

use std::net::IpAddr;
use std::str::FromStr;

use ipnet::IpNet;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::mac::MacAddress;
use crate::payload::Payload;

// ── Enums ───────────────────────────────────────────────────────────

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

/// How a virtual address is shared between devices.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VirtualAddressType {
    Anycast,
    Vrrp,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InterfaceMode {
    Routed,
    Bridged,
    Aggregated,
}

// ── InterfaceAddress ────────────────────────────────────────────────

/// An address bound to a routed interface, kept in `ip/prefix` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceAddress {
    pub address: String,
    pub family: AddressFamily,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
    pub virtual_type: Option<VirtualAddressType>,
}

fn address_family(address: &str) -> Result<AddressFamily, Error> {
    let addr = if address.contains('/') {
        IpNet::from_str(address)
            .map(|net| net.addr())
            .map_err(|_| Error::request_value("address", address))?
    } else {
        IpAddr::from_str(address).map_err(|_| Error::request_value("address", address))?
    };
    Ok(match addr {
        IpAddr::V4(_) => AddressFamily::Ipv4,
        IpAddr::V6(_) => AddressFamily::Ipv6,
    })
}

impl InterfaceAddress {
    /// Build and validate an address. `family` is derived from the
    /// address when unset and must agree with it when set.
    pub fn new(
        address: impl Into<String>,
        family: Option<AddressFamily>,
        is_virtual: bool,
        virtual_type: Option<VirtualAddressType>,
    ) -> Result<Self, Error> {
        let address = address.into();
        let derived = address_family(&address)?;
        if let Some(declared) = family {
            if declared != derived {
                return Err(Error::request_value_expected(
                    "family",
                    declared,
                    derived.to_string(),
                ));
            }
        }
        if is_virtual && virtual_type.is_none() {
            return Err(Error::request_value_expected(
                "virtual_type",
                "null",
                "[anycast, vrrp]",
            ));
        }
        Ok(Self {
            address,
            family: derived,
            is_virtual,
            virtual_type,
        })
    }

    pub fn from_payload(payload: &Payload) -> Result<Self, Error> {
        let address = payload.get_str("address")?.ok_or_else(|| Error::RequestValueMissing {
            field: "address".into(),
        })?;
        let family = payload
            .get_str("family")?
            .map(|raw| {
                AddressFamily::from_str(&raw).map_err(|_| {
                    Error::request_value_expected("family", &raw, "[ipv4, ipv6]")
                })
            })
            .transpose()?;
        let is_virtual = payload.get_bool("virtual")?.unwrap_or(false);
        let virtual_type = payload
            .get_str("virtual_type")?
            .map(|raw| {
                VirtualAddressType::from_str(&raw).map_err(|_| {
                    Error::request_value_expected("virtual_type", &raw, "[anycast, vrrp]")
                })
            })
            .transpose()?;
        Self::new(address, family, is_virtual, virtual_type)
    }
}

// ── Attribute variants ──────────────────────────────────────────────

/// 802.1Q state for a bridged interface.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BridgeAttributes {
    pub dot1q_enabled: Option<bool>,
    pub dot1q_vids: Option<Vec<u16>>,
    pub dot1q_pvid: Option<u16>,
}

impl BridgeAttributes {
    pub fn from_payload(payload: &Payload) -> Result<Self, Error> {
        Ok(Self {
            dot1q_enabled: payload.get_bool("dot1q_enabled")?,
            dot1q_vids: payload.get_u16_list("dot1q_vids")?,
            dot1q_pvid: payload.get_u16("dot1q_pvid")?,
        })
    }

    /// Scalars overwrite when set. The vid list only follows an update
    /// that also re-enables dot1q, so a tag change cannot silently ride
    /// in on a disabled trunk.
    pub fn merge(&mut self, update: &BridgeAttributes) {
        if let Some(enabled) = update.dot1q_enabled {
            self.dot1q_enabled = Some(enabled);
        }
        if let Some(pvid) = update.dot1q_pvid {
            self.dot1q_pvid = Some(pvid);
        }
        if update.dot1q_vids.is_some() && update.dot1q_enabled == Some(true) {
            self.dot1q_vids.clone_from(&update.dot1q_vids);
        }
    }
}

/// Layer-3 state for a routed interface.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RouteAttributes {
    pub addresses: Option<Vec<InterfaceAddress>>,
    pub vrf: Option<String>,
    pub evpn_anycast_mac: Option<MacAddress>,
}

impl RouteAttributes {
    pub fn from_payload(payload: &Payload) -> Result<Self, Error> {
        let addresses = payload
            .get_object_list("addresses")?
            .map(|items| {
                items
                    .iter()
                    .map(InterfaceAddress::from_payload)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;
        let evpn_anycast_mac = payload
            .get_str("evpn_anycast_mac")?
            .map(|raw| {
                MacAddress::parse(&raw)
                    .map_err(|_| Error::request_value("evpn_anycast_mac", &raw))
            })
            .transpose()?;
        Ok(Self {
            addresses,
            vrf: payload.get_str("vrf")?,
            evpn_anycast_mac,
        })
    }

    /// Addresses merge with set-union semantics; duplicates collapse.
    pub fn merge(&mut self, update: &RouteAttributes) {
        if let Some(vrf) = &update.vrf {
            self.vrf = Some(vrf.clone());
        }
        if let Some(mac) = &update.evpn_anycast_mac {
            self.evpn_anycast_mac = Some(mac.clone());
        }
        if let Some(incoming) = &update.addresses {
            let merged = self.addresses.get_or_insert_with(Vec::new);
            for address in incoming {
                if !merged.contains(address) {
                    merged.push(address.clone());
                }
            }
        }
    }
}

/// Mode-keyed attribute payload.
///
/// The untagged decoding is ambiguous: both variants are all-optional,
/// so an empty or underspecified object decodes as `Routed`. Typed
/// construction therefore goes through [`Interface::from_payload`],
/// which selects the variant from the declared `mode` instead of
/// deserializing this enum directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InterfaceAttributes {
    Routed(RouteAttributes),
    Bridged(BridgeAttributes),
}

impl InterfaceAttributes {
    fn same_kind(&self, other: &InterfaceAttributes) -> bool {
        matches!(
            (self, other),
            (Self::Routed(_), Self::Routed(_)) | (Self::Bridged(_), Self::Bridged(_))
        )
    }

    fn merge(&mut self, update: &InterfaceAttributes) {
        match (self, update) {
            (Self::Routed(current), Self::Routed(incoming)) => current.merge(incoming),
            (Self::Bridged(current), Self::Bridged(incoming)) => current.merge(incoming),
            // Kind changes are handled by Interface::merge as a
            // wholesale replacement, never field-wise.
            (current, incoming) => *current = incoming.clone(),
        }
    }
}

// ── Interface ───────────────────────────────────────────────────────

/// A physical or virtual interface. Identity is the interface name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    pub mode: Option<InterfaceMode>,
    pub description: Option<String>,
    #[serde(rename = "virtual")]
    pub is_virtual: Option<bool>,
    pub attributes: Option<InterfaceAttributes>,
    pub admin_enabled: Option<bool>,
    pub physical_address: Option<MacAddress>,
    pub child: Option<bool>,
    pub parent: Option<String>,
    pub speed: Option<u32>,
    pub duplex: Option<String>,
    pub mtu: Option<u32>,
}

impl Interface {
    /// Build an interface from request data.
    ///
    /// `partial` marks PATCH-style construction: unset fields stay
    /// unset and full-build requirements (aggregated parent) relax.
    pub fn from_payload(payload: &Payload, partial: bool) -> Result<Self, Error> {
        let name = payload.get_str("name")?.ok_or_else(|| Error::RequestValueMissing {
            field: "name".into(),
        })?;
        let mode = payload
            .get_str("mode")?
            .map(|raw| {
                InterfaceMode::from_str(&raw).map_err(|_| {
                    Error::request_value_expected("mode", &raw, "[routed, bridged, aggregated]")
                })
            })
            .transpose()?;
        let attributes = match payload.get_object("attributes")? {
            None => None,
            Some(attrs) => match mode {
                None => {
                    return Err(Error::RequestValueMissing {
                        field: "mode".into(),
                    });
                }
                Some(InterfaceMode::Routed) => {
                    Some(InterfaceAttributes::Routed(RouteAttributes::from_payload(&attrs)?))
                }
                Some(InterfaceMode::Bridged) => {
                    Some(InterfaceAttributes::Bridged(BridgeAttributes::from_payload(&attrs)?))
                }
                Some(InterfaceMode::Aggregated) => {
                    return Err(Error::request_value_expected(
                        "attributes",
                        "object",
                        "null for aggregated interfaces",
                    ));
                }
            },
        };
        let physical_address = payload
            .get_str("physical_address")?
            .map(|raw| {
                MacAddress::parse(&raw)
                    .map_err(|_| Error::request_value("physical_address", &raw))
            })
            .transpose()?;

        let interface = Self {
            name,
            mode,
            description: payload.get_str("description")?,
            is_virtual: payload.get_bool("virtual")?,
            attributes,
            admin_enabled: payload.get_bool("admin_enabled")?,
            physical_address,
            child: payload.get_bool("child")?,
            parent: payload.get_str("parent")?,
            speed: payload.get_u32("speed")?,
            duplex: payload.get_str("duplex")?,
            mtu: payload.get_u32("mtu")?,
        };
        interface.validate(partial)?;
        Ok(interface)
    }

    /// Cross-field invariants. Child interfaces always need a parent;
    /// aggregated interfaces need one on full builds.
    pub fn validate(&self, partial: bool) -> Result<(), Error> {
        if self.child == Some(true) && self.parent.is_none() {
            return Err(Error::request_value("parent", "null"));
        }
        match (self.mode, &self.attributes) {
            (Some(InterfaceMode::Routed), Some(InterfaceAttributes::Bridged(_)))
            | (Some(InterfaceMode::Bridged), Some(InterfaceAttributes::Routed(_))) => {
                return Err(Error::request_value_expected(
                    "attributes",
                    "mismatched attribute kind",
                    format!("{} attributes", self.mode.map(|m| m.to_string()).unwrap_or_default()),
                ));
            }
            (Some(InterfaceMode::Aggregated), Some(_)) => {
                return Err(Error::request_value_expected(
                    "attributes",
                    "object",
                    "null for aggregated interfaces",
                ));
            }
            _ => {}
        }
        if !partial && self.mode == Some(InterfaceMode::Aggregated) && self.parent.is_none() {
            return Err(Error::RequestValueMissing {
                field: "parent".into(),
            });
        }
        Ok(())
    }

    /// Fold a partial update into this interface.
    ///
    /// Set scalars overwrite; attributes merge field-wise only when the
    /// mode (or attribute kind) is unchanged, otherwise the mode change
    /// replaces mode and attributes together.
    pub fn merge(&mut self, update: &Interface) {
        if let Some(description) = &update.description {
            self.description = Some(description.clone());
        }
        if let Some(is_virtual) = update.is_virtual {
            self.is_virtual = Some(is_virtual);
        }
        if let Some(admin_enabled) = update.admin_enabled {
            self.admin_enabled = Some(admin_enabled);
        }
        if let Some(physical_address) = &update.physical_address {
            self.physical_address = Some(physical_address.clone());
        }
        if let Some(child) = update.child {
            self.child = Some(child);
        }
        if let Some(parent) = &update.parent {
            self.parent = Some(parent.clone());
        }
        if let Some(speed) = update.speed {
            self.speed = Some(speed);
        }
        if let Some(duplex) = &update.duplex {
            self.duplex = Some(duplex.clone());
        }
        if let Some(mtu) = update.mtu {
            self.mtu = Some(mtu);
        }

        if let Some(incoming) = &update.attributes {
            match &mut self.attributes {
                Some(current) if current.same_kind(incoming) => current.merge(incoming),
                // Kind change: replace wholesale.
                other => *other = Some(incoming.clone()),
            }
        }
        if let Some(mode) = update.mode {
            if self.mode != Some(mode) {
                self.mode = Some(mode);
                // A mode change makes attributes of the old kind
                // stale; they survive only when the update supplied
                // replacements of the new kind (handled above).
                let compatible = matches!(
                    (&self.attributes, mode),
                    (Some(InterfaceAttributes::Routed(_)), InterfaceMode::Routed)
                        | (Some(InterfaceAttributes::Bridged(_)), InterfaceMode::Bridged)
                        | (None, _)
                );
                if !compatible {
                    self.attributes = None;
                }
            }
        }
    }
}
