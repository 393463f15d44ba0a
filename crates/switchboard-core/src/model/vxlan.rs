//! VXLAN tunnel endpoints.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::payload::Payload;
use crate::validate;

/// What a VNI is stitched to: a bridge VLAN at layer 2, a VRF at
/// layer 3. The layer field decides which shape is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoundObject {
    Vlan(u16),
    Vrf(String),
}

/// A VXLAN VNI. Identity is the VNI id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vxlan {
    pub id: u32,
    pub layer: Option<u8>,
    pub source_address: Option<String>,
    pub import_targets: Option<Vec<String>>,
    pub export_targets: Option<Vec<String>>,
    pub route_distinguisher: Option<String>,
    pub bound_object_id: Option<BoundObject>,
}

fn check_targets(field: &str, targets: &[String]) -> Result<(), Error> {
    for target in targets {
        if !validate::is_route_target(target, true) {
            return Err(Error::request_value(field, target));
        }
    }
    Ok(())
}

impl Vxlan {
    pub fn from_payload(payload: &Payload) -> Result<Self, Error> {
        let id = payload.get_u32("id")?.ok_or_else(|| Error::RequestValueMissing {
            field: "id".into(),
        })?;
        let layer = payload.get_u8("layer")?;
        if let Some(layer) = layer {
            if layer != 2 && layer != 3 {
                return Err(Error::request_value_expected("layer", layer, "[2, 3]"));
            }
        }
        let bound_object_id = match payload.raw("bound_object_id") {
            None | Some(serde_json::Value::Null) => None,
            Some(raw) => Some(Self::bound_object(layer, raw)?),
        };
        let source_address = payload.get_str("source_address")?;
        if let Some(address) = &source_address {
            if !validate::is_ipv4_address(address) {
                return Err(Error::request_value("source_address", address));
            }
        }
        let import_targets = payload.get_str_list("import_targets")?;
        if let Some(targets) = &import_targets {
            check_targets("import_targets", targets)?;
        }
        let export_targets = payload.get_str_list("export_targets")?;
        if let Some(targets) = &export_targets {
            check_targets("export_targets", targets)?;
        }
        let route_distinguisher = payload.get_str("route_distinguisher")?;
        if let Some(rd) = &route_distinguisher {
            if !validate::is_route_distinguisher(rd) {
                return Err(Error::request_value("route_distinguisher", rd));
            }
        }
        Ok(Self {
            id,
            layer,
            source_address,
            import_targets,
            export_targets,
            route_distinguisher,
            bound_object_id,
        })
    }

    /// A layer-2 binding is a VLAN id, accepted as a number or a
    /// numeric string. A layer-3 binding is a VRF name; numeric names
    /// are stringified.
    fn bound_object(layer: Option<u8>, raw: &serde_json::Value) -> Result<BoundObject, Error> {
        let Some(layer) = layer else {
            return Err(Error::RequestValueMissing {
                field: "layer".into(),
            });
        };
        match layer {
            2 => {
                let vid = match raw {
                    serde_json::Value::Number(n) => {
                        n.as_u64().and_then(|n| u16::try_from(n).ok())
                    }
                    serde_json::Value::String(s) => s.parse::<u16>().ok(),
                    _ => None,
                };
                vid.map(BoundObject::Vlan)
                    .ok_or_else(|| Error::request_value("bound_object_id", raw))
            }
            _ => match raw {
                serde_json::Value::String(s) => Ok(BoundObject::Vrf(s.clone())),
                serde_json::Value::Number(n) => Ok(BoundObject::Vrf(n.to_string())),
                _ => Err(Error::request_value("bound_object_id", raw)),
            },
        }
    }

    /// The binding shape must agree with the layer: a VLAN id at
    /// layer 2, a VRF name at layer 3, and no binding without a layer.
    pub fn check_binding(&self) -> Result<(), Error> {
        let Some(bound) = &self.bound_object_id else {
            return Ok(());
        };
        match (self.layer, bound) {
            (None, _) => Err(Error::RequestValueMissing {
                field: "layer".into(),
            }),
            (Some(2), BoundObject::Vlan(_)) | (Some(3), BoundObject::Vrf(_)) => Ok(()),
            (Some(2), BoundObject::Vrf(name)) => {
                Err(Error::request_value("bound_object_id", name))
            }
            (Some(_), BoundObject::Vlan(vid)) => {
                Err(Error::request_value("bound_object_id", vid))
            }
            (Some(layer), _) => Err(Error::request_value_expected("layer", layer, "[2, 3]")),
        }
    }

    pub fn merge(&mut self, update: &Vxlan) {
        if let Some(layer) = update.layer {
            self.layer = Some(layer);
        }
        if let Some(address) = &update.source_address {
            self.source_address = Some(address.clone());
        }
        if let Some(targets) = &update.import_targets {
            self.import_targets = Some(targets.clone());
        }
        if let Some(targets) = &update.export_targets {
            self.export_targets = Some(targets.clone());
        }
        if let Some(rd) = &update.route_distinguisher {
            self.route_distinguisher = Some(rd.clone());
        }
        if let Some(bound) = &update.bound_object_id {
            self.bound_object_id = Some(bound.clone());
        }
    }
}
