//! Virtual routing and forwarding instances.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::payload::Payload;
use crate::validate;

/// A VRF with optional EVPN import/export policy. Route targets and
/// the route distinguisher accept the literal `auto` so a driver can
/// derive them on the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vrf {
    pub name: String,
    pub ipv4: Option<bool>,
    pub ipv6: Option<bool>,
    pub import_targets: Option<Vec<String>>,
    pub export_targets: Option<Vec<String>>,
    pub route_distinguisher: Option<String>,
}

fn check_targets(field: &str, targets: &[String]) -> Result<(), Error> {
    for target in targets {
        if !validate::is_route_target(target, true) {
            return Err(Error::request_value(field, target));
        }
    }
    Ok(())
}

impl Vrf {
    pub fn from_payload(payload: &Payload) -> Result<Self, Error> {
        let name = payload.get_str("name")?.ok_or_else(|| Error::RequestValueMissing {
            field: "name".into(),
        })?;
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
            if rd != "auto" && !validate::is_route_distinguisher(rd) {
                return Err(Error::request_value("route_distinguisher", rd));
            }
        }
        Ok(Self {
            name,
            ipv4: payload.get_bool("ipv4")?,
            ipv6: payload.get_bool("ipv6")?,
            import_targets,
            export_targets,
            route_distinguisher,
        })
    }

    /// Set fields overwrite; unset address families and policy lists
    /// are left alone, so a PATCH enabling ipv6 keeps ipv4 intact.
    pub fn merge(&mut self, update: &Vrf) {
        if let Some(ipv4) = update.ipv4 {
            self.ipv4 = Some(ipv4);
        }
        if let Some(ipv6) = update.ipv6 {
            self.ipv6 = Some(ipv6);
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
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn payload(v: serde_json::Value) -> Payload {
        Payload::from_value(v).unwrap()
    }

    #[test]
    fn name_required() {
        let err = Vrf::from_payload(&payload(json!({"ipv4": true}))).unwrap_err();
        assert_eq!(
            err,
            Error::RequestValueMissing {
                field: "name".into()
            }
        );
    }

    #[test]
    fn auto_targets_and_rd_accepted() {
        let vrf = Vrf::from_payload(&payload(json!({
            "name": "red",
            "import_targets": ["auto", "65000:100"],
            "export_targets": ["auto"],
            "route_distinguisher": "auto"
        })))
        .unwrap();
        assert_eq!(vrf.route_distinguisher.as_deref(), Some("auto"));
    }

    #[test]
    fn malformed_target_rejected() {
        let err = Vrf::from_payload(&payload(json!({
            "name": "red",
            "import_targets": ["515555:515555"]
        })))
        .unwrap_err();
        assert!(
            matches!(err, Error::RequestValue { ref field, .. } if field == "import_targets")
        );
    }

    #[test]
    fn malformed_rd_rejected() {
        let err = Vrf::from_payload(&payload(json!({
            "name": "red",
            "route_distinguisher": "rd:distinguisher"
        })))
        .unwrap_err();
        assert!(
            matches!(err, Error::RequestValue { ref field, .. } if field == "route_distinguisher")
        );
    }

    #[test]
    fn merge_preserves_unset_families() {
        let mut vrf = Vrf::from_payload(&payload(json!({"name": "red", "ipv4": true}))).unwrap();
        let update =
            Vrf::from_payload(&payload(json!({"name": "red", "ipv6": true}))).unwrap();
        vrf.merge(&update);
        assert_eq!(vrf.ipv4, Some(true));
        assert_eq!(vrf.ipv6, Some(true));
    }
}
