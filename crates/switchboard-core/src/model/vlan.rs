// ── VLAN domain type ──

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::payload::Payload;

/// A bridge VLAN. Identity is the 802.1Q id.
///
/// Immutable system VLANs (dynamic or device-reserved) are never
/// surfaced by drivers; this type only ever describes mutable VLANs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vlan {
    pub id: u16,
    pub name: Option<String>,
    pub bridge_domain: Option<String>,
    pub admin_enabled: Option<bool>,
}

impl Vlan {
    pub fn from_payload(payload: &Payload) -> Result<Self, Error> {
        let id = payload.get_u16("id")?.ok_or_else(|| Error::RequestValueMissing {
            field: "id".into(),
        })?;
        Ok(Self {
            id,
            name: payload.get_str("name")?,
            bridge_domain: payload.get_str("bridge_domain")?,
            admin_enabled: payload.get_bool("admin_enabled")?,
        })
    }

    /// Fold a partial update into this VLAN. Unset fields are ignored.
    pub fn merge(&mut self, update: &Vlan) {
        if let Some(name) = &update.name {
            self.name = Some(name.clone());
        }
        if let Some(bridge_domain) = &update.bridge_domain {
            self.bridge_domain = Some(bridge_domain.clone());
        }
        if let Some(admin_enabled) = update.admin_enabled {
            self.admin_enabled = Some(admin_enabled);
        }
    }
}

// ── VLAN range globs ────────────────────────────────────────────────
//
// Cisco-like CLIs express VLAN memberships as range globs
// ("1,3,5-10"). Drivers use these when rendering or parsing device
// configuration.

/// Convert a list of VLAN ids into a range glob. Ids are sorted first;
/// contiguous runs collapse into `start-end`.
pub fn vlan_list_to_glob(vlans: &[u16]) -> String {
    let mut vlans = vlans.to_vec();
    vlans.sort_unstable();

    let mut parts: Vec<String> = Vec::new();
    let mut i = 0;
    while i < vlans.len() {
        let start = vlans[i];
        let mut end = start;
        while i + 1 < vlans.len() && vlans[i + 1] == end + 1 {
            i += 1;
            end = vlans[i];
        }
        if start == end {
            parts.push(start.to_string());
        } else {
            parts.push(format!("{start}-{end}"));
        }
        i += 1;
    }
    parts.join(",")
}

/// Expand a range glob back into a list of VLAN ids.
pub fn glob_to_vlan_list(glob: &str) -> Result<Vec<u16>, Error> {
    let parse = |s: &str| -> Result<u16, Error> {
        s.trim()
            .parse::<u16>()
            .map_err(|_| Error::request_value("vlans", glob))
    };

    let mut vlans = Vec::new();
    for chunk in glob.split(',') {
        match chunk.split_once('-') {
            Some((start, end)) => {
                let (start, end) = (parse(start)?, parse(end)?);
                if start > end {
                    return Err(Error::request_value("vlans", glob));
                }
                vlans.extend(start..=end);
            }
            None => vlans.push(parse(chunk)?),
        }
    }
    Ok(vlans)
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
    fn from_payload_requires_id() {
        let err = Vlan::from_payload(&payload(json!({"name": "servers"}))).unwrap_err();
        assert_eq!(err, Error::RequestValueMissing { field: "id".into() });
    }

    #[test]
    fn merge_keeps_unset_fields() {
        let mut vlan = Vlan {
            id: 100,
            name: Some("servers".into()),
            bridge_domain: None,
            admin_enabled: Some(true),
        };
        vlan.merge(&Vlan {
            id: 100,
            name: None,
            bridge_domain: Some("dc1".into()),
            admin_enabled: None,
        });
        assert_eq!(vlan.name.as_deref(), Some("servers"));
        assert_eq!(vlan.bridge_domain.as_deref(), Some("dc1"));
        assert_eq!(vlan.admin_enabled, Some(true));
    }

    #[test]
    fn glob_collapses_ranges() {
        assert_eq!(vlan_list_to_glob(&[1, 2, 3, 7, 9, 10]), "1-3,7,9-10");
        assert_eq!(vlan_list_to_glob(&[5]), "5");
        assert_eq!(vlan_list_to_glob(&[]), "");
    }

    #[test]
    fn glob_round_trip_is_sorted_identity() {
        let lists: [&[u16]; 4] = [
            &[1, 2, 3],
            &[42],
            &[10, 5, 6, 7, 30, 31],
            &[4094, 1, 2, 3, 100],
        ];
        for list in lists {
            let mut expected = list.to_vec();
            expected.sort_unstable();
            assert_eq!(
                glob_to_vlan_list(&vlan_list_to_glob(list)).unwrap(),
                expected
            );
        }
    }

    #[test]
    fn malformed_glob_is_an_error() {
        assert!(glob_to_vlan_list("1,x").is_err());
        assert!(glob_to_vlan_list("9-5").is_err());
    }
}
