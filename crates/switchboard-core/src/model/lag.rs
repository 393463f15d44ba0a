//! Link aggregation groups.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::evpn;
use crate::payload::Payload;

/// A LAG bundles member interfaces under one logical name. The EVPN
/// segment identifier is either the literal `auto` or a normalized
/// colon-hex ESI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lag {
    pub name: String,
    pub members: Option<Vec<String>>,
    pub evpn_esi: Option<String>,
}

fn normalize_esi_field(raw: &str) -> Result<String, Error> {
    if raw == "auto" {
        return Ok(raw.to_owned());
    }
    evpn::normalize_esi(raw).map_err(|_| Error::request_value("evpn_esi", raw))
}

impl Lag {
    pub fn from_payload(payload: &Payload) -> Result<Self, Error> {
        let name = payload.get_str("name")?.ok_or_else(|| Error::RequestValueMissing {
            field: "name".into(),
        })?;
        let evpn_esi = payload
            .get_str("evpn_esi")?
            .map(|raw| normalize_esi_field(&raw))
            .transpose()?;
        Ok(Self {
            name,
            members: payload.get_str_list("members")?,
            evpn_esi,
        })
    }

    /// Set fields overwrite; the member list replaces as a unit.
    pub fn merge(&mut self, update: &Lag) {
        if let Some(members) = &update.members {
            self.members = Some(members.clone());
        }
        if let Some(esi) = &update.evpn_esi {
            self.evpn_esi = Some(esi.clone());
        }
    }
}
