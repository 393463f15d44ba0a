// ── EVPN Ethernet Segment Identifier codec ──
//
// RFC 7432 §5 defines a 10-octet ESI whose first octet selects the
// layout of the remaining nine. `parse_esi` decodes into a tagged
// variant per type; `normalize_esi` round-trips any accepted string
// form into canonical lowercase colon-hex.

use std::net::Ipv4Addr;

use serde::Serialize;

use crate::error::Error;
use crate::validate;

/// A decoded Ethernet Segment Identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedEsi {
    /// ESI type octet. Types 0-5 decode into [`EsiData`]; anything else
    /// is carried as [`EsiData::Unknown`].
    #[serde(rename = "type")]
    pub esi_type: u8,
    #[serde(flatten)]
    pub data: EsiData,
}

/// Type-specific payload of an ESI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EsiData {
    /// Type 0: arbitrary 9-octet value managed by the operator.
    Arbitrary { id: String },
    /// Type 1: LACP system MAC and port key (last octet reserved).
    Lacp {
        lacp_system_mac: String,
        lacp_port_key: u16,
    },
    /// Type 2: MSTP root bridge and priority.
    RootBridge {
        root_bridge: String,
        root_priority: u16,
    },
    /// Type 3: system MAC plus a 3-octet local discriminator.
    SystemMac {
        system_mac: String,
        local_discriminator: u32,
    },
    /// Type 4: router id plus a 4-octet local discriminator.
    RouterId {
        router_id: Ipv4Addr,
        local_discriminator: u32,
    },
    /// Type 5: AS number plus a 4-octet local discriminator.
    Asn { asn: u32, local_discriminator: u32 },
    /// Types 6-255 carry no defined structure.
    Unknown {},
}

fn esi_octets(esi: &str) -> Result<[u8; 10], Error> {
    if !validate::is_esi(esi) {
        return Err(Error::request_value("esi", esi));
    }
    let stripped: String = esi.chars().filter(|c| !":._-".contains(*c)).collect();
    let mut octets = [0u8; 10];
    for (i, chunk) in stripped.as_bytes().chunks(2).enumerate() {
        let pair = std::str::from_utf8(chunk).map_err(|_| Error::request_value("esi", esi))?;
        octets[i] = u8::from_str_radix(pair, 16).map_err(|_| Error::request_value("esi", esi))?;
    }
    Ok(octets)
}

fn colon_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// Parse an ESI string into its typed component parts.
///
/// Each octet may be delimited by `:`, `.`, `_`, or `-`; the grouping of
/// separators does not affect the decode. Malformed input is a
/// [`Error::RequestValue`] naming the offending string.
pub fn parse_esi(esi: &str) -> Result<ParsedEsi, Error> {
    let octets = esi_octets(esi)?;
    let esi_type = octets[0];
    let data = match esi_type {
        0 => EsiData::Arbitrary {
            id: colon_hex(&octets[1..]),
        },
        1 => EsiData::Lacp {
            lacp_system_mac: colon_hex(&octets[1..7]),
            lacp_port_key: u16::from_be_bytes([octets[7], octets[8]]),
        },
        2 => EsiData::RootBridge {
            root_bridge: colon_hex(&octets[1..7]),
            root_priority: u16::from_be_bytes([octets[7], octets[8]]),
        },
        3 => EsiData::SystemMac {
            system_mac: colon_hex(&octets[1..7]),
            local_discriminator: u32::from_be_bytes([0, octets[7], octets[8], octets[9]]),
        },
        4 => EsiData::RouterId {
            router_id: Ipv4Addr::new(octets[1], octets[2], octets[3], octets[4]),
            local_discriminator: u32::from_be_bytes([octets[5], octets[6], octets[7], octets[8]]),
        },
        5 => EsiData::Asn {
            asn: u32::from_be_bytes([octets[1], octets[2], octets[3], octets[4]]),
            local_discriminator: u32::from_be_bytes([octets[5], octets[6], octets[7], octets[8]]),
        },
        _ => EsiData::Unknown {},
    };
    Ok(ParsedEsi { esi_type, data })
}

/// Canonicalize an accepted ESI string to lowercase colon-hex.
pub fn normalize_esi(esi: &str) -> Result<String, Error> {
    let octets = esi_octets(esi)?;
    Ok(colon_hex(&octets))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_type_0() {
        let parsed = parse_esi("00:aa:0b:21:dd:a8:fe:00:00:01").unwrap();
        assert_eq!(parsed.esi_type, 0);
        assert_eq!(
            parsed.data,
            EsiData::Arbitrary {
                id: "aa:0b:21:dd:a8:fe:00:00:01".into()
            }
        );
    }

    #[test]
    fn parse_type_1() {
        let parsed = parse_esi("01:aa:0b:21:dd:a8:fe:00:80:00").unwrap();
        assert_eq!(parsed.esi_type, 1);
        assert_eq!(
            parsed.data,
            EsiData::Lacp {
                lacp_system_mac: "aa:0b:21:dd:a8:fe".into(),
                lacp_port_key: 128
            }
        );
    }

    #[test]
    fn parse_type_2() {
        let parsed = parse_esi("02:aa:0b:21:dd:a8:fe:20:00:00").unwrap();
        assert_eq!(
            parsed.data,
            EsiData::RootBridge {
                root_bridge: "aa:0b:21:dd:a8:fe".into(),
                root_priority: 8192
            }
        );
    }

    #[test]
    fn parse_type_3() {
        let parsed = parse_esi("03:aa:0b:21:dd:a8:fe:00:00:00").unwrap();
        assert_eq!(
            parsed.data,
            EsiData::SystemMac {
                system_mac: "aa:0b:21:dd:a8:fe".into(),
                local_discriminator: 0
            }
        );
    }

    #[test]
    fn parse_type_4() {
        let parsed = parse_esi("04:c6:12:10:0a:00:00:00:ff:00").unwrap();
        assert_eq!(
            parsed.data,
            EsiData::RouterId {
                router_id: Ipv4Addr::new(198, 18, 16, 10),
                local_discriminator: 255
            }
        );
    }

    #[test]
    fn parse_type_5() {
        let parsed = parse_esi("05:00:00:ff:dc:00:00:10:00:00").unwrap();
        assert_eq!(
            parsed.data,
            EsiData::Asn {
                asn: 65500,
                local_discriminator: 4096
            }
        );
    }

    #[test]
    fn parse_unknown_type_keeps_type_only() {
        let parsed = parse_esi("09:aa:0b:21:dd:a8:fe:00:00:01").unwrap();
        assert_eq!(parsed.esi_type, 9);
        assert_eq!(parsed.data, EsiData::Unknown {});
    }

    #[test]
    fn separator_independence() {
        let colon = parse_esi("01:aa:0b:21:dd:a8:fe:00:80:00").unwrap();
        let dash = parse_esi("01-aa-0b-21-dd-a8-fe-00-80-00").unwrap();
        let dot = parse_esi("01aa.0b21.dda8.fe00.8000").unwrap();
        let under = parse_esi("01_aa_0b_21_dd_a8_fe_00_80_00").unwrap();
        assert_eq!(colon, dash);
        assert_eq!(colon, dot);
        assert_eq!(colon, under);
    }

    #[test]
    fn normalize_to_colon_hex() {
        assert_eq!(
            normalize_esi("00AA.0B21.DDA8.FE00.0001").unwrap(),
            "00:aa:0b:21:dd:a8:fe:00:00:01"
        );
    }

    #[test]
    fn malformed_esi_rejected() {
        assert!(parse_esi("not-an-esi").is_err());
        assert!(normalize_esi("00:aa").is_err());
    }
}
