// ── Domain validators ──
//
// Total predicates over the string forms that appear in requests:
// route distinguishers, route targets, ESIs, and the integer ranges
// they are built from. These never panic and never allocate beyond
// the splits they need; object constructors turn a `false` into a
// typed request error.

use std::net::Ipv4Addr;

/// True when `s` parses as an unsigned integer within `[0, 65535]`.
pub fn is_uint16(s: &str) -> bool {
    s.parse::<u64>().is_ok_and(|n| n <= u64::from(u16::MAX))
}

/// True when `s` parses as an unsigned integer within `[0, 4294967295]`.
pub fn is_uint32(s: &str) -> bool {
    s.parse::<u64>().is_ok_and(|n| n <= u64::from(u32::MAX))
}

/// Strict dotted-quad IPv4 check.
pub fn is_ipv4_address(s: &str) -> bool {
    s.parse::<Ipv4Addr>().is_ok()
}

/// Route distinguisher check per RFC 4364 text forms.
///
/// Accepts the literal `auto`, which signals the driver to derive the RD
/// using whatever method suits the platform. Otherwise the RD must be two
/// colon-separated parts: `ipv4:u16`, `u32:u16`, or `u16:u32`.
pub fn is_route_distinguisher(s: &str) -> bool {
    if s == "auto" {
        return true;
    }
    let parts: Vec<&str> = s.split(':').collect();
    let [admin, assigned] = parts.as_slice() else {
        return false;
    };
    (is_ipv4_address(admin) && is_uint16(assigned))
        || (is_uint32(admin) && is_uint16(assigned))
        || (is_uint16(admin) && is_uint32(assigned))
}

/// Route target check.
///
/// Accepts the literal `auto` only when `allow_auto` is set. Otherwise the
/// RT must be two colon-separated integers splitting as `u16:u32` or
/// `u32:u16`.
pub fn is_route_target(s: &str, allow_auto: bool) -> bool {
    if allow_auto && s == "auto" {
        return true;
    }
    let parts: Vec<&str> = s.split(':').collect();
    let [admin, assigned] = parts.as_slice() else {
        return false;
    };
    (is_uint16(admin) && is_uint32(assigned)) || (is_uint32(admin) && is_uint16(assigned))
}

/// ESI well-formedness check: ten octets of hex, with `:`, `.`, `_`, and
/// `-` accepted interchangeably as separators.
pub fn is_esi(s: &str) -> bool {
    let stripped: String = s.chars().filter(|c| !":._-".contains(*c)).collect();
    stripped.len() == 20 && stripped.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uint16_bounds() {
        assert!(is_uint16("0"));
        assert!(is_uint16("65535"));
        assert!(!is_uint16("65536"));
        assert!(!is_uint16("-1"));
        assert!(!is_uint16("twelve"));
    }

    #[test]
    fn uint32_bounds() {
        assert!(is_uint32("4294967295"));
        assert!(!is_uint32("4294967296"));
        assert!(!is_uint32(""));
    }

    #[test]
    fn ipv4_is_strict() {
        assert!(is_ipv4_address("198.18.0.1"));
        assert!(!is_ipv4_address("198.18.0.1/32"));
        assert!(!is_ipv4_address("198.18.0"));
        assert!(!is_ipv4_address("2001:db8::1"));
    }

    #[test]
    fn route_distinguisher_forms() {
        assert!(is_route_distinguisher("auto"));
        assert!(is_route_distinguisher("198.18.0.1:65"));
        assert!(is_route_distinguisher("65531:65531"));
        assert!(is_route_distinguisher("4200000000:65"));
        assert!(is_route_distinguisher("65:4200000000"));
        assert!(!is_route_distinguisher("rd:distinguisher"));
        assert!(!is_route_distinguisher("65531"));
        assert!(!is_route_distinguisher("1:2:3"));
    }

    #[test]
    fn route_target_forms() {
        assert!(is_route_target("65000:100", false));
        assert!(is_route_target("4200000000:65", false));
        assert!(!is_route_target("515555:515555", false));
        assert!(is_route_target("auto", true));
        assert!(!is_route_target("auto", false));
        assert!(!is_route_target("65000", false));
    }

    #[test]
    fn esi_separator_independence() {
        assert!(is_esi("00:aa:0b:21:dd:a8:fe:00:00:01"));
        assert!(is_esi("00-aa-0b-21-dd-a8-fe-00-00-01"));
        assert!(is_esi("00.aa.0b.21.dd.a8.fe.00.00.01"));
        assert!(is_esi("00_aa_0b_21_dd_a8_fe_00_00_01"));
        assert!(is_esi("00aa.0b21.dda8.fe00.0001"));
        assert!(!is_esi("00:aa:0b:21:dd:a8:fe:00:01"));
        assert!(!is_esi("zz:aa:0b:21:dd:a8:fe:00:00:01"));
    }
}
