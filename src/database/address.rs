//! Address normalizer
//!
//! Maps an IPv4 or IPv6 literal into the number space the range datasets use:
//! IPv4 as a big-endian 32-bit value, IPv6 as a big-endian 128-bit value, both
//! lifted into [`BigUint`] so a single comparison path serves both families.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use num_bigint::BigUint;

use super::types::{AddressFamily, NormalizedAddress};

/// Normalize a textual address, or `None` if it is neither IPv4 nor IPv6
///
/// An IPv4-mapped IPv6 literal (`::ffff:a.b.c.d`) counts as IPv4. Zone
/// suffixes, CIDR suffixes, surrounding whitespace and leading-zero octets are
/// rejected.
pub fn normalize(text: &str) -> Option<NormalizedAddress> {
    let addr: IpAddr = text.parse().ok()?;
    Some(normalize_ip(addr))
}

/// Normalize an already-parsed address
pub fn normalize_ip(addr: IpAddr) -> NormalizedAddress {
    match addr {
        IpAddr::V4(v4) => normalize_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => normalize_v4(v4),
            None => normalize_v6(v6),
        },
    }
}

fn normalize_v4(addr: Ipv4Addr) -> NormalizedAddress {
    NormalizedAddress {
        value: BigUint::from_bytes_be(&addr.octets()),
        family: AddressFamily::V4,
    }
}

fn normalize_v6(addr: Ipv6Addr) -> NormalizedAddress {
    NormalizedAddress {
        value: BigUint::from_bytes_be(&addr.octets()),
        family: AddressFamily::V6,
    }
}
