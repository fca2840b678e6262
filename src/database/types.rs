//! Type definitions for the database module
//!
//! This module contains the value types shared by the record parser, the index
//! builder, the address normalizer and the resolver.

use num_bigint::BigUint;
use num_traits::Zero;
use serde::Serialize;

/// One row of a range dataset before validation
///
/// Fields are kept as text exactly as they were read: range start, range end
/// (both decimal integers) and a country code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub start: String,
    pub end: String,
    pub country: String,
}

impl RawRecord {
    pub fn new(start: impl Into<String>, end: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            country: country.into(),
        }
    }
}

/// A contiguous block of the address-number space attributed to one country
///
/// Both bounds are inclusive. IPv4 ranges hold values below 2^32, IPv6
/// ranges hold full 128-bit values; both live in the same number space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpRange {
    pub start: BigUint,
    pub end: BigUint,
    pub country: String,
}

impl IpRange {
    pub fn new(start: impl Into<BigUint>, end: impl Into<BigUint>, country: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            country: country.into(),
        }
    }

    /// Whether `value` lies within `[start, end]`
    pub fn contains(&self, value: &BigUint) -> bool {
        &self.start <= value && value <= &self.end
    }
}

/// Address family a normalized value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    V4,
    V6,
}

/// An IP address lifted into the shared arbitrary-precision number space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAddress {
    pub value: BigUint,
    pub family: AddressFamily,
}

impl NormalizedAddress {
    pub fn is_ipv6(&self) -> bool {
        self.family == AddressFamily::V6
    }

    /// Zero is reserved for "not a usable address" and never matches a range
    pub fn is_sentinel(&self) -> bool {
        self.value.is_zero()
    }
}

/// Outward-facing answer of a lookup
///
/// Serializes with every key present; a miss is
/// `{"ok":false,"country":null,"ip_addr":null,"ip_v6":false}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupResult {
    pub ok: bool,
    pub country: Option<String>,
    pub ip_addr: Option<String>,
    pub ip_v6: bool,
}

impl LookupResult {
    pub fn not_found() -> Self {
        Self {
            ok: false,
            country: None,
            ip_addr: None,
            ip_v6: false,
        }
    }

    pub fn found(country: impl Into<String>, ip_addr: impl Into<String>, ip_v6: bool) -> Self {
        Self {
            ok: true,
            country: Some(country.into()),
            ip_addr: Some(ip_addr.into()),
            ip_v6,
        }
    }
}

impl Default for LookupResult {
    fn default() -> Self {
        Self::not_found()
    }
}
