//! Resolver
//!
//! Classifies a normalized address against a [`RangeIndex`] with an upper-bound
//! binary search over range starts, and publishes index snapshots for
//! concurrent readers.
//!
//! # Search
//!
//! For a query `q`, find the first range whose start is strictly greater than
//! `q`. The range just before it is the only candidate: it has the largest
//! start that is `<= q`. The query hits when `q <= candidate.end`, and falls in
//! a gap otherwise. Both bounds are inclusive.

use std::sync::Arc;

use arc_swap::ArcSwap;
use num_bigint::BigUint;
use num_traits::Zero;

use super::address::normalize;
use super::index::RangeIndex;
use super::types::{IpRange, LookupResult};

/// Find the range containing `query`
///
/// Zero is the "no usable address" sentinel and never matches, even when a
/// range starts at zero.
pub fn find_range<'a>(index: &'a RangeIndex, query: &BigUint) -> Option<&'a IpRange> {
    if query.is_zero() || index.is_empty() {
        return None;
    }

    let position = index.upper_bound(query);
    if position == 0 {
        return None;
    }

    let candidate = &index.ranges()[position - 1];
    if query <= &candidate.end {
        Some(candidate)
    } else {
        None
    }
}

/// Resolve a textual address to a lookup result
///
/// Never fails: an unparseable address and an unmapped one both produce
/// [`LookupResult::not_found`]. On a hit the raw text is echoed back together
/// with the address family.
pub fn resolve_address(index: &RangeIndex, text: &str) -> LookupResult {
    let Some(address) = normalize(text) else {
        log::debug!("Not an IP address: {:?}", text);
        return LookupResult::not_found();
    };

    match find_range(index, &address.value) {
        Some(range) => LookupResult::found(range.country.clone(), text, address.is_ipv6()),
        None => {
            log::debug!("No range contains {}", text);
            LookupResult::not_found()
        }
    }
}

/// The current index snapshot, replaceable without blocking readers
///
/// Readers take an `Arc` to whichever index is current and keep using it for
/// the whole lookup; a concurrent [`SharedIndex::publish`] only affects later
/// loads.
pub struct SharedIndex {
    current: ArcSwap<RangeIndex>,
}

impl SharedIndex {
    pub fn new(index: RangeIndex) -> Self {
        Self {
            current: ArcSwap::from_pointee(index),
        }
    }

    /// Snapshot of the current index
    pub fn load(&self) -> Arc<RangeIndex> {
        self.current.load_full()
    }

    /// Replace the current index, returning the one it replaced
    pub fn publish(&self, index: RangeIndex) -> Arc<RangeIndex> {
        self.current.swap(Arc::new(index))
    }

    /// Resolve against the snapshot current at call time
    pub fn resolve(&self, text: &str) -> LookupResult {
        let index = self.current.load();
        resolve_address(&index, text)
    }
}

impl Default for SharedIndex {
    fn default() -> Self {
        Self::new(RangeIndex::empty())
    }
}
