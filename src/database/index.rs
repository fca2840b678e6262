//! Range index builder
//!
//! Collects the ranges of every source into one sequence sorted by range start.
//! The index is immutable once built; a refresh builds a new one.

use num_bigint::BigUint;

use super::record::parse_record;
use super::traits::RecordSource;
use super::types::{IpRange, RawRecord};

/// Sorted, immutable collection of ranges
#[derive(Debug, Clone, Default)]
pub struct RangeIndex {
    ranges: Vec<IpRange>,
}

/// A violation of the disjoint-ranges assumption found by [`RangeIndex::find_overlaps`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeIssue {
    /// Range at this position has `end < start`
    Inverted { index: usize },
    /// Range at `second` starts inside the range at `first`
    Overlap { first: usize, second: usize },
}

impl RangeIndex {
    /// An index with no ranges; every lookup against it misses
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sort ranges by start
    ///
    /// The sort is stable: ranges sharing a start keep the order they were given in.
    pub fn from_ranges(mut ranges: Vec<IpRange>) -> Self {
        ranges.sort_by(|a, b| a.start.cmp(&b.start));
        Self { ranges }
    }

    /// Parse raw records, dropping malformed ones, and sort the result
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let ranges = records.into_iter().filter_map(|r| parse_record(&r)).collect();
        Self::from_ranges(ranges)
    }

    /// Read and merge every source
    ///
    /// A source that fails to read contributes nothing; the failure is logged
    /// and the remaining sources still load.
    pub fn from_sources<'a, I>(sources: I) -> Self
    where
        I: IntoIterator<Item = &'a dyn RecordSource>,
    {
        let mut ranges = Vec::new();

        for source in sources {
            match source.read_records() {
                Ok(records) => {
                    let total = records.len();
                    let before = ranges.len();
                    ranges.extend(records.iter().filter_map(parse_record));
                    let parsed = ranges.len() - before;
                    log::info!(
                        "Loaded {} ranges from source {} ({} records skipped)",
                        parsed,
                        source.name(),
                        total - parsed
                    );
                }
                Err(e) => {
                    log::warn!("Skipping source {}: {}", source.name(), e);
                }
            }
        }

        Self::from_ranges(ranges)
    }

    pub fn ranges(&self) -> &[IpRange] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of ranges whose start is `<= value`
    ///
    /// Equivalently, the first position whose start is strictly greater than `value`.
    pub fn upper_bound(&self, value: &BigUint) -> usize {
        self.ranges.partition_point(|range| &range.start <= value)
    }

    /// Report inverted ranges and ranges that start inside an earlier one
    ///
    /// Lookups do not consult this; it exists to diagnose a dataset.
    pub fn find_overlaps(&self) -> Vec<RangeIssue> {
        let mut issues = Vec::new();
        // Position of the range reaching furthest so far
        let mut widest: Option<usize> = None;

        for (index, range) in self.ranges.iter().enumerate() {
            if range.end < range.start {
                issues.push(RangeIssue::Inverted { index });
            }

            if let Some(first) = widest {
                if range.start <= self.ranges[first].end {
                    issues.push(RangeIssue::Overlap {
                        first,
                        second: index,
                    });
                }
                if range.end > self.ranges[first].end {
                    widest = Some(index);
                }
            } else {
                widest = Some(index);
            }
        }

        issues
    }
}
