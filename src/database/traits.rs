//! Trait definitions for the database module
//!
//! This module defines the interface every producer of raw range records follows.

use crate::error::Result;

use super::types::RawRecord;

/// A producer of raw range records
///
/// Sources only read; validation happens in the record parser and ordering in
/// the index builder, so a source may hand records over in any order.
pub trait RecordSource {
    fn name(&self) -> &str;

    /// Read every record the source currently holds
    fn read_records(&self) -> Result<Vec<RawRecord>>;
}
