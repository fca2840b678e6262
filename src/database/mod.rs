//! Database module for ipcountry-rs
//!
//! This module turns range datasets into an index and answers lookups against it.
//!
//! # Module Organization
//!
//! - `types`: Common type definitions (IpRange, NormalizedAddress, LookupResult)
//! - `traits`: Trait definitions (RecordSource trait)
//! - `record`: Record parser for raw dataset rows
//! - `source`: CSV file and in-memory record sources
//! - `index`: Sorted range index builder
//! - `address`: IPv4/IPv6 normalization into one number space
//! - `resolver`: Binary-search lookup and snapshot publishing
//! - `manager`: Rebuilds and publishes the index from configured datasets

// Core modules
pub mod types;
pub mod traits;
pub mod manager;

// Lookup pipeline
pub mod address;
pub mod index;
pub mod record;
pub mod resolver;
pub mod source;

// Re-export core types and traits for convenience
pub use types::{AddressFamily, IpRange, LookupResult, NormalizedAddress, RawRecord};
pub use traits::RecordSource;
pub use manager::IndexManager;

pub use address::normalize;
pub use index::{RangeIndex, RangeIssue};
pub use record::parse_record;
pub use resolver::{find_range, resolve_address, SharedIndex};
pub use source::{CsvFileSource, MemorySource};
