//! ipcountry-rs: IP address to country lookup service
//!
//! Builds a sorted range index from numeric IPv4/IPv6 range datasets and
//! answers lookups against it, either over HTTP or from the command line.

pub mod cli;
pub mod config;
pub mod database;
pub mod download;
pub mod error;
pub mod server;
pub mod utils;

// Re-export common types
pub use error::{IpCountryError, Result};

pub use database::{
    IndexManager, IpRange, LookupResult, NormalizedAddress, RangeIndex, SharedIndex,
    normalize, resolve_address,
};
