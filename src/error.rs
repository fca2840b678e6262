//! Error types for ipcountry-rs
//!
//! This module defines custom error types using thiserror for better error handling.
//! Lookup failures are never errors: a bad address or an unmapped one both end up
//! as a negative `LookupResult`. These variants cover loading, downloading and
//! serving datasets.

use thiserror::Error;

/// Main error type for ipcountry-rs
#[derive(Error, Debug)]
pub enum IpCountryError {
    /// Dataset file missing or unusable
    #[error("Dataset error: {0}")]
    DatasetError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// YAML parsing error
    #[error("YAML parse error: {0}")]
    YamlError(String),

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Download error
    #[error("Download failed: {0}")]
    DownloadError(String),

    /// CSV reader error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Other error
    #[error("Other error: {0}")]
    Other(String),
}

/// Result type alias for ipcountry-rs
pub type Result<T> = std::result::Result<T, IpCountryError>;

impl IpCountryError {
    /// Create a dataset error
    pub fn dataset<S: Into<String>>(msg: S) -> Self {
        IpCountryError::DatasetError(msg.into())
    }

    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        IpCountryError::ConfigError(msg.into())
    }

    /// Create a network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        IpCountryError::NetworkError(msg.into())
    }

    /// Create a download error
    pub fn download<S: Into<String>>(msg: S) -> Self {
        IpCountryError::DownloadError(msg.into())
    }
}

/// Convert from anyhow::Error
impl From<anyhow::Error> for IpCountryError {
    fn from(err: anyhow::Error) -> Self {
        IpCountryError::Other(err.to_string())
    }
}

/// Convert from reqwest::Error
impl From<reqwest::Error> for IpCountryError {
    fn from(err: reqwest::Error) -> Self {
        IpCountryError::NetworkError(err.to_string())
    }
}
