//! Configuration module for ipcountry-rs
//!
//! Handles loading and managing configuration from YAML files and environment variables.

use crate::error::{IpCountryError, Result};
use crate::utils::path;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub global: GlobalConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Send `Access-Control-Allow-Credentials: true`
    #[serde(default = "default_true")]
    pub cors_allow_credentials: bool,
}

/// Dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Directory holding the CSV files
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Re-check remote datasets even when local copies exist
    #[serde(default)]
    pub auto_update: bool,

    /// Seconds between background refreshes, 0 disables them
    #[serde(default)]
    pub refresh_interval_secs: u64,

    /// Remote repository the datasets are fetched from
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Dataset list
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceInfo>,
}

/// GitHub repository hosting the datasets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_owner")]
    pub owner: String,
    #[serde(default = "default_repo")]
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
}

/// Individual dataset information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub name: String,
    /// Path inside the remote repository
    pub remote_path: String,
    /// File name inside the data directory
    pub file: String,
}

/// Global configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Verbose logging
    #[serde(default)]
    pub verbose: bool,

    /// Config file this configuration was read from
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

// Default value functions
fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_data_dir() -> String {
    "/app/data".to_string()
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_owner() -> String {
    "sapics".to_string()
}

fn default_repo() -> String {
    "ip-location-db".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_true() -> bool {
    true
}

fn default_sources() -> Vec<SourceInfo> {
    vec![
        SourceInfo {
            name: "ipv4".to_string(),
            remote_path: "geo-whois-asn-country/geo-whois-asn-country-ipv4-num.csv".to_string(),
            file: "geo-whois-asn-country-ipv4-num.csv".to_string(),
        },
        SourceInfo {
            name: "ipv6".to_string(),
            remote_path: "geo-asn-country/geo-asn-country-ipv6-num.csv".to_string(),
            file: "geo-asn-country-ipv6-num.csv".to_string(),
        },
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            cors_allow_credentials: true,
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            auto_update: false,
            refresh_interval_secs: 0,
            remote: RemoteConfig::default(),
            sources: default_sources(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            owner: default_owner(),
            repo: default_repo(),
            branch: default_branch(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// An explicit `config_path` must exist. Without one, `config.yaml` in the
    /// config directory is used when present and defaults otherwise.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let (file, required) = match config_path {
            Some(p) => (p.to_path_buf(), true),
            None => (path::config_file()?, false),
        };

        let mut config = if file.exists() {
            let mut config = Self::from_file(&file)?;
            config.global.config_path = Some(file);
            config
        } else if required {
            return Err(IpCountryError::config(format!(
                "Config file not found: {:?}",
                file
            )));
        } else {
            log::debug!("No config file at {:?}, using defaults", file);
            Self::default()
        };

        // Override with environment variables
        config.apply_env(|key| env::var(key).ok());

        Ok(config)
    }

    /// Parse a YAML config file
    pub fn from_file(file: &Path) -> Result<Self> {
        let content = fs::read_to_string(file)
            .map_err(|e| IpCountryError::config(format!("Failed to read config file: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| IpCountryError::YamlError(format!("Failed to parse config file: {}", e)))
    }

    /// Apply environment variable overrides
    ///
    /// `lookup` returns the value of an environment variable, if set.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("AUTO_UPDATE") {
            self.dataset.auto_update = val.trim().eq_ignore_ascii_case("true");
        }
        if let Some(val) = lookup("IPCOUNTRY_DATA_DIR") {
            self.dataset.data_dir = val;
        }
        if let Some(val) = lookup("IPCOUNTRY_LISTEN") {
            self.server.listen = val;
        }
        if let Some(val) = lookup("IPCOUNTRY_REFRESH_INTERVAL") {
            match val.trim().parse() {
                Ok(secs) => self.dataset.refresh_interval_secs = secs,
                Err(e) => log::warn!("Ignoring IPCOUNTRY_REFRESH_INTERVAL={:?}: {}", val, e),
            }
        }
    }

    /// Directory holding the dataset files
    pub fn data_dir(&self) -> PathBuf {
        path::expand_tilde(&self.dataset.data_dir)
    }

    /// Local path of a dataset file
    pub fn dataset_path(&self, source: &SourceInfo) -> PathBuf {
        self.data_dir().join(&source.file)
    }
}
