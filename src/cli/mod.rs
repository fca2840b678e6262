//! CLI module for ipcountry-rs
//!
//! This module handles command line argument parsing and dispatches to the
//! service, the dataset updater or one-shot lookups.

use crate::config::AppConfig;
use crate::database::{IndexManager, LookupResult};
use crate::download::{Downloader, Updater};
use crate::error::{IpCountryError, Result};
use crate::server;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "colored-output")]
use colored::Colorize;

#[derive(Parser, Debug)]
#[command(name = "ipcountry-rs")]
#[command(version, about = "IP address to country lookup service")]
#[command(long_about = "ipcountry-rs resolves IPv4 and IPv6 addresses to country codes\n\n\
    Without addresses it serves GET /getIpInfo?addr=<ip> over HTTP.\n\n\
    Examples:\n  \
    $ ipcountry-rs\n  \
    $ ipcountry-rs --listen 127.0.0.1:9000\n  \
    $ ipcountry-rs 8.8.8.8 2001:4860:4860::8888\n  \
    $ ipcountry-rs --json 1.2.3.4\n  \
    $ ipcountry-rs --update")]
pub struct Cli {
    /// Addresses to look up (starts the HTTP service when none are given)
    #[arg(value_name = "ADDR")]
    pub addrs: Vec<String>,

    /// Print lookups as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Download or refresh the datasets and exit
    #[arg(long)]
    pub update: bool,

    /// Config file (defaults to config.yaml in the config directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the dataset files
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<String>,

    /// Address the HTTP service binds to
    #[arg(short, long, value_name = "ADDR")]
    pub listen: Option<String>,
}

impl Cli {
    /// Apply command line overrides on top of file and environment config
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.data_dir {
            config.dataset.data_dir = dir.clone();
        }
        if let Some(listen) = &self.listen {
            config.server.listen = listen.clone();
        }
        if self.verbose {
            config.global.verbose = true;
        }
    }

    pub async fn run(&self, mut config: AppConfig) -> Result<()> {
        self.apply_to(&mut config);

        if self.update {
            return self.handle_update(&config).await;
        }

        if !self.addrs.is_empty() {
            return self.handle_lookup(config).await;
        }

        self.handle_serve(config).await
    }

    /// Sync datasets against the remote repository
    async fn handle_update(&self, config: &AppConfig) -> Result<()> {
        let downloader = Downloader::new(config.dataset.remote.clone())?;

        println!("Updating datasets in {}...", config.data_dir().display());
        let downloaded = downloader.sync_all(config, true, true).await?;
        if downloaded == 0 {
            println!("All datasets are up to date");
        } else {
            println!("Updated {} dataset(s)", downloaded);
        }

        Ok(())
    }

    /// Build the index from local files and print one line per address
    async fn handle_lookup(&self, config: AppConfig) -> Result<()> {
        let manager = Arc::new(IndexManager::new(config));
        manager.refresh_async().await?;

        for addr in &self.addrs {
            let result = manager.resolve(addr);
            if self.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", format_result(addr, &result));
            }
        }

        Ok(())
    }

    /// Acquire datasets, build the index and serve HTTP
    async fn handle_serve(&self, config: AppConfig) -> Result<()> {
        let downloader = Downloader::new(config.dataset.remote.clone())?;
        let check_remote = config.dataset.auto_update;
        let interval = config.dataset.refresh_interval_secs;

        downloader
            .sync_all(&config, check_remote, false)
            .await
            .map_err(|e| IpCountryError::dataset(format!("Failed to acquire datasets: {}", e)))?;

        let manager = Arc::new(IndexManager::new(config));
        manager.refresh_async().await?;

        let updater = if interval > 0 {
            let updater = Arc::new(Updater::new(manager.clone(), Duration::from_secs(interval))?);
            Some((updater.clone(), updater.start()))
        } else {
            None
        };

        let served = server::serve(manager).await;

        if let Some((updater, handle)) = updater {
            updater.stop();
            let _ = handle.await;
        }

        served
    }
}

/// One-line text rendering of a lookup
pub fn format_result(addr: &str, result: &LookupResult) -> String {
    match result.country.as_deref() {
        Some(country) if result.ok => {
            let family = if result.ip_v6 { "IPv6" } else { "IPv4" };
            #[cfg(feature = "colored-output")]
            {
                format!("{} -> {} ({})", addr, country.green(), family)
            }
            #[cfg(not(feature = "colored-output"))]
            {
                format!("{} -> {} ({})", addr, country, family)
            }
        }
        _ => format!("{} -> [Not found]", addr),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_mode() {
        let cli = Cli::try_parse_from(["ipcountry-rs"]).unwrap();
        assert!(cli.addrs.is_empty());
        assert!(!cli.update);
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_lookup_mode() {
        let cli = Cli::try_parse_from(["ipcountry-rs", "--json", "8.8.8.8", "::1"]).unwrap();
        assert_eq!(cli.addrs, vec!["8.8.8.8", "::1"]);
        assert!(cli.json);
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = Cli::try_parse_from([
            "ipcountry-rs",
            "--data-dir",
            "/tmp/data",
            "--listen",
            "127.0.0.1:9000",
            "-v",
        ])
        .unwrap();

        let mut config = AppConfig::default();
        cli.apply_to(&mut config);
        assert_eq!(config.dataset.data_dir, "/tmp/data");
        assert_eq!(config.server.listen, "127.0.0.1:9000");
        assert!(config.global.verbose);
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let cli = Cli::try_parse_from(["ipcountry-rs", "--update"]).unwrap();
        let mut config = AppConfig::default();
        cli.apply_to(&mut config);
        assert!(cli.update);
        assert_eq!(config.server.listen, "0.0.0.0:8080");
        assert_eq!(config.dataset.data_dir, "/app/data");
    }

    #[test]
    fn test_format_result() {
        let miss = format_result("1.1.1.1", &LookupResult::not_found());
        assert_eq!(miss, "1.1.1.1 -> [Not found]");

        let hit = format_result("8.8.8.8", &LookupResult::found("US", "8.8.8.8", false));
        assert!(hit.starts_with("8.8.8.8 -> "));
        assert!(hit.contains("US"));
        assert!(hit.ends_with("(IPv4)"));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
