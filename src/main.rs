//! Main entry point for the ipcountry-rs service and CLI

use anyhow::Context;
use clap::Parser;
use log::info;

use ipcountry_rs::cli::Cli;
use ipcountry_rs::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging, RUST_LOG takes precedence
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    info!("Starting ipcountry-rs v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load(Some(path.as_path()))
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::load(None).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {}, using defaults", e);
            AppConfig::default()
        }),
    };

    // Execute CLI logic
    cli.run(config).await?;

    Ok(())
}
