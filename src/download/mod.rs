//! Dataset downloader module
//!
//! Keeps the local CSV copies of the configured datasets in sync with the
//! remote GitHub repository.

pub mod github;
pub mod updater;

#[cfg(test)]
pub(crate) mod mock;

use crate::config::{AppConfig, RemoteConfig, SourceInfo};
use crate::error::{IpCountryError, Result};
use crate::utils::path;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use github::{contents_url, git_blob_sha1, ContentMeta};

pub use updater::Updater;

// Constants
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// What syncing one dataset did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Local file exists and the remote was not consulted
    Present,
    /// Local file matches the remote blob id
    UpToDate,
    /// A new copy was downloaded
    Downloaded,
}

/// Dataset downloader
///
/// Handles fetching file metadata from the GitHub contents API, comparing
/// blob ids, and downloading changed files with optional progress tracking.
pub struct Downloader {
    client: reqwest::Client,
    remote: RemoteConfig,
}

impl Downloader {
    /// Create a new downloader
    pub fn new(remote: RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("ipcountry-rs/{}", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| IpCountryError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, remote })
    }

    /// Fetch contents API metadata for a path in the remote repository
    pub async fn fetch_metadata(&self, remote_path: &str) -> Result<ContentMeta> {
        let url = contents_url(&self.remote, remote_path);
        log::debug!("Fetching metadata: {}", url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| IpCountryError::network(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            return Err(IpCountryError::download(format!(
                "Bad status from GitHub API: {} - {}",
                response.status(),
                url
            )));
        }

        response
            .json::<ContentMeta>()
            .await
            .map_err(|e| IpCountryError::download(format!("Failed to decode GitHub response: {}", e)))
    }

    /// Download a file from URL to destination path
    ///
    /// The body is streamed into `<dest>.tmp` which is renamed over `dest` once
    /// complete, so readers never observe a partial file.
    pub async fn download_file(&self, url: &str, dest: &Path, show_progress: bool) -> Result<()> {
        log::info!("Downloading from: {}", url);

        if let Some(parent) = dest.parent() {
            path::ensure_dir(parent)?;
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| IpCountryError::network(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            return Err(IpCountryError::download(format!(
                "HTTP error: {} - {}",
                response.status(),
                url
            )));
        }

        let pb = match response.content_length() {
            Some(total) if show_progress => Some(progress_bar(total, dest)),
            _ => None,
        };

        let tmp = tmp_path(dest);
        if let Err(e) = write_stream(response, &tmp, pb.as_ref()).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e);
        }
        if let Err(e) = tokio::fs::rename(&tmp, dest).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(IpCountryError::download(format!(
                "Failed to move {:?} into place: {}",
                tmp, e
            )));
        }

        if let Some(pb) = pb {
            pb.finish_with_message(format!("Downloaded {}", dest.display()));
        }

        log::info!("Saved {:?}", dest);
        Ok(())
    }

    /// Bring one dataset file up to date
    ///
    /// A missing file is always fetched. An existing file is only checked
    /// against the remote when `check_remote` is set, and only re-downloaded
    /// when its blob id differs.
    pub async fn sync_source(
        &self,
        source: &SourceInfo,
        dest: &Path,
        check_remote: bool,
        show_progress: bool,
    ) -> Result<SyncOutcome> {
        let exists = tokio::fs::try_exists(dest).await.unwrap_or(false);
        if exists && !check_remote {
            return Ok(SyncOutcome::Present);
        }

        let meta = self.fetch_metadata(&source.remote_path).await?;

        if exists {
            match tokio::fs::read(dest).await {
                Ok(data) if git_blob_sha1(&data) == meta.sha => {
                    log::debug!("{} is up to date ({})", source.name, meta.sha);
                    return Ok(SyncOutcome::UpToDate);
                }
                Ok(_) => log::info!("{} changed upstream, updating", source.name),
                Err(e) => log::warn!("Cannot read {:?}, downloading again: {}", dest, e),
            }
        }

        let url = meta.download_url.ok_or_else(|| {
            IpCountryError::download(format!("No download URL for {}", source.remote_path))
        })?;
        self.download_file(&url, dest, show_progress).await?;
        log::info!("Updated {}", source.file);

        Ok(SyncOutcome::Downloaded)
    }

    /// Sync every configured dataset, stopping at the first failure
    ///
    /// Returns the number of files downloaded.
    pub async fn sync_all(
        &self,
        config: &AppConfig,
        check_remote: bool,
        show_progress: bool,
    ) -> Result<usize> {
        path::ensure_dir(&config.data_dir())?;

        let mut downloaded = 0;
        for source in &config.dataset.sources {
            let dest = config.dataset_path(source);
            let outcome = self
                .sync_source(source, &dest, check_remote, show_progress)
                .await?;
            if outcome == SyncOutcome::Downloaded {
                downloaded += 1;
            }
        }

        Ok(downloaded)
    }
}

fn tmp_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    dest.with_file_name(name)
}

fn progress_bar(total: u64, dest: &Path) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(format!(
        "Downloading {}",
        dest.file_name().unwrap_or_default().to_string_lossy()
    ));
    pb
}

async fn write_stream(
    response: reqwest::Response,
    tmp: &Path,
    pb: Option<&ProgressBar>,
) -> Result<()> {
    let mut file = tokio::fs::File::create(tmp).await?;
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk
            .map_err(|e| IpCountryError::network(format!("Failed to read chunk: {}", e)))?;
        file.write_all(&chunk).await?;

        downloaded += chunk.len() as u64;
        if let Some(pb) = pb {
            pb.set_position(downloaded);
        }
    }

    file.flush().await?;
    Ok(())
}
