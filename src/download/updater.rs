//! Periodic dataset refresh
//!
//! Every interval the remote datasets are checked and, once they are in
//! sync, the index is rebuilt from disk and published. A failed cycle keeps
//! serving the previous snapshot.

use super::Downloader;
use crate::database::IndexManager;
use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Background task refreshing the published index
pub struct Updater {
    manager: Arc<IndexManager>,
    downloader: Downloader,
    interval: Duration,
    shutdown: Arc<Notify>,
}

impl Updater {
    pub fn new(manager: Arc<IndexManager>, interval: Duration) -> Result<Self> {
        let downloader = Downloader::new(manager.config().dataset.remote.clone())?;
        Ok(Self {
            manager,
            downloader,
            interval,
            shutdown: Arc::new(Notify::new()),
        })
    }

    /// Spawn the refresh loop
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            log::info!(
                "Dataset updater started, interval {}s",
                self.interval.as_secs()
            );

            loop {
                tokio::select! {
                    _ = tokio::time::sleep(self.interval) => {
                        self.run_once().await;
                    }
                    _ = shutdown.notified() => {
                        log::info!("Dataset updater shutting down");
                        break;
                    }
                }
            }
        })
    }

    pub fn stop(&self) {
        self.shutdown.notify_one();
    }

    /// One refresh cycle; returns whether a new index was published
    pub async fn run_once(&self) -> bool {
        let config = self.manager.config();
        match self.downloader.sync_all(config, true, false).await {
            Ok(downloaded) => log::debug!("Dataset check done, {} file(s) downloaded", downloaded),
            Err(e) => {
                log::warn!("Dataset update failed, keeping current index: {}", e);
                return false;
            }
        }

        match self.manager.refresh_async().await {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Index rebuild failed, keeping current index: {}", e);
                false
            }
        }
    }
}
