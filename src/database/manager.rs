//! Index manager - owns the published index and rebuilds it on refresh

use crate::config::AppConfig;
use crate::database::{
    CsvFileSource, LookupResult, RangeIndex, RecordSource, SharedIndex,
};
use crate::error::{IpCountryError, Result};
use std::sync::Arc;

/// Index manager builds the range index from the configured datasets
///
/// The manager provides the refresh trigger for the scheduling side and the
/// resolve operation for the transport side. Refreshing never mutates the
/// index in place: a new index is built from the files on disk and published
/// with one atomic swap.
///
/// # Thread Safety
///
/// IndexManager is thread-safe and can be shared across threads using Arc.
/// Lookups never block on a refresh.
pub struct IndexManager {
    config: AppConfig,
    index: SharedIndex,
}

impl IndexManager {
    /// Create a manager with an empty index
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            index: SharedIndex::default(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// One CSV source per configured dataset
    pub fn sources(&self) -> Vec<CsvFileSource> {
        self.config
            .dataset
            .sources
            .iter()
            .map(|info| CsvFileSource::new(info.name.clone(), self.config.dataset_path(info)))
            .collect()
    }

    /// Build a fresh index from the dataset files without publishing it
    pub fn build_index(&self) -> RangeIndex {
        let sources = self.sources();
        let index = RangeIndex::from_sources(sources.iter().map(|s| s as &dyn RecordSource));

        let issues = index.find_overlaps();
        if !issues.is_empty() {
            log::warn!(
                "Dataset contains {} overlapping or inverted ranges; lookups inside them are ambiguous",
                issues.len()
            );
            for issue in issues.iter().take(10) {
                log::debug!("Range issue: {:?}", issue);
            }
        }

        index
    }

    /// Rebuild the index from the dataset files and publish it
    ///
    /// Returns the number of ranges in the new index.
    pub fn refresh(&self) -> usize {
        let index = self.build_index();
        let count = index.len();

        if count == 0 {
            log::warn!("No ranges loaded; every lookup will miss");
        }

        self.index.publish(index);
        log::info!("Published range index with {} ranges", count);
        count
    }

    /// Run [`IndexManager::refresh`] on the blocking thread pool
    pub async fn refresh_async(self: &Arc<Self>) -> Result<usize> {
        let manager = Arc::clone(self);
        tokio::task::spawn_blocking(move || manager.refresh())
            .await
            .map_err(|e| IpCountryError::Other(format!("Index refresh task failed: {}", e)))
    }

    /// Resolve a textual address against the current index
    pub fn resolve(&self, addr: &str) -> LookupResult {
        self.index.resolve(addr)
    }

    /// Snapshot of the current index
    pub fn snapshot(&self) -> Arc<RangeIndex> {
        self.index.load()
    }

    /// Number of ranges in the current index
    pub fn range_count(&self) -> usize {
        self.index.load().len()
    }
}
