//! GitHub contents API helpers
//!
//! The contents API reports a file's git blob id as `sha`, so a local copy is
//! current when hashing it the way git does yields the same id.

use crate::config::RemoteConfig;
use serde::Deserialize;
use sha1::{Digest, Sha1};

/// Metadata returned by `GET /repos/{owner}/{repo}/contents/{path}`
#[derive(Debug, Clone, Deserialize)]
pub struct ContentMeta {
    pub sha: String,
    /// Absent for directories and submodules
    pub download_url: Option<String>,
}

/// Contents API URL of a file on the configured branch
pub fn contents_url(remote: &RemoteConfig, path: &str) -> String {
    format!(
        "{}/repos/{}/{}/contents/{}?ref={}",
        remote.api_base.trim_end_matches('/'),
        remote.owner,
        remote.repo,
        path.trim_start_matches('/'),
        remote.branch
    )
}

/// Git blob id of `data`: hex SHA-1 of `"blob {len}\0"` followed by the bytes
pub fn git_blob_sha1(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(format!("blob {}\0", data.len()).as_bytes());
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
