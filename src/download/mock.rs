//! In-process stand-in for the GitHub contents API used by tests

use super::github::git_blob_sha1;
use crate::config::RemoteConfig;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

pub struct MockGithub {
    pub base: String,
    pub metadata_requests: Arc<AtomicUsize>,
    pub downloads: Arc<AtomicUsize>,
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

#[derive(Clone)]
struct MockState {
    base: String,
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    metadata_requests: Arc<AtomicUsize>,
    downloads: Arc<AtomicUsize>,
}

impl MockGithub {
    pub async fn start(files: Vec<(&str, Vec<u8>)>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let files: HashMap<String, Vec<u8>> = files
            .into_iter()
            .map(|(path, data)| (path.to_string(), data))
            .collect();
        let state = MockState {
            base: base.clone(),
            files: Arc::new(RwLock::new(files)),
            metadata_requests: Arc::new(AtomicUsize::new(0)),
            downloads: Arc::new(AtomicUsize::new(0)),
        };

        let app = Router::new()
            .route("/repos/{owner}/{repo}/contents/{*path}", get(contents))
            .route("/raw/{*path}", get(raw))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base,
            metadata_requests: state.metadata_requests,
            downloads: state.downloads,
            files: state.files,
        }
    }

    pub fn remote(&self) -> RemoteConfig {
        RemoteConfig {
            api_base: self.base.clone(),
            ..RemoteConfig::default()
        }
    }

    /// Replace the content served for `path`
    pub fn publish(&self, path: &str, data: &[u8]) {
        self.files
            .write()
            .unwrap()
            .insert(path.to_string(), data.to_vec());
    }

    pub fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

async fn contents(
    State(state): State<MockState>,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
) -> Response {
    state.metadata_requests.fetch_add(1, Ordering::SeqCst);
    let files = state.files.read().unwrap();
    match files.get(&path) {
        Some(data) => Json(serde_json::json!({
            "name": path.rsplit('/').next().unwrap_or_default(),
            "path": path,
            "sha": git_blob_sha1(data),
            "size": data.len(),
            "download_url": format!("{}/raw/{}", state.base, path),
        }))
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "message": "Not Found" })),
        )
            .into_response(),
    }
}

async fn raw(State(state): State<MockState>, Path(path): Path<String>) -> Response {
    let data = state.files.read().unwrap().get(&path).cloned();
    match data {
        Some(data) => {
            state.downloads.fetch_add(1, Ordering::SeqCst);
            data.into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
