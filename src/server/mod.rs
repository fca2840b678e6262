//! HTTP transport
//!
//! A single endpoint, `GET /getIpInfo?addr=<text>`, answering with the JSON
//! lookup result. Lookup failures are reported in the body, never as an
//! error status.

use crate::database::{IndexManager, LookupResult};
use crate::error::{IpCountryError, Result};
use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use std::sync::Arc;
use tower_http::cors::{AllowMethods, AllowOrigin, CorsLayer};

/// Shared state handed to request handlers
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<IndexManager>,
}

/// Build the service router
pub fn router(state: AppState, cors_allow_credentials: bool) -> Router {
    // Credentials cannot be combined with a wildcard origin, so the request
    // origin and method are reflected back instead.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_credentials(cors_allow_credentials);

    Router::new()
        .route("/getIpInfo", get(get_ip_info))
        .layer(cors)
        .with_state(state)
}

async fn get_ip_info(
    State(state): State<AppState>,
    params: std::result::Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Json<LookupResult> {
    let addr = match params {
        Ok(Query(pairs)) => first_addr(pairs),
        Err(e) => {
            log::debug!("Unusable query string: {}", e);
            String::new()
        }
    };

    let result = state.manager.resolve(&addr);
    log::debug!("Lookup {:?} -> {:?}", addr, result.country);
    Json(result)
}

/// First `addr` value of the query string, empty when there is none
fn first_addr(pairs: Vec<(String, String)>) -> String {
    pairs
        .into_iter()
        .find(|(key, _)| key == "addr")
        .map(|(_, value)| value)
        .unwrap_or_default()
}

/// Bind the configured listen address and serve until Ctrl+C
pub async fn serve(manager: Arc<IndexManager>) -> Result<()> {
    let server = &manager.config().server;
    let listener = tokio::net::TcpListener::bind(&server.listen)
        .await
        .map_err(|e| IpCountryError::config(format!("Cannot bind {}: {}", server.listen, e)))?;

    let app = router(
        AppState {
            manager: manager.clone(),
        },
        server.cors_allow_credentials,
    );

    log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use std::fs;

    async fn start_server(cors_allow_credentials: bool) -> (String, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("geo-whois-asn-country-ipv4-num.csv"),
            "134744064,134744319,US\n16777216,16777471,AU\n",
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.dataset.data_dir = dir.path().to_string_lossy().into_owned();
        let manager = Arc::new(IndexManager::new(config));
        manager.refresh();

        let app = router(AppState { manager }, cors_allow_credentials);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), dir)
    }

    async fn get_json(url: &str) -> (reqwest::StatusCode, serde_json::Value) {
        let response = reqwest::get(url).await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    #[tokio::test]
    async fn test_lookup_hit() {
        let (base, _dir) = start_server(true).await;
        let (status, body) = get_json(&format!("{}/getIpInfo?addr=8.8.8.8", base)).await;

        assert_eq!(status, reqwest::StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({ "ok": true, "country": "US", "ip_addr": "8.8.8.8", "ip_v6": false })
        );
    }

    #[tokio::test]
    async fn test_lookup_miss_and_invalid() {
        let (base, _dir) = start_server(true).await;
        let negative = serde_json::json!({ "ok": false, "country": null, "ip_addr": null, "ip_v6": false });

        for query in ["addr=1.1.1.1", "addr=not-an-ip", "addr=", "", "addr=%ZZ&x"] {
            let (status, body) = get_json(&format!("{}/getIpInfo?{}", base, query)).await;
            assert_eq!(status, reqwest::StatusCode::OK, "query {:?}", query);
            assert_eq!(body, negative, "query {:?}", query);
        }
    }

    #[tokio::test]
    async fn test_lookup_ipv6_miss_reports_false() {
        let (base, _dir) = start_server(true).await;
        let (_, body) = get_json(&format!("{}/getIpInfo?addr=2001:db8::1", base)).await;
        assert_eq!(body["ok"], false);
        assert_eq!(body["ip_v6"], false);
    }

    #[tokio::test]
    async fn test_repeated_addr_uses_first() {
        let (base, _dir) = start_server(true).await;
        let (status, body) =
            get_json(&format!("{}/getIpInfo?addr=8.8.8.8&addr=1.1.1.1", base)).await;

        assert_eq!(status, reqwest::StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["country"], "US");
        assert_eq!(body["ip_addr"], "8.8.8.8");

        let (_, body) = get_json(&format!("{}/getIpInfo?other=1&addr=1.0.0.1&addr=8.8.8.8", base)).await;
        assert_eq!(body["country"], "AU");
    }

    #[test]
    fn test_first_addr() {
        let pairs = |items: &[(&str, &str)]| {
            items
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>()
        };
        assert_eq!(first_addr(pairs(&[("addr", "a"), ("addr", "b")])), "a");
        assert_eq!(first_addr(pairs(&[("x", "1"), ("addr", "b")])), "b");
        assert_eq!(first_addr(pairs(&[("x", "1")])), "");
        assert_eq!(first_addr(Vec::new()), "");
    }

    #[tokio::test]
    async fn test_cors_reflects_origin() {
        let (base, _dir) = start_server(true).await;
        let response = reqwest::Client::new()
            .get(format!("{}/getIpInfo?addr=1.0.0.1", base))
            .header("Origin", "https://example.org")
            .send()
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(
            headers.get("access-control-allow-origin").unwrap(),
            "https://example.org"
        );
        assert_eq!(
            headers.get("access-control-allow-credentials").unwrap(),
            "true"
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["country"], "AU");
    }

    #[tokio::test]
    async fn test_cors_without_credentials() {
        let (base, _dir) = start_server(false).await;
        let response = reqwest::Client::new()
            .get(format!("{}/getIpInfo?addr=1.0.0.1", base))
            .header("Origin", "https://example.org")
            .send()
            .await
            .unwrap();

        assert!(response.headers().get("access-control-allow-credentials").is_none());
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (base, _dir) = start_server(true).await;
        let response = reqwest::get(format!("{}/other", base)).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
