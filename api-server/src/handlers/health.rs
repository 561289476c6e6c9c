//! Health check handler

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use floodsense_core::ModelSource;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    model_loaded: bool,
    model_source: Option<ModelSource>,
    timestamp: DateTime<Utc>,
    version: &'static str,
    uptime_seconds: i64,
}

/// Always 200; `status` reports whether predictions can be served
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let now = Utc::now();
    let model_loaded = state.store.is_loaded();

    Json(HealthResponse {
        status: if model_loaded { "online" } else { "offline" },
        model_loaded,
        model_source: state.store.source(),
        timestamp: now,
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: (now - state.started_at).num_seconds().max(0),
    })
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};

    use crate::test_support::{mock_app, send, unloaded_app};

    #[tokio::test]
    async fn test_health_with_mock_model() {
        let (status, body) = send(mock_app(), Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "online");
        assert_eq!(body["model_loaded"], true);
        assert_eq!(body["model_source"], "mock");
        assert!(body["uptime_seconds"].as_i64().unwrap() >= 0);
    }

    #[tokio::test]
    async fn test_health_without_model() {
        let (status, body) = send(unloaded_app(), Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "offline");
        assert_eq!(body["model_loaded"], false);
        assert!(body["model_source"].is_null());
    }
}
