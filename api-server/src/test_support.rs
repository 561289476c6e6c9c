//! Router builders and a request helper for handler tests

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use floodsense_core::logic::features::{default_feature_names, FEATURE_COUNT};
use floodsense_core::logic::model::{Classifier, MockConfig, ModelInfo, StandardScaler};
use floodsense_core::{ModelSource, ModelStore};
use serde_json::Value;
use tower::ServiceExt;

use crate::config::Config;
use crate::{create_router, AppState};

/// Always returns the same probability
struct Fixed(f64);

impl Classifier for Fixed {
    fn model_type(&self) -> &'static str {
        "Fixed"
    }

    fn n_features(&self) -> usize {
        FEATURE_COUNT
    }

    fn predict_proba(&self, _x: &[f64]) -> f64 {
        self.0
    }
}

pub fn app_with(store: ModelStore) -> Router {
    create_router(AppState {
        store: Arc::new(store),
        config: Config::default(),
        started_at: Utc::now(),
    })
}

/// Default placeholder model, seed 42
pub fn mock_app() -> Router {
    app_with(ModelStore::mock(&MockConfig::default()).unwrap())
}

pub fn unloaded_app() -> Router {
    app_with(ModelStore::unloaded())
}

/// Store whose classifier returns `probability` for every record
pub fn fixed_app(probability: f64) -> Router {
    let store = ModelStore::from_parts(
        Box::new(Fixed(probability)),
        StandardScaler::identity(FEATURE_COUNT),
        default_feature_names(),
        ModelInfo::default(),
        ModelSource::Artifact,
    )
    .unwrap();
    app_with(store)
}

/// Send one request and decode the JSON response body
pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(json) => Body::from(serde_json::to_vec(&json).unwrap()),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}
