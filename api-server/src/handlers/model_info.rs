//! Model metadata handler

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use floodsense_core::constants::MODEL_VERSION;
use floodsense_core::logic::model::ModelMetrics;
use floodsense_core::ModelSource;
use serde::Serialize;

use crate::{AppError, AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    model_type: String,
    source: ModelSource,
    version: String,
    feature_count: usize,
    feature_names: Vec<String>,
    /// CRC32 of the model's feature order, hex
    layout_hash: String,
    n_estimators: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    training_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<ModelMetrics>,
    loaded_at: DateTime<Utc>,
    model_loaded: bool,
}

pub async fn get(State(state): State<AppState>) -> AppResult<Json<ModelInfoResponse>> {
    let model = state.store.model().ok_or(AppError::ModelUnavailable)?;
    let info = model.info();

    let model_type = if info.model_type.is_empty() {
        model.model_type().to_string()
    } else {
        info.model_type.clone()
    };

    Ok(Json(ModelInfoResponse {
        model_type,
        source: model.source(),
        version: info.version.clone().unwrap_or_else(|| MODEL_VERSION.to_string()),
        feature_count: model.feature_names().len(),
        feature_names: model.feature_names().to_vec(),
        layout_hash: format!("{:08x}", model.layout_hash()),
        n_estimators: model.n_estimators(),
        training_date: info.training_date.clone(),
        metrics: info.metrics,
        loaded_at: model.loaded_at(),
        model_loaded: true,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use floodsense_core::logic::features::layout_hash;

    use crate::test_support::{fixed_app, mock_app, send, unloaded_app};

    #[tokio::test]
    async fn test_model_info_for_mock() {
        let (status, body) = send(mock_app(), Method::GET, "/model-info", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "mock");
        assert_eq!(body["model_type"], "RandomForest");
        assert_eq!(body["feature_count"], 11);
        assert_eq!(body["feature_names"][0], "month");
        assert_eq!(body["n_estimators"], 10);
        assert_eq!(body["layout_hash"], format!("{:08x}", layout_hash()));
        assert_eq!(body["model_loaded"], true);
        assert!(body.get("training_date").is_none());
        let accuracy = body["metrics"]["accuracy"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&accuracy));
        assert!(body["loaded_at"].is_string());
    }

    #[tokio::test]
    async fn test_model_info_falls_back_to_classifier_type() {
        let (status, body) = send(fixed_app(0.5), Method::GET, "/api/v1/model-info", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model_type"], "Fixed");
        assert!(body["n_estimators"].is_null());
    }

    #[tokio::test]
    async fn test_model_info_unloaded_is_503() {
        let (status, _) = send(unloaded_app(), Method::GET, "/model-info", None).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
