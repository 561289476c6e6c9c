//! Monitored location handlers

use std::collections::BTreeMap;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use chrono::Utc;
use floodsense_core::RiskPolicy;

use crate::models::{round4, LocationPredictionResponse, MonitoredLocation, LOCATIONS};
use crate::{AppError, AppResult, AppState};

pub async fn list() -> Json<&'static [MonitoredLocation]> {
    Json(&LOCATIONS)
}

/// Score a free-form `{name: value}` record for one location.
///
/// Uses the coarse policy. Names the model does not know are ignored and
/// missing ones are reported in `defaulted_features`.
pub async fn predict(
    State(state): State<AppState>,
    path: Result<Path<u32>, PathRejection>,
    body: Result<Json<BTreeMap<String, f64>>, JsonRejection>,
) -> AppResult<Json<LocationPredictionResponse>> {
    let Path(id) = path?;
    let location = MonitoredLocation::find(id)
        .ok_or_else(|| AppError::NotFound(format!("Location {} not found", id)))?;
    let Json(record) = body?;

    let prediction = floodsense_core::predict(&state.store, &record, RiskPolicy::Coarse)?;

    tracing::info!(
        location = location.name,
        probability = prediction.probability,
        risk = prediction.risk.as_str(),
        "Location prediction served"
    );

    Ok(Json(LocationPredictionResponse {
        location_id: location.id,
        location_name: location.name,
        prediction: prediction.label,
        probability: round4(prediction.probability),
        risk_level: prediction.risk,
        defaulted_features: prediction.defaulted_features,
        timestamp: Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::test_support::{fixed_app, mock_app, send, unloaded_app};

    #[tokio::test]
    async fn test_list_locations() {
        let (status, body) = send(mock_app(), Method::GET, "/locations", None).await;

        assert_eq!(status, StatusCode::OK);
        let locations = body.as_array().unwrap();
        assert_eq!(locations.len(), 6);
        assert_eq!(locations[0]["name"], "Bor");
        assert_eq!(locations[0]["state"], "Jonglei");
        assert_eq!(locations[5]["name"], "Juba");
    }

    #[tokio::test]
    async fn test_location_predict_reports_defaults() {
        let record = json!({ "month": 6.0, "day": 15.0, "rainfall_mm": 40.0 });
        let (status, body) = send(mock_app(), Method::POST, "/locations/1/predict", Some(record)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["location_id"], 1);
        assert_eq!(body["location_name"], "Bor");
        assert!(["low", "medium", "high"].contains(&body["risk_level"].as_str().unwrap()));

        let defaulted: Vec<&str> = body["defaulted_features"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(defaulted.len(), 9);
        assert!(!defaulted.contains(&"month"));
        assert!(!defaulted.contains(&"rainfall_mm"));
    }

    #[tokio::test]
    async fn test_location_predict_coarse_tiers() {
        let (_, high) = send(fixed_app(0.75), Method::POST, "/locations/2/predict", Some(json!({}))).await;
        assert_eq!(high["risk_level"], "high");
        assert_eq!(high["prediction"], 1);

        let (_, medium) = send(fixed_app(0.6), Method::POST, "/locations/2/predict", Some(json!({}))).await;
        assert_eq!(medium["risk_level"], "medium");

        let (_, low) = send(fixed_app(0.3), Method::POST, "/locations/2/predict", Some(json!({}))).await;
        assert_eq!(low["risk_level"], "low");
        assert_eq!(low["prediction"], 0);
    }

    #[tokio::test]
    async fn test_probability_rounded() {
        let (_, body) = send(fixed_app(0.123_456), Method::POST, "/locations/3/predict", Some(json!({}))).await;

        assert_eq!(body["probability"].as_f64().unwrap(), 0.1235);
    }

    #[tokio::test]
    async fn test_unknown_location_is_404() {
        let (status, body) = send(mock_app(), Method::POST, "/locations/99/predict", Some(json!({}))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
    }

    #[tokio::test]
    async fn test_non_numeric_value_is_422() {
        let (status, _) = send(mock_app(), Method::POST, "/locations/1/predict", Some(json!({ "month": "june" }))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_overflowing_value_is_422() {
        let (status, body) = send(mock_app(), Method::POST, "/locations/1/predict", Some(json!({ "month": 1e308 }))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], 422);
    }

    #[tokio::test]
    async fn test_location_predict_unloaded_is_503() {
        let (status, _) = send(unloaded_app(), Method::POST, "/locations/1/predict", Some(json!({}))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
