//! Prediction handlers

use std::time::Instant;

use axum::{extract::State, Json};
use chrono::Utc;
use floodsense_core::{FeatureVector, RiskPolicy};

use crate::extract::ValidatedJson;
use crate::models::{
    BatchPredictionRequest, BatchPredictionResponse, FloodPredictionRequest, FloodPredictionResponse,
};
use crate::{AppResult, AppState};

/// Score one validated record with the graded policy
pub async fn predict(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<FloodPredictionRequest>,
) -> AppResult<Json<FloodPredictionResponse>> {
    let vector = req.features.to_vector();
    let prediction = floodsense_core::predict(&state.store, &vector, RiskPolicy::Graded)?;

    tracing::info!(
        probability = prediction.probability,
        risk = prediction.risk.as_str(),
        "Prediction served"
    );

    Ok(Json(FloodPredictionResponse::new(prediction, req.location, Utc::now())))
}

/// Score up to 100 records; any failure fails the whole batch
pub async fn predict_batch(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<BatchPredictionRequest>,
) -> AppResult<Json<BatchPredictionResponse>> {
    let started = Instant::now();

    let vectors: Vec<FeatureVector> = req
        .predictions
        .iter()
        .map(|r| r.features.to_vector())
        .collect();
    let batch = floodsense_core::predict_batch(&state.store, &vectors, RiskPolicy::Graded)?;

    let timestamp = Utc::now();
    let results: Vec<FloodPredictionResponse> = batch
        .results
        .into_iter()
        .zip(req.predictions)
        .map(|(prediction, request)| FloodPredictionResponse::new(prediction, request.location, timestamp))
        .collect();

    let processing_time_ms = started.elapsed().as_secs_f64() * 1000.0;
    tracing::info!(
        total = results.len(),
        flood_count = batch.positive_count,
        processing_time_ms,
        "Batch prediction served"
    );

    Ok(Json(BatchPredictionResponse {
        total_processed: results.len(),
        flood_count: batch.positive_count,
        results,
        processing_time_ms,
        timestamp,
    }))
}
