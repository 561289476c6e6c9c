//! Inference Pipeline
//!
//! project → scale → predict / predict_proba → risk tier → recommendations.
//! Every step is a pure function of the record and the read-only store.

use serde::Serialize;
use thiserror::Error;

use super::store::{LoadedModel, ModelStore};
use super::threshold::{RiskPolicy, RiskTier};
use crate::constants::MAX_BATCH_SIZE;
use crate::logic::features::{project, FeatureSource};

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("Model not loaded")]
    ModelUnavailable,

    #[error("Batch of {len} samples exceeds the limit of {max}")]
    BatchTooLarge { len: usize, max: usize },

    /// Record values that cannot be scored, such as overflow during scaling
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Scoring failed: {0}")]
    Scoring(String),
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Prediction output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: u8,
    /// Positive-class probability, 0.0 - 1.0
    pub probability: f64,
    pub risk: RiskTier,
    /// Graded policy only
    pub confidence: Option<f64>,
    pub recommendations: Vec<String>,
    /// Model features the record did not carry, scored as 0.0
    pub defaulted_features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchPrediction {
    /// Same order as the input records
    pub results: Vec<Prediction>,
    pub positive_count: usize,
}

// ============================================================================
// SCORING
// ============================================================================

impl LoadedModel {
    /// Scale one projected row and score it, returning (label, probability)
    pub fn score(&self, values: &[f64]) -> Result<(u8, f64), InferenceError> {
        let expected = self.feature_names().len();
        if values.len() != expected {
            return Err(InferenceError::Scoring(format!(
                "feature length mismatch: got {}, expected {}",
                values.len(),
                expected
            )));
        }

        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(InferenceError::InvalidInput(format!(
                "feature '{}' is not finite",
                self.feature_names()[i]
            )));
        }

        let scaled = self.scaler.transform(values);
        if let Some(i) = scaled.iter().position(|v| !v.is_finite()) {
            return Err(InferenceError::InvalidInput(format!(
                "feature '{}' is not finite after scaling",
                self.feature_names()[i]
            )));
        }

        let label = self.classifier.predict(&scaled);
        let probability = self.classifier.predict_proba(&scaled);
        if !(0.0..=1.0).contains(&probability) {
            return Err(InferenceError::Scoring(format!(
                "classifier returned probability {}",
                probability
            )));
        }

        Ok((label, probability))
    }
}

// ============================================================================
// PREDICTION
// ============================================================================

/// Score one record under `policy`
pub fn predict<R>(store: &ModelStore, record: &R, policy: RiskPolicy) -> Result<Prediction, InferenceError>
where
    R: FeatureSource + ?Sized,
{
    let model = store.model().ok_or(InferenceError::ModelUnavailable)?;

    let projection = project(record, model.feature_names());
    if !projection.is_complete() {
        log::warn!(
            "Scoring with {} defaulted feature(s): {}",
            projection.defaulted.len(),
            projection.defaulted.join(", ")
        );
    }

    let (label, probability) = model.score(&projection.values)?;
    let risk = policy.classify(label, probability);

    log::debug!(
        "Scored record: label={} probability={:.4} risk={}",
        label,
        probability,
        risk.as_str()
    );

    Ok(Prediction {
        label,
        probability,
        risk,
        confidence: policy.confidence(probability),
        recommendations: risk.recommendations().iter().map(|s| s.to_string()).collect(),
        defaulted_features: projection.defaulted,
    })
}

/// Score every record independently; one failure fails the whole batch
pub fn predict_batch<R>(
    store: &ModelStore,
    records: &[R],
    policy: RiskPolicy,
) -> Result<BatchPrediction, InferenceError>
where
    R: FeatureSource,
{
    if records.len() > MAX_BATCH_SIZE {
        return Err(InferenceError::BatchTooLarge {
            len: records.len(),
            max: MAX_BATCH_SIZE,
        });
    }
    if !store.is_loaded() {
        return Err(InferenceError::ModelUnavailable);
    }

    let results = records
        .iter()
        .map(|record| predict(store, record, policy))
        .collect::<Result<Vec<_>, _>>()?;
    let positive_count = results.iter().filter(|p| p.label == 1).count();

    Ok(BatchPrediction { results, positive_count })
}
