//! Error handling

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use floodsense_core::InferenceError;
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Model store not populated
    ModelUnavailable,

    // Schema, bounds or batch-size violations
    ValidationError(String),

    // Resource errors
    NotFound(String),

    // Failure inside the inference pipeline
    ScoringError(String),

    // Generic errors
    InternalError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ScoringError(_) | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match self {
            AppError::ModelUnavailable => "Model not loaded".to_string(),
            AppError::ValidationError(msg) => msg,
            AppError::NotFound(msg) => msg,
            AppError::ScoringError(msg) => {
                tracing::error!("Prediction error: {}", msg);
                format!("Prediction failed: {}", msg)
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}

impl From<InferenceError> for AppError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::ModelUnavailable => AppError::ModelUnavailable,
            InferenceError::BatchTooLarge { .. } => AppError::ValidationError(err.to_string()),
            InferenceError::InvalidInput(msg) => AppError::ValidationError(msg),
            InferenceError::Scoring(msg) => AppError::ScoringError(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::ValidationError(err.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(err: PathRejection) -> Self {
        AppError::ValidationError(err.body_text())
    }
}
