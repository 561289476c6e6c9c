//! FloodSense Core
//!
//! Model store and inference pipeline behind the FloodSense API.
//!
//! ```text
//! record ──► project ──► scale ──► classifier ──► risk tier ──► advice
//!              ▲            ▲           ▲
//!              └────────────┴───────────┴──── ModelStore (read-only)
//! ```

pub mod constants;
pub mod logic;

pub use logic::features::{FeatureSource, FeatureVector, FEATURE_COUNT, FEATURE_LAYOUT};
pub use logic::model::{
    predict, predict_batch, ArtifactPaths, BatchPrediction, InferenceError, ModelSource,
    ModelStore, Prediction, RiskLevel, RiskPolicy, RiskTier, StoreError,
};
