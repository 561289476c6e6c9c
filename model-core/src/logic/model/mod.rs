//! Model Module - Flood classifier and inference pipeline
//!
//! The store owns the fitted parts; `inference` is the only path that reads
//! them. Swapping the classifier only needs a new `Classifier` impl.

pub mod advice;
pub mod forest;
pub mod inference;
pub mod scaler;
pub mod store;
pub mod threshold;


// Re-export common types
pub use forest::{Classifier, DecisionTree, FitError, ForestParams, RandomForest};
pub use inference::{predict, predict_batch, BatchPrediction, InferenceError, Prediction};
pub use scaler::StandardScaler;
pub use store::{
    fit_mock, write_artifacts, ArtifactPaths, LoadedModel, MockConfig, MockFit, ModelInfo,
    ModelMetrics, ModelSource, ModelStore, StoreError,
};
pub use threshold::{confidence_score, CoarseRisk, RiskLevel, RiskPolicy, RiskTier};
