//! Central Configuration Constants
//!
//! Single source of truth for artifact names and pipeline limits.

/// Default directory holding model artifacts, relative to the working directory
pub const DEFAULT_MODEL_DIR: &str = "models";

/// Serialized random forest
pub const MODEL_FILE: &str = "flood_prediction_model.json";

/// Serialized standard scaler
pub const SCALER_FILE: &str = "feature_scaler.json";

/// Ordered feature-name list
pub const FEATURE_NAMES_FILE: &str = "feature_names.json";

/// Optional training metadata
pub const MODEL_INFO_FILE: &str = "model_info.json";

/// Largest batch accepted by the pipeline
pub const MAX_BATCH_SIZE: usize = 100;

/// Placeholder model served when no artifact exists
pub const MOCK_SAMPLES: usize = 100;
pub const MOCK_ESTIMATORS: usize = 10;
pub const MOCK_SEED: u64 = 42;

/// Model version reported when the artifact does not carry one
pub const MODEL_VERSION: &str = env!("CARGO_PKG_VERSION");
