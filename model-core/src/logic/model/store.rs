//! Model Store
//!
//! Holds the classifier, the scaler and the feature order the classifier was
//! fitted on. Built exactly once before the server accepts requests and never
//! mutated afterwards, so it can be shared behind an `Arc` without locking.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::forest::{Classifier, FitError, ForestParams, RandomForest};
use super::scaler::StandardScaler;
use crate::constants::{
    FEATURE_NAMES_FILE, MOCK_ESTIMATORS, MOCK_SAMPLES, MOCK_SEED, MODEL_FILE, MODEL_INFO_FILE,
    MODEL_VERSION, SCALER_FILE,
};
use crate::logic::features::layout::{hash_layout, layout_hash, matches_layout};
use crate::logic::features::{default_feature_names, FEATURE_COUNT, FEATURE_VERSION};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Failed to fit model: {0}")]
    Fit(#[from] FitError),
}

// ============================================================================
// METADATA
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSource {
    /// Deserialized from artifacts on disk
    Artifact,
    /// Placeholder fitted on random data, outputs are meaningless
    Mock,
}

impl ModelSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelSource::Artifact => "artifact",
            ModelSource::Mock => "mock",
        }
    }
}

/// Training-set metrics recorded next to an artifact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

impl ModelMetrics {
    pub fn from_predictions(predicted: &[u8], actual: &[u8]) -> Self {
        let (mut tp, mut fp, mut tn, mut fn_) = (0usize, 0usize, 0usize, 0usize);
        for (&p, &a) in predicted.iter().zip(actual) {
            match (p, a) {
                (1, 1) => tp += 1,
                (1, _) => fp += 1,
                (_, 1) => fn_ += 1,
                _ => tn += 1,
            }
        }

        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            accuracy: ratio(tp + tn, tp + tn + fp + fn_),
            precision,
            recall,
            f1_score,
        }
    }
}

/// Optional artifact metadata (`model_info.json`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_type: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub training_date: Option<String>,
    #[serde(default)]
    pub feature_count: usize,
    #[serde(default)]
    pub layout_hash: Option<u32>,
    #[serde(default)]
    pub metrics: Option<ModelMetrics>,
}

// ============================================================================
// ARTIFACT LOCATIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub feature_names: PathBuf,
    pub info: PathBuf,
}

impl ArtifactPaths {
    /// Standard file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(MODEL_FILE),
            scaler: dir.join(SCALER_FILE),
            feature_names: dir.join(FEATURE_NAMES_FILE),
            info: dir.join(MODEL_INFO_FILE),
        }
    }

    pub fn model_exists(&self) -> bool {
        self.model.exists()
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => StoreError::NotFound(path.to_path_buf()),
        _ => StoreError::Io { path: path.to_path_buf(), source },
    })?;

    serde_json::from_str(&text).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<(), StoreError> {
    let encoded = if pretty {
        serde_json::to_vec_pretty(value)
    } else {
        serde_json::to_vec(value)
    }
    .map_err(|source| StoreError::Encode { path: path.to_path_buf(), source })?;

    fs::write(path, encoded).map_err(|source| StoreError::Io { path: path.to_path_buf(), source })
}

/// Write the artifact set consumed by [`ModelStore::load`]
pub fn write_artifacts(
    paths: &ArtifactPaths,
    forest: &RandomForest,
    scaler: &StandardScaler,
    feature_names: &[String],
    info: &ModelInfo,
) -> Result<(), StoreError> {
    for path in [&paths.model, &paths.scaler, &paths.feature_names, &paths.info] {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    write_json(&paths.model, forest, false)?;
    write_json(&paths.scaler, scaler, true)?;
    write_json(&paths.feature_names, &feature_names, true)?;
    write_json(&paths.info, info, true)?;
    Ok(())
}

// ============================================================================
// MOCK MODEL
// ============================================================================

/// Parameters of the placeholder model
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub samples: usize,
    pub forest: ForestParams,
    pub seed: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            samples: MOCK_SAMPLES,
            forest: ForestParams {
                n_estimators: MOCK_ESTIMATORS,
                ..Default::default()
            },
            seed: MOCK_SEED,
        }
    }
}

/// Output of [`fit_mock`]
pub struct MockFit {
    pub forest: RandomForest,
    pub scaler: StandardScaler,
    pub metrics: ModelMetrics,
}

/// Fit a scaler and forest on uniform noise with random 0/1 labels.
///
/// The forest is fitted on scaled rows so it sees the same inputs the
/// pipeline feeds it. Its predictions carry no information.
pub fn fit_mock(config: &MockConfig) -> Result<MockFit, FitError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let x = Array2::from_shape_fn((config.samples, FEATURE_COUNT), |_| rng.gen::<f64>());
    let y: Vec<u8> = (0..config.samples).map(|_| rng.gen_range(0..=1u8)).collect();

    let scaler = StandardScaler::fit(x.view())?;
    let scaled = Array2::from_shape_fn(x.dim(), |(i, j)| (x[[i, j]] - scaler.mean[j]) / scaler.scale[j]);

    let forest = RandomForest::fit(scaled.view(), &y, &config.forest, config.seed)?;
    let predicted: Vec<u8> = scaled
        .axis_iter(Axis(0))
        .map(|row| forest.predict(&row.to_vec()))
        .collect();

    Ok(MockFit {
        metrics: ModelMetrics::from_predictions(&predicted, &y),
        forest,
        scaler,
    })
}

// ============================================================================
// LOADED MODEL
// ============================================================================

pub struct LoadedModel {
    pub(crate) classifier: Box<dyn Classifier>,
    pub(crate) scaler: StandardScaler,
    feature_names: Vec<String>,
    info: ModelInfo,
    source: ModelSource,
    loaded_at: DateTime<Utc>,
}

impl LoadedModel {
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    pub fn source(&self) -> ModelSource {
        self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn model_type(&self) -> &'static str {
        self.classifier.model_type()
    }

    pub fn n_estimators(&self) -> Option<usize> {
        self.classifier.n_estimators()
    }

    /// Hash of this model's feature order
    pub fn layout_hash(&self) -> u32 {
        hash_layout(FEATURE_VERSION, &self.feature_names)
    }

    pub fn uses_default_layout(&self) -> bool {
        matches_layout(&self.feature_names)
    }
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("model_type", &self.classifier.model_type())
            .field("feature_names", &self.feature_names)
            .field("source", &self.source)
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

// ============================================================================
// STORE
// ============================================================================

#[derive(Debug, Default)]
pub struct ModelStore {
    model: Option<LoadedModel>,
}

impl ModelStore {
    /// Store that rejects every prediction
    pub fn unloaded() -> Self {
        Self { model: None }
    }

    /// Assemble a store, checking that all parts agree on the input dimension
    pub fn from_parts(
        classifier: Box<dyn Classifier>,
        scaler: StandardScaler,
        feature_names: Vec<String>,
        info: ModelInfo,
        source: ModelSource,
    ) -> Result<Self, StoreError> {
        if feature_names.is_empty() {
            return Err(StoreError::ShapeMismatch("feature-name list is empty".to_string()));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = feature_names.iter().find(|n| !seen.insert(n.as_str())) {
            return Err(StoreError::ShapeMismatch(format!("duplicate feature name '{}'", dup)));
        }

        scaler.validate().map_err(StoreError::InvalidModel)?;

        let n = feature_names.len();
        if scaler.n_features() != n {
            return Err(StoreError::ShapeMismatch(format!(
                "scaler expects {} features, feature list has {}",
                scaler.n_features(),
                n
            )));
        }
        if classifier.n_features() != n {
            return Err(StoreError::ShapeMismatch(format!(
                "classifier expects {} features, feature list has {}",
                classifier.n_features(),
                n
            )));
        }

        if !matches_layout(&feature_names) {
            log::warn!(
                "Artifact feature order differs from built-in layout (artifact {:08x}, built-in {:08x}); projecting by name",
                hash_layout(FEATURE_VERSION, &feature_names),
                layout_hash()
            );
        }

        Ok(Self {
            model: Some(LoadedModel {
                classifier,
                scaler,
                feature_names,
                info,
                source,
                loaded_at: Utc::now(),
            }),
        })
    }

    /// Deserialize classifier, scaler and feature names from disk
    pub fn load(paths: &ArtifactPaths) -> Result<Self, StoreError> {
        log::info!("Loading model artifacts from: {}", paths.model.display());

        let forest: RandomForest = read_json(&paths.model)?;
        forest.validate().map_err(StoreError::InvalidModel)?;

        let scaler: StandardScaler = read_json(&paths.scaler)?;
        let feature_names: Vec<String> = read_json(&paths.feature_names)?;

        let info = if paths.info.exists() {
            read_json(&paths.info)?
        } else {
            ModelInfo {
                model_type: forest.model_type().to_string(),
                feature_count: feature_names.len(),
                ..Default::default()
            }
        };

        Self::from_parts(Box::new(forest), scaler, feature_names, info, ModelSource::Artifact)
    }

    /// Placeholder store fitted on random data
    pub fn mock(config: &MockConfig) -> Result<Self, StoreError> {
        let fit = fit_mock(config)?;
        let info = ModelInfo {
            model_type: fit.forest.model_type().to_string(),
            version: Some(MODEL_VERSION.to_string()),
            training_date: None,
            feature_count: FEATURE_COUNT,
            layout_hash: Some(layout_hash()),
            metrics: Some(fit.metrics),
        };

        Self::from_parts(
            Box::new(fit.forest),
            fit.scaler,
            default_feature_names(),
            info,
            ModelSource::Mock,
        )
    }

    /// Startup policy: artifact if present, mock if allowed, unloaded otherwise.
    ///
    /// Never fails; a broken artifact leaves the store unloaded so the server
    /// can still answer health checks.
    pub fn initialize(paths: &ArtifactPaths, allow_mock: bool) -> Self {
        if paths.model_exists() {
            return match Self::load(paths) {
                Ok(store) => {
                    log::info!("Model artifacts loaded ({} features)", store.feature_count());
                    store
                }
                Err(e) => {
                    log::error!("Failed to load model artifacts: {}", e);
                    Self::unloaded()
                }
            };
        }

        if !allow_mock {
            log::error!(
                "No model artifact at {} and mock model disabled; predictions unavailable",
                paths.model.display()
            );
            return Self::unloaded();
        }

        log::warn!(
            "No model artifact at {}; serving placeholder mock model",
            paths.model.display()
        );
        match Self::mock(&MockConfig::default()) {
            Ok(store) => store,
            Err(e) => {
                log::error!("Failed to build mock model: {}", e);
                Self::unloaded()
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Option<&LoadedModel> {
        self.model.as_ref()
    }

    pub fn source(&self) -> Option<ModelSource> {
        self.model.as_ref().map(|m| m.source)
    }

    pub fn feature_count(&self) -> usize {
        self.model.as_ref().map_or(0, |m| m.feature_names.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_mock() -> MockConfig {
        MockConfig {
            samples: 40,
            forest: ForestParams {
                n_estimators: 3,
                ..Default::default()
            },
            seed: 9,
        }
    }

    #[test]
    fn test_unloaded() {
        let store = ModelStore::unloaded();
        assert!(!store.is_loaded());
        assert!(store.model().is_none());
        assert_eq!(store.feature_count(), 0);
    }

    #[test]
    fn test_mock_store() {
        let store = ModelStore::mock(&small_mock()).unwrap();
        let model = store.model().unwrap();

        assert_eq!(store.source(), Some(ModelSource::Mock));
        assert_eq!(model.feature_names().len(), FEATURE_COUNT);
        assert_eq!(model.n_estimators(), Some(3));
        assert!(model.uses_default_layout());
        assert_eq!(model.layout_hash(), layout_hash());

        let metrics = model.info().metrics.unwrap();
        assert!((0.0..=1.0).contains(&metrics.accuracy));
    }

    #[test]
    fn test_metrics_from_predictions() {
        let m = ModelMetrics::from_predictions(&[1, 1, 0, 0], &[1, 0, 0, 1]);
        assert_eq!(m.accuracy, 0.5);
        assert_eq!(m.precision, 0.5);
        assert_eq!(m.recall, 0.5);
        assert_eq!(m.f1_score, 0.5);

        let none = ModelMetrics::from_predictions(&[0, 0], &[0, 0]);
        assert_eq!(none.accuracy, 1.0);
        assert_eq!(none.f1_score, 0.0);
    }

    #[test]
    fn test_from_parts_rejects_dimension_mismatch() {
        let fit = fit_mock(&small_mock()).unwrap();
        let result = ModelStore::from_parts(
            Box::new(fit.forest),
            StandardScaler::identity(3),
            default_feature_names(),
            ModelInfo::default(),
            ModelSource::Artifact,
        );
        assert!(matches!(result, Err(StoreError::ShapeMismatch(_))));
    }

    #[test]
    fn test_from_parts_rejects_duplicate_names() {
        let fit = fit_mock(&small_mock()).unwrap();
        let mut names = default_feature_names();
        names[1] = names[0].clone();
        let result = ModelStore::from_parts(
            Box::new(fit.forest),
            fit.scaler,
            names,
            ModelInfo::default(),
            ModelSource::Artifact,
        );
        assert!(matches!(result, Err(StoreError::ShapeMismatch(_))));
    }

    #[test]
    fn test_artifact_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        let fit = fit_mock(&small_mock()).unwrap();
        let info = ModelInfo {
            model_type: "RandomForest".to_string(),
            training_date: Some("2024-12-01".to_string()),
            feature_count: FEATURE_COUNT,
            metrics: Some(fit.metrics),
            ..Default::default()
        };

        write_artifacts(&paths, &fit.forest, &fit.scaler, &default_feature_names(), &info).unwrap();
        assert!(paths.model_exists());

        let store = ModelStore::load(&paths).unwrap();
        let model = store.model().unwrap();
        assert_eq!(model.source(), ModelSource::Artifact);
        assert_eq!(model.info(), &info);
        assert_eq!(model.scaler, fit.scaler);
    }

    #[test]
    fn test_load_without_info_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        let fit = fit_mock(&small_mock()).unwrap();
        write_artifacts(&paths, &fit.forest, &fit.scaler, &default_feature_names(), &ModelInfo::default())
            .unwrap();
        fs::remove_file(&paths.info).unwrap();

        let store = ModelStore::load(&paths).unwrap();
        let info = store.model().unwrap().info();
        assert_eq!(info.model_type, "RandomForest");
        assert_eq!(info.feature_count, FEATURE_COUNT);
    }

    #[test]
    fn test_load_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let result = ModelStore::load(&ArtifactPaths::in_dir(dir.path()));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_load_corrupt_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        fs::write(&paths.model, b"not json").unwrap();

        assert!(matches!(ModelStore::load(&paths), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn test_initialize_policies() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());

        assert!(!ModelStore::initialize(&paths, false).is_loaded());
        assert_eq!(ModelStore::initialize(&paths, true).source(), Some(ModelSource::Mock));

        // Present but broken: unloaded, no mock substitution
        fs::write(&paths.model, b"{}").unwrap();
        assert!(!ModelStore::initialize(&paths, true).is_loaded());
    }
}
