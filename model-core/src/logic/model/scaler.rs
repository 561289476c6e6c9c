//! Standard scaler
//!
//! Per-feature affine transform `(x - mean) / scale` fitted on the training
//! matrix. Zero-variance columns keep a scale of 1.0.

use ndarray::{ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use super::forest::FitError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Fit column means and population standard deviations
    pub fn fit(x: ArrayView2<'_, f64>) -> Result<Self, FitError> {
        let mean = x.mean_axis(Axis(0)).ok_or(FitError::EmptyTrainingSet)?;
        if mean.is_empty() {
            return Err(FitError::EmptyTrainingSet);
        }

        let scale = x
            .std_axis(Axis(0), 0.0)
            .iter()
            .map(|&s| if s > f64::EPSILON { s } else { 1.0 })
            .collect();

        Ok(Self { mean: mean.to_vec(), scale })
    }

    /// Identity transform over `n` features
    pub fn identity(n: usize) -> Self {
        Self {
            mean: vec![0.0; n],
            scale: vec![1.0; n],
        }
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "scaler has {} means but {} scales",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if self.mean.iter().any(|m| !m.is_finite()) {
            return Err("scaler mean is not finite".to_string());
        }
        if self.scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
            return Err("scaler scale must be finite and non-zero".to_string());
        }
        Ok(())
    }

    /// Scale one sample. `x.len()` must equal `n_features()`.
    pub fn transform(&self, x: &[f64]) -> Vec<f64> {
        x.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(v, (m, s))| (v - m) / s)
            .collect()
    }
}
