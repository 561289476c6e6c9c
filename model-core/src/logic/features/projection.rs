//! Feature projection
//!
//! Reads a record in the order the loaded model expects. Names the record
//! does not carry are scored as 0.0 and reported back so callers can surface
//! them instead of silently masking malformed input.

use serde::Serialize;

use super::vector::FeatureSource;

/// Value substituted for a feature the record does not carry
pub const MISSING_FEATURE_DEFAULT: f64 = 0.0;

/// Ordered model input plus the names that fell back to the default
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub values: Vec<f64>,
    pub defaulted: Vec<String>,
}

impl Projection {
    pub fn is_complete(&self) -> bool {
        self.defaulted.is_empty()
    }
}

/// Project `record` onto `feature_names`, preserving their order
pub fn project<R, S>(record: &R, feature_names: &[S]) -> Projection
where
    R: FeatureSource + ?Sized,
    S: AsRef<str>,
{
    let mut values = Vec::with_capacity(feature_names.len());
    let mut defaulted = Vec::new();

    for name in feature_names {
        let name = name.as_ref();
        match record.feature(name) {
            Some(value) => values.push(value),
            None => {
                values.push(MISSING_FEATURE_DEFAULT);
                defaulted.push(name.to_string());
            }
        }
    }

    Projection { values, defaulted }
}
