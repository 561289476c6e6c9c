//! Feature Vector - Core data structure for model input
//!
//! A dense record in built-in layout order, plus the `FeatureSource`
//! abstraction the pipeline reads named values through.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde::{Deserialize, Serialize};

use super::layout::{feature_index, FEATURE_COUNT};

// ============================================================================
// FEATURE SOURCE
// ============================================================================

/// Anything the pipeline can read named feature values from.
///
/// `None` means the record does not carry the feature at all.
pub trait FeatureSource {
    fn feature(&self, name: &str) -> Option<f64>;
}

impl<T: FeatureSource + ?Sized> FeatureSource for &T {
    fn feature(&self, name: &str) -> Option<f64> {
        (**self).feature(name)
    }
}

impl FeatureSource for BTreeMap<String, f64> {
    fn feature(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl<S: BuildHasher> FeatureSource for HashMap<String, f64, S> {
    fn feature(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Complete record in the order defined by FEATURE_LAYOUT
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create a new zeroed feature vector
    pub fn new() -> Self {
        Self { values: [0.0; FEATURE_COUNT] }
    }

    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        feature_index(name).and_then(|i| self.get(i))
    }

    /// Set feature by name, returns false for unknown names
    pub fn set_by_name(&mut self, name: &str, value: f64) -> bool {
        match feature_index(name) {
            Some(index) => {
                self.values[index] = value;
                true
            }
            None => false,
        }
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::new()
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self::from_values(values)
    }
}

impl FeatureSource for FeatureVector {
    fn feature(&self, name: &str) -> Option<f64> {
        self.get_by_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_by_name_follows_layout() {
        let mut values = [0.0; FEATURE_COUNT];
        values[3] = 166.0;
        let v = FeatureVector::from_values(values);

        assert_eq!(v.get_by_name("day_of_year"), Some(166.0));
        assert_eq!(v.get_by_name("rainfall"), None);
    }

    #[test]
    fn test_set_by_name() {
        let mut v = FeatureVector::new();
        assert!(v.set_by_name("filename_hash", 0.5));
        assert!(!v.set_by_name("water_level", 3.0));
        assert_eq!(v.values[9], 0.5);
    }

    #[test]
    fn test_map_sources() {
        let mut btree = BTreeMap::new();
        btree.insert("month".to_string(), 6.0);
        let hash: HashMap<String, f64> = btree.clone().into_iter().collect();

        assert_eq!(btree.feature("month"), Some(6.0));
        assert_eq!(hash.feature("month"), Some(6.0));
        assert_eq!(hash.feature("day"), None);
    }
}
