//! Risk thresholds
//!
//! Maps a positive-class probability onto a risk tier. Two taxonomies are
//! served: the 5-level graded scale used by the prediction endpoints and the
//! 3-level coarse scale used by per-location scoring. `RiskPolicy` picks one.

use serde::{Deserialize, Serialize};

use super::advice;

/// Inclusive lower bounds of the graded levels, highest first
pub const GRADED_THRESHOLDS: [(f64, RiskLevel); 4] = [
    (0.8, RiskLevel::Extreme),
    (0.6, RiskLevel::Danger),
    (0.4, RiskLevel::Alert),
    (0.2, RiskLevel::Caution),
];

/// Positive predictions above this probability are coarse "high"
pub const COARSE_HIGH_PROBABILITY: f64 = 0.7;

/// Confidence clamp bounds
pub const CONFIDENCE_FLOOR: f64 = 0.7;
pub const CONFIDENCE_CEILING: f64 = 0.99;

// ============================================================================
// GRADED (5-level)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Caution,
    Alert,
    Danger,
    Extreme,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::Safe,
        RiskLevel::Caution,
        RiskLevel::Alert,
        RiskLevel::Danger,
        RiskLevel::Extreme,
    ];

    pub fn from_probability(probability: f64) -> Self {
        GRADED_THRESHOLDS
            .iter()
            .find(|(bound, _)| probability >= *bound)
            .map(|(_, level)| *level)
            .unwrap_or(RiskLevel::Safe)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Caution => "caution",
            RiskLevel::Alert => "alert",
            RiskLevel::Danger => "danger",
            RiskLevel::Extreme => "extreme",
        }
    }

    pub fn recommendations(&self) -> &'static [&'static str] {
        advice::recommendations(*self)
    }
}

// ============================================================================
// COARSE (3-level)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoarseRisk {
    Low,
    Medium,
    High,
}

impl CoarseRisk {
    pub fn from_prediction(label: u8, probability: f64) -> Self {
        match label {
            1 if probability > COARSE_HIGH_PROBABILITY => CoarseRisk::High,
            1 => CoarseRisk::Medium,
            _ => CoarseRisk::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CoarseRisk::Low => "low",
            CoarseRisk::Medium => "medium",
            CoarseRisk::High => "high",
        }
    }
}

// ============================================================================
// POLICY
// ============================================================================

/// Which taxonomy a caller wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskPolicy {
    Coarse,
    #[default]
    Graded,
}

/// Result of applying a policy; serializes as the bare level string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RiskTier {
    Coarse(CoarseRisk),
    Graded(RiskLevel),
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Coarse(r) => r.as_str(),
            RiskTier::Graded(r) => r.as_str(),
        }
    }

    /// Coarse tiers carry no advice
    pub fn recommendations(&self) -> &'static [&'static str] {
        match self {
            RiskTier::Coarse(_) => &[],
            RiskTier::Graded(level) => level.recommendations(),
        }
    }
}

impl RiskPolicy {
    pub fn classify(self, label: u8, probability: f64) -> RiskTier {
        match self {
            RiskPolicy::Coarse => RiskTier::Coarse(CoarseRisk::from_prediction(label, probability)),
            RiskPolicy::Graded => RiskTier::Graded(RiskLevel::from_probability(probability)),
        }
    }

    /// Only the graded path reports a confidence
    pub fn confidence(self, probability: f64) -> Option<f64> {
        match self {
            RiskPolicy::Coarse => None,
            RiskPolicy::Graded => Some(confidence_score(probability)),
        }
    }
}

/// Distance from the decision boundary, clamped to [0.7, 0.99].
///
/// Heuristic only, not a statistical interval.
pub fn confidence_score(probability: f64) -> f64 {
    (1.0 - 2.0 * (0.5 - probability).abs()).clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING)
}
