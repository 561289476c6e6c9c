//! Prediction request/response models

use std::fmt;

use chrono::{DateTime, Utc};
use floodsense_core::logic::model::confidence_score;
use floodsense_core::{FeatureVector, Prediction, RiskTier};
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Model input, one field per layout feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_day_of_month"))]
pub struct FloodFeatures {
    #[validate(range(min = 1, max = 12))]
    #[serde(deserialize_with = "whole_number")]
    pub month: i64,
    #[validate(range(min = 1, max = 31))]
    #[serde(deserialize_with = "whole_number")]
    pub day: i64,
    #[validate(range(min = 0, max = 6))]
    #[serde(deserialize_with = "whole_number")]
    pub day_of_week: i64,
    #[validate(range(min = 1, max = 366))]
    #[serde(deserialize_with = "whole_number")]
    pub day_of_year: i64,
    #[validate(range(min = 1, max = 4))]
    #[serde(deserialize_with = "whole_number")]
    pub quarter: i64,
    #[validate(range(min = 0))]
    #[serde(deserialize_with = "whole_number")]
    pub days_since_reference: i64,
    #[validate(range(min = 0))]
    #[serde(deserialize_with = "whole_number")]
    pub scene_id_numeric: i64,
    #[validate(range(min = 0, max = 1))]
    #[serde(deserialize_with = "whole_number")]
    pub data_coverage: i64,
    #[validate(range(min = 1))]
    #[serde(deserialize_with = "whole_number")]
    pub filename_length: i64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub filename_hash: f64,
    #[validate(range(min = 0))]
    #[serde(deserialize_with = "whole_number")]
    pub observation_index: i64,
}

/// Integer field that also accepts integral floats such as `6.0`
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    struct WholeNumber;

    impl<'de> Visitor<'de> for WholeNumber {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a whole number")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                Ok(v as i64)
            } else {
                Err(E::invalid_value(Unexpected::Float(v), &self))
            }
        }
    }

    deserializer.deserialize_any(WholeNumber)
}

/// No year is given, so February allows the 29th
fn validate_day_of_month(features: &FloodFeatures) -> Result<(), ValidationError> {
    let max_day = match features.month {
        2 => 29,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    };

    if features.day > max_day {
        let mut err = ValidationError::new("day_of_month");
        err.message = Some(format!("Invalid day {} for month {}", features.day, features.month).into());
        return Err(err);
    }
    Ok(())
}

impl FloodFeatures {
    /// Dense vector in built-in layout order
    pub fn to_vector(&self) -> FeatureVector {
        FeatureVector::from_values([
            self.month as f64,
            self.day as f64,
            self.day_of_week as f64,
            self.day_of_year as f64,
            self.quarter as f64,
            self.days_since_reference as f64,
            self.scene_id_numeric as f64,
            self.data_coverage as f64,
            self.filename_length as f64,
            self.filename_hash,
            self.observation_index as f64,
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_coordinates"))]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub region: Option<String>,
}

fn validate_coordinates(location: &Location) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&location.lat) || !(-180.0..=180.0).contains(&location.lng) {
        let mut err = ValidationError::new("coordinates");
        err.message = Some(format!("Invalid coordinates ({}, {})", location.lat, location.lng).into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FloodPredictionRequest {
    #[validate(nested)]
    pub features: FloodFeatures,
    #[validate(nested)]
    pub location: Option<Location>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BatchPredictionRequest {
    #[validate(length(max = 100), nested)]
    pub predictions: Vec<FloodPredictionRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FloodPredictionResponse {
    pub prediction: u8,
    pub flood_probability: f64,
    pub risk_level: RiskTier,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
    pub location: Option<Location>,
    pub recommendations: Vec<String>,
}

impl FloodPredictionResponse {
    pub fn new(prediction: Prediction, location: Option<Location>, timestamp: DateTime<Utc>) -> Self {
        Self {
            prediction: prediction.label,
            flood_probability: prediction.probability,
            risk_level: prediction.risk,
            confidence: prediction
                .confidence
                .unwrap_or_else(|| confidence_score(prediction.probability)),
            timestamp,
            location,
            recommendations: prediction.recommendations,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchPredictionResponse {
    pub results: Vec<FloodPredictionResponse>,
    pub total_processed: usize,
    pub flood_count: usize,
    pub processing_time_ms: f64,
    pub timestamp: DateTime<Utc>,
}
