//! Monitored locations

use chrono::{DateTime, Utc};
use floodsense_core::RiskTier;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitoredLocation {
    pub id: u32,
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub population: u64,
    pub state: &'static str,
}

pub const LOCATIONS: [MonitoredLocation; 6] = [
    MonitoredLocation { id: 1, name: "Bor", lat: 6.2088, lng: 31.5594, population: 315_000, state: "Jonglei" },
    MonitoredLocation { id: 2, name: "Bentiu", lat: 9.2333, lng: 29.7833, population: 100_000, state: "Unity" },
    MonitoredLocation { id: 3, name: "Malakal", lat: 9.5334, lng: 31.6605, population: 160_000, state: "Upper Nile" },
    MonitoredLocation { id: 4, name: "Aweil", lat: 8.7667, lng: 27.4000, population: 120_000, state: "Northern Bahr el Ghazal" },
    MonitoredLocation { id: 5, name: "Kuacjok", lat: 8.1167, lng: 29.6667, population: 95_000, state: "Warrap" },
    MonitoredLocation { id: 6, name: "Juba", lat: 4.8594, lng: 31.5713, population: 525_000, state: "Central Equatoria" },
];

impl MonitoredLocation {
    pub fn find(id: u32) -> Option<&'static MonitoredLocation> {
        LOCATIONS.iter().find(|l| l.id == id)
    }
}

/// Coarse-policy result for one location
#[derive(Debug, Serialize)]
pub struct LocationPredictionResponse {
    pub location_id: u32,
    pub location_name: &'static str,
    pub prediction: u8,
    /// Rounded to 4 decimal places
    pub probability: f64,
    pub risk_level: RiskTier,
    pub defaulted_features: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
