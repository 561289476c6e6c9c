//! Regions and alerts

use chrono::{DateTime, Utc};
use floodsense_core::RiskLevel;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub name: &'static str,
    pub risk_level: RiskLevel,
    pub population: u64,
}

pub const REGIONS: [Region; 6] = [
    Region { name: "Jonglei", risk_level: RiskLevel::Danger, population: 450_000 },
    Region { name: "Unity", risk_level: RiskLevel::Alert, population: 320_000 },
    Region { name: "Upper Nile", risk_level: RiskLevel::Danger, population: 380_000 },
    Region { name: "Northern Bahr el Ghazal", risk_level: RiskLevel::Safe, population: 180_000 },
    Region { name: "Warrap", risk_level: RiskLevel::Caution, population: 250_000 },
    Region { name: "Central Equatoria", risk_level: RiskLevel::Safe, population: 420_000 },
];

#[derive(Debug, Serialize)]
pub struct RegionsResponse {
    pub regions: &'static [Region],
}

#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub id: u32,
    pub level: RiskLevel,
    pub message: &'static str,
    pub region: &'static str,
    pub timestamp: DateTime<Utc>,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub alerts: Vec<Alert>,
}

/// Current alert list, stamped with `now`
pub fn active_alerts(now: DateTime<Utc>) -> Vec<Alert> {
    vec![
        Alert {
            id: 1,
            level: RiskLevel::Danger,
            message: "Rising water levels in Jonglei region",
            region: "Jonglei",
            timestamp: now,
            active: true,
        },
        Alert {
            id: 2,
            level: RiskLevel::Alert,
            message: "Increased rainfall expected in Unity State",
            region: "Unity",
            timestamp: now,
            active: true,
        },
    ]
}
