//! Region and alert handlers

use axum::Json;
use chrono::Utc;

use crate::models::{active_alerts, AlertsResponse, RegionsResponse, REGIONS};

pub async fn regions() -> Json<RegionsResponse> {
    Json(RegionsResponse { regions: &REGIONS })
}

pub async fn alerts() -> Json<AlertsResponse> {
    Json(AlertsResponse {
        alerts: active_alerts(Utc::now()),
    })
}
