//! Kiosk DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Kiosk list filters
#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct KioskFilter {
    /// Exact status match (`online`, `offline`, `maintenance`)
    pub status: Option<String>,
    /// Substring match on city
    pub city: Option<String>,
    /// Substring match across kiosk id, location and city
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateKioskRequest {
    #[validate(length(min = 1, max = 50, message = "kiosk id is required"))]
    pub kiosk_id: String,
    pub location: Option<String>,
    pub city: Option<String>,
    /// Defaults to `offline`
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateKioskRequest {
    pub location: Option<String>,
    pub city: Option<String>,
    pub status: Option<String>,
    pub current_session: Option<String>,
    #[validate(range(min = 0.0, max = 100.0, message = "uptime must be 0-100"))]
    pub uptime: Option<f64>,
}

/// Per-kiosk session counters
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KioskStatsResponse {
    pub total_sessions: i32,
    pub today_sessions: i32,
    pub uptime: Option<f64>,
}
