//! Transaction DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::analytics::reconcile::StatusGroup;
use crate::interfaces::http::modules::analytics::RevenuePoint;

/// Transaction list filters
#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    /// Exact status match (`success`, `failed`, `pending`)
    pub status: Option<String>,
    /// Substring match on department name
    pub dept: Option<String>,
    /// Exact kiosk identifier
    pub kiosk: Option<String>,
    /// Substring match across txn id, account, department and service
    pub search: Option<String>,
    /// Inclusive start day, `YYYY-MM-DD`
    pub date_from: Option<String>,
    /// Inclusive end day, `YYYY-MM-DD`
    pub date_to: Option<String>,
}

/// Revenue summary over a lookback window
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSummary {
    pub total_revenue: f64,
    pub total_txns: u64,
    pub data: Vec<RevenuePoint>,
}

/// Reconcile query: `?date=YYYY-MM-DD`, defaults to today UTC
#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ReconcileQuery {
    pub date: Option<String>,
}

/// Single-day settlement summary grouped by status
#[derive(Debug, Serialize, ToSchema)]
pub struct ReconcileReport {
    pub date: String,
    pub summary: Vec<StatusGroup>,
}
