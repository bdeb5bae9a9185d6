//! Analytics DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Range query: `?range=7d|30d|90d`
#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct RangeQuery {
    pub range: Option<String>,
}

/// One day of successful revenue
#[derive(Debug, Serialize, ToSchema)]
pub struct RevenuePoint {
    /// Day key, `YYYY-MM-DD` UTC
    #[serde(rename = "_id")]
    pub day: String,
    pub revenue: f64,
    pub count: u64,
}

/// One day of transaction outcomes
#[derive(Debug, Serialize, ToSchema)]
pub struct TxnChartPoint {
    /// Day key, `YYYY-MM-DD` UTC
    #[serde(rename = "_id")]
    pub day: String,
    pub total: u64,
    pub success: u64,
    pub failed: u64,
}

/// Per-department transaction totals
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeptStat {
    pub name: String,
    pub txns: u64,
    pub revenue: f64,
    pub success: u64,
    pub success_rate: f64,
}

/// Per-kiosk session ranking
#[derive(Debug, Serialize, ToSchema)]
pub struct KioskStat {
    #[serde(rename = "_id")]
    pub kiosk_id: String,
    pub sessions: u64,
    pub revenue: f64,
}

/// Whole-table conversion and failure rates
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BehavioralMetrics {
    pub conversion_rate: f64,
    pub failure_rate: f64,
}

impl BehavioralMetrics {
    /// Derives both rates from the two counts. The counts come from
    /// separate queries, so a concurrent insert can leave
    /// `success > total`; saturate rather than underflow.
    pub fn from_counts(success: u64, total: u64) -> Self {
        use crate::analytics::rate;

        Self {
            conversion_rate: rate(success.min(total), total),
            failure_rate: rate(total.saturating_sub(success), total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn behavioral_rates_from_counts() {
        let m = BehavioralMetrics::from_counts(3, 4);
        assert_eq!(m.conversion_rate, 75.0);
        assert_eq!(m.failure_rate, 25.0);
    }

    #[test]
    fn behavioral_rates_tolerate_racing_counts() {
        // counts are taken by two separate queries, so success can
        // briefly exceed total
        let m = BehavioralMetrics::from_counts(5, 4);
        assert_eq!(m.conversion_rate, 100.0);
        assert_eq!(m.failure_rate, 0.0);
    }

    #[test]
    fn behavioral_rates_empty_table() {
        let m = BehavioralMetrics::from_counts(0, 0);
        assert_eq!(m.conversion_rate, 0.0);
        assert_eq!(m.failure_rate, 0.0);
    }
}
