//! Dashboard overview reductions.
//!
//! Each reduction is a single fold over an already-fetched row set; the
//! HTTP layer fetches the three sets concurrently and fails the whole
//! snapshot if any fetch fails (never partial results).

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::analytics::dimensions::rate;
use crate::infrastructure::database::entities::{complaint, kiosk, transaction};

/// A labelled fetch failure, so the caller can tell which of the
/// overview's row sets could not be loaded.
#[derive(Debug, Error)]
#[error("{what} fetch failed: {source}")]
pub struct FetchError {
    pub what: &'static str,
    #[source]
    pub source: sea_orm::DbErr,
}

impl FetchError {
    pub fn new(what: &'static str, source: sea_orm::DbErr) -> Self {
        Self { what, source }
    }
}

/// Transaction counters over the lookback window.
#[derive(Debug, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TxnTotals {
    /// Revenue summed over successful transactions only.
    pub total_revenue: f64,
    pub total_txns: u64,
    pub success_txns: u64,
    pub failed_txns: u64,
    /// failed/total as a percentage, one decimal, 0 when empty.
    pub failure_rate: f64,
    /// success/total as a percentage, one decimal, 0 when empty.
    pub conversion_rate: f64,
}

impl TxnTotals {
    pub fn from_rows(rows: &[transaction::Model]) -> Self {
        let mut totals = Self::default();
        for row in rows {
            totals.total_txns += 1;
            match row.status.as_deref() {
                Some("success") => {
                    totals.success_txns += 1;
                    totals.total_revenue += row.amount_or_zero();
                }
                Some("failed") => totals.failed_txns += 1,
                _ => {}
            }
        }
        totals.failure_rate = rate(totals.failed_txns, totals.total_txns);
        totals.conversion_rate = rate(totals.success_txns, totals.total_txns);
        totals
    }
}

/// Kiosk fleet counters.
#[derive(Debug, Default, PartialEq, Serialize, ToSchema)]
pub struct KioskTotals {
    pub total: u64,
    pub online: u64,
    pub offline: u64,
    pub maintenance: u64,
}

impl KioskTotals {
    pub fn from_rows(rows: &[kiosk::Model]) -> Self {
        let mut totals = Self::default();
        for row in rows {
            totals.total += 1;
            // Statuses outside the enum count only toward the total.
            match row.status.as_str() {
                "online" => totals.online += 1,
                "offline" => totals.offline += 1,
                "maintenance" => totals.maintenance += 1,
                _ => {}
            }
        }
        totals
    }
}

/// Complaint counters over the lookback window.
#[derive(Debug, Default, PartialEq, Serialize, ToSchema)]
pub struct ComplaintTotals {
    pub total: u64,
    pub open: u64,
    /// Resolved and closed complaints, reported as one bucket.
    pub resolved: u64,
}

impl ComplaintTotals {
    pub fn from_rows(rows: &[complaint::Model]) -> Self {
        let mut totals = Self::default();
        for row in rows {
            totals.total += 1;
            if row.status == "open" {
                totals.open += 1;
            }
            if row.is_settled() {
                totals.resolved += 1;
            }
        }
        totals
    }
}

/// Combined dashboard snapshot.
#[derive(Debug, Serialize, ToSchema)]
pub struct Overview {
    #[serde(flatten)]
    pub txns: TxnTotals,
    pub kiosks: KioskTotals,
    pub complaints: ComplaintTotals,
}

impl Overview {
    pub fn compose(
        txns: &[transaction::Model],
        kiosks: &[kiosk::Model],
        complaints: &[complaint::Model],
    ) -> Self {
        Self {
            txns: TxnTotals::from_rows(txns),
            kiosks: KioskTotals::from_rows(kiosks),
            complaints: ComplaintTotals::from_rows(complaints),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn txn(status: Option<&str>, amount: f64) -> transaction::Model {
        transaction::Model {
            id: 0,
            txn_id: "TXN-TEST".to_string(),
            dept_name: None,
            kiosk_id: None,
            service: None,
            account: None,
            amount: Some(amount),
            status: status.map(str::to_string),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    fn kiosk(status: &str) -> kiosk::Model {
        kiosk::Model {
            id: 0,
            kiosk_id: "KSK-TEST".to_string(),
            location: None,
            city: None,
            status: status.to_string(),
            current_session: None,
            last_online: None,
            total_sessions: 0,
            today_sessions: 0,
            uptime: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    fn complaint(status: &str) -> complaint::Model {
        complaint::Model {
            id: 0,
            complaint_id: "CMP-TEST".to_string(),
            dept_name: None,
            category: None,
            account: None,
            priority: None,
            status: status.to_string(),
            assigned_to: None,
            resolution: None,
            history: None,
            resolved_at: None,
            escalated_at: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    #[test]
    fn test_txn_totals_success_and_failure() {
        let rows = vec![txn(Some("success"), 100.0), txn(Some("failed"), 0.0)];
        let totals = TxnTotals::from_rows(&rows);
        assert_eq!(totals.total_txns, 2);
        assert_eq!(totals.success_txns, 1);
        assert_eq!(totals.failed_txns, 1);
        assert_eq!(totals.total_revenue, 100.0);
        assert_eq!(totals.failure_rate, 50.0);
        assert_eq!(totals.conversion_rate, 50.0);
    }

    #[test]
    fn test_pending_counts_toward_total_only() {
        let rows = vec![
            txn(Some("success"), 10.0),
            txn(Some("pending"), 25.0),
            txn(None, 5.0),
        ];
        let totals = TxnTotals::from_rows(&rows);
        assert_eq!(totals.total_txns, 3);
        assert!(totals.success_txns + totals.failed_txns <= totals.total_txns);
        // pending amounts never count as revenue
        assert_eq!(totals.total_revenue, 10.0);
    }

    #[test]
    fn test_empty_window_has_zero_rates() {
        let totals = TxnTotals::from_rows(&[]);
        assert_eq!(totals.failure_rate, 0.0);
        assert_eq!(totals.conversion_rate, 0.0);
    }

    #[test]
    fn test_kiosk_foreign_status_not_bucketed() {
        let rows = vec![
            kiosk("online"),
            kiosk("offline"),
            kiosk("maintenance"),
            kiosk("rebooting"),
        ];
        let totals = KioskTotals::from_rows(&rows);
        assert_eq!(totals.total, 4);
        assert_eq!(totals.online + totals.offline + totals.maintenance, 3);
    }

    #[test]
    fn test_complaint_resolved_union() {
        let rows = vec![
            complaint("open"),
            complaint("resolved"),
            complaint("closed"),
            complaint("escalated"),
        ];
        let totals = ComplaintTotals::from_rows(&rows);
        assert_eq!(totals.total, 4);
        assert_eq!(totals.open, 1);
        assert_eq!(totals.resolved, 2);
    }

    #[test]
    fn test_overview_wire_shape() {
        let overview = Overview::compose(
            &[txn(Some("success"), 100.0), txn(Some("failed"), 0.0)],
            &[kiosk("online")],
            &[complaint("open")],
        );
        let json = serde_json::to_value(&overview).unwrap();
        // transaction counters are flattened to the top level
        assert_eq!(json["totalRevenue"], 100.0);
        assert_eq!(json["failureRate"], 50.0);
        assert_eq!(json["conversionRate"], 50.0);
        assert_eq!(json["kiosks"]["online"], 1);
        assert_eq!(json["complaints"]["open"], 1);
    }
}
