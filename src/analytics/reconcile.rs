//! End-of-day settlement summary.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::analytics::dimensions::aggregate_with_default;
use crate::infrastructure::database::entities::transaction;

/// Bucket for rows with a missing status; they are reported, not dropped.
pub const UNKNOWN_STATUS: &str = "unknown";

/// Per-status settlement group for one calendar day.
#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct StatusGroup {
    #[serde(rename = "_id")]
    pub status: String,
    /// Arithmetic sum of member amounts.
    pub total: f64,
    pub count: u64,
}

/// Group a day's transactions by status, summing amounts and counting
/// rows per group. An empty input yields an empty sequence.
pub fn by_status(rows: &[transaction::Model]) -> Vec<StatusGroup> {
    aggregate_with_default(
        rows,
        |row| row.status.as_deref(),
        UNKNOWN_STATUS,
        |key| StatusGroup {
            status: key.to_string(),
            total: 0.0,
            count: 0,
        },
        |group, row| {
            group.total += row.amount_or_zero();
            group.count += 1;
        },
    )
}

/// Inclusive UTC bounds of a calendar day: `[00:00:00, 23:59:59]`.
/// `None` when the input is not a valid `YYYY-MM-DD` date.
pub fn day_bounds(day: &str) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()?;
    let start = date.and_time(NaiveTime::MIN).and_utc();
    let end = date
        .and_time(NaiveTime::from_hms_opt(23, 59, 59)?)
        .and_utc();
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

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
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    #[test]
    fn test_groups_by_status_with_exact_sums() {
        let rows = vec![
            txn(Some("success"), 10.5),
            txn(Some("success"), 20.25),
            txn(Some("failed"), 5.0),
        ];
        let groups = by_status(&rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].status, "success");
        assert_eq!(groups[0].total, 30.75);
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[1].status, "failed");
        assert_eq!(groups[1].count, 1);
    }

    #[test]
    fn test_missing_status_reported_as_unknown() {
        let rows = vec![txn(None, 12.0), txn(Some("success"), 1.0)];
        let groups = by_status(&rows);
        let unknown = groups.iter().find(|g| g.status == UNKNOWN_STATUS).unwrap();
        assert_eq!(unknown.count, 1);
        assert_eq!(unknown.total, 12.0);
    }

    #[test]
    fn test_empty_day_is_empty_not_error() {
        assert!(by_status(&[]).is_empty());
    }

    #[test]
    fn test_day_bounds() {
        let (start, end) = day_bounds("2024-01-15").unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
        assert_eq!(end.hour(), 23);
        assert_eq!(end.second(), 59);
        assert!(day_bounds("15/01/2024").is_none());
        assert!(day_bounds("").is_none());
    }
}
