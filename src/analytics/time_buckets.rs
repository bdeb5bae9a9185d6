//! Calendar-day bucketing over arbitrary row sets.
//!
//! Buckets are keyed by the UTC day prefix (`YYYY-MM-DD`), accumulated
//! through a caller-supplied init/update pair, and returned ascending by
//! key. The fixed-width ISO key makes lexicographic order chronological,
//! so a `BTreeMap` gives the required ordering for free.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

/// 10-character UTC calendar-day key.
pub fn day_key(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d").to_string()
}

/// Group rows into calendar-day buckets.
///
/// Rows for which `timestamp` yields `None` are skipped; they never
/// abort the aggregation and never appear in the output. On the first
/// row of a day the bucket is created via `init(key)`; every row of
/// that day then passes through `update`.
pub fn aggregate_by_day<R, B>(
    rows: &[R],
    timestamp: impl Fn(&R) -> Option<DateTime<Utc>>,
    init: impl Fn(&str) -> B,
    mut update: impl FnMut(&mut B, &R),
) -> Vec<B> {
    let mut buckets: BTreeMap<String, B> = BTreeMap::new();

    for row in rows {
        let Some(instant) = timestamp(row) else {
            continue;
        };
        let key = day_key(instant);
        let bucket = buckets.entry(key.clone()).or_insert_with(|| init(&key));
        update(bucket, row);
    }

    buckets.into_values().collect()
}

/// Timestamp of a loosely-shaped JSON row.
///
/// Prefers the canonical `createdAt` field, falling back to the storage
/// form `created_at`. Only RFC 3339 strings parse; anything else is
/// `None` so the row gets skipped upstream.
pub fn row_timestamp(row: &Value) -> Option<DateTime<Utc>> {
    let raw = row
        .get("createdAt")
        .and_then(Value::as_str)
        .or_else(|| row.get("created_at").and_then(Value::as_str))?;

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    struct RevenueBucket {
        day: String,
        revenue: f64,
        count: u64,
    }

    fn revenue_buckets(rows: &[Value]) -> Vec<RevenueBucket> {
        aggregate_by_day(
            rows,
            row_timestamp,
            |key| RevenueBucket {
                day: key.to_string(),
                revenue: 0.0,
                count: 0,
            },
            |bucket, row| {
                bucket.revenue += row["amount"].as_f64().unwrap_or(0.0);
                bucket.count += 1;
            },
        )
    }

    #[test]
    fn test_revenue_chart_scenario() {
        let rows = vec![
            json!({"amount": 50.0, "created_at": "2024-01-01T10:00:00Z"}),
            json!({"amount": 70.0, "created_at": "2024-01-01T18:30:00Z"}),
            json!({"amount": 30.0, "created_at": "2024-01-02T09:00:00Z"}),
        ];
        let buckets = revenue_buckets(&rows);
        assert_eq!(
            buckets,
            vec![
                RevenueBucket {
                    day: "2024-01-01".into(),
                    revenue: 120.0,
                    count: 2
                },
                RevenueBucket {
                    day: "2024-01-02".into(),
                    revenue: 30.0,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_invalid_timestamp_skipped() {
        let rows = vec![
            json!({"amount": 10.0, "created_at": "not-a-date"}),
            json!({"amount": 20.0}),
            json!({"amount": 30.0, "created_at": "2024-03-05T00:00:00Z"}),
        ];
        let buckets = revenue_buckets(&rows);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[0].revenue, 30.0);
    }

    #[test]
    fn test_count_conservation() {
        let rows: Vec<Value> = (0..10)
            .map(|i| json!({"amount": 1.0, "created_at": format!("2024-01-{:02}T12:00:00Z", i % 3 + 1)}))
            .chain(std::iter::once(json!({"amount": 1.0, "created_at": "garbage"})))
            .collect();
        let buckets = revenue_buckets(&rows);
        let total: u64 = buckets.iter().map(|b| b.count).sum();
        // every parseable row lands in exactly one bucket
        assert_eq!(total, 10);
    }

    #[test]
    fn test_ascending_key_order() {
        let rows = vec![
            json!({"amount": 1.0, "created_at": "2024-02-10T00:00:00Z"}),
            json!({"amount": 1.0, "created_at": "2024-01-05T00:00:00Z"}),
            json!({"amount": 1.0, "created_at": "2023-12-31T23:59:59Z"}),
        ];
        let days: Vec<String> = revenue_buckets(&rows).into_iter().map(|b| b.day).collect();
        assert_eq!(days, vec!["2023-12-31", "2024-01-05", "2024-02-10"]);
    }

    #[test]
    fn test_camel_case_timestamp_preferred() {
        let row = json!({
            "createdAt": "2024-01-01T00:00:00Z",
            "created_at": "1999-01-01T00:00:00Z"
        });
        let ts = row_timestamp(&row).unwrap();
        assert_eq!(day_key(ts), "2024-01-01");
    }

    #[test]
    fn test_offset_timestamps_bucket_in_utc() {
        // 03:30+05:30 on Jan 2 is 22:00 UTC on Jan 1
        let row = json!({"created_at": "2024-01-02T03:30:00+05:30"});
        let ts = row_timestamp(&row).unwrap();
        assert_eq!(day_key(ts), "2024-01-01");
    }
}
