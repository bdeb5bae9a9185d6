//! Aggregation and reporting core for the dashboard.
//!
//! Everything in this module is pure: row sets go in, request-scoped
//! derived structures come out. Fetching lives in the HTTP layer;
//! malformed rows are skipped or bucketed, never fatal.

pub mod dimensions;
pub mod overview;
pub mod reconcile;
pub mod records;
pub mod time_buckets;

pub use dimensions::{aggregate_by_dimension, rate, UNKNOWN_KEY};
pub use overview::Overview;
pub use records::{normalize, normalize_all, to_wire};
pub use time_buckets::{aggregate_by_day, day_key, row_timestamp};

use chrono::{DateTime, Duration, Utc};

/// Lookback window for range queries: `"7d"`, `"30d"` or `"90d"`.
/// Any other token falls back to 7 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    Days7,
    Days30,
    Days90,
}

impl Lookback {
    pub fn parse(token: Option<&str>) -> Self {
        match token {
            Some("30d") => Self::Days30,
            Some("90d") => Self::Days90,
            _ => Self::Days7,
        }
    }

    pub fn days(self) -> i64 {
        match self {
            Self::Days7 => 7,
            Self::Days30 => 30,
            Self::Days90 => 90,
        }
    }

    /// Cutoff instant, measured back from `now`.
    pub fn since(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookback_tokens() {
        assert_eq!(Lookback::parse(Some("30d")), Lookback::Days30);
        assert_eq!(Lookback::parse(Some("90d")), Lookback::Days90);
        assert_eq!(Lookback::parse(Some("7d")), Lookback::Days7);
        // Unknown tokens and absence both default to 7 days
        assert_eq!(Lookback::parse(Some("365d")), Lookback::Days7);
        assert_eq!(Lookback::parse(None), Lookback::Days7);
    }

    #[test]
    fn test_lookback_cutoff() {
        let now = Utc::now();
        assert_eq!(now - Lookback::Days30.since(now), Duration::days(30));
    }
}
