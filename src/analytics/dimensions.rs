//! Grouping by a categorical dimension (department, kiosk, status).

use std::collections::HashMap;

/// Sentinel group for rows with a missing dimension value.
pub const UNKNOWN_KEY: &str = "Unknown";

/// Group rows by a categorical key, preserving first-seen group order.
///
/// Rows with an absent or empty key land in the `default_key` group.
/// The insertion order matters: callers sort with a stable sort, so
/// equal sort keys keep their first-seen order.
pub fn aggregate_with_default<R, A>(
    rows: &[R],
    key: impl Fn(&R) -> Option<&str>,
    default_key: &str,
    seed: impl Fn(&str) -> A,
    mut update: impl FnMut(&mut A, &R),
) -> Vec<A> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<A> = Vec::new();

    for row in rows {
        let group_key = match key(row) {
            Some(k) if !k.is_empty() => k,
            _ => default_key,
        };
        let slot = match index.get(group_key) {
            Some(&slot) => slot,
            None => {
                index.insert(group_key.to_string(), groups.len());
                groups.push(seed(group_key));
                groups.len() - 1
            }
        };
        update(&mut groups[slot], row);
    }

    groups
}

/// [`aggregate_with_default`] with the standard `"Unknown"` sentinel.
pub fn aggregate_by_dimension<R, A>(
    rows: &[R],
    key: impl Fn(&R) -> Option<&str>,
    seed: impl Fn(&str) -> A,
    update: impl FnMut(&mut A, &R),
) -> Vec<A> {
    aggregate_with_default(rows, key, UNKNOWN_KEY, seed, update)
}

/// `part` of `total` as a percentage with one decimal place.
/// A zero denominator yields 0, never an error or NaN.
pub fn rate(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(part as f64 / total as f64 * 100.0)
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        dept: Option<&'static str>,
        amount: f64,
        success: bool,
    }

    #[derive(Debug, PartialEq)]
    struct DeptGroup {
        name: String,
        txns: u64,
        success: u64,
        revenue: f64,
    }

    fn group(rows: &[Row]) -> Vec<DeptGroup> {
        aggregate_by_dimension(
            rows,
            |row| row.dept,
            |key| DeptGroup {
                name: key.to_string(),
                txns: 0,
                success: 0,
                revenue: 0.0,
            },
            |g, row| {
                g.txns += 1;
                if row.success {
                    g.success += 1;
                    g.revenue += row.amount;
                }
            },
        )
    }

    #[test]
    fn test_missing_key_becomes_unknown() {
        let rows = vec![
            Row { dept: Some("Water"), amount: 10.0, success: true },
            Row { dept: None, amount: 5.0, success: true },
        ];
        let groups = group(&rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Water");
        assert_eq!(groups[1].name, UNKNOWN_KEY);
        // both groups are fully successful
        assert_eq!(rate(groups[0].success, groups[0].txns), 100.0);
        assert_eq!(rate(groups[1].success, groups[1].txns), 100.0);
    }

    #[test]
    fn test_empty_key_treated_as_missing() {
        let rows = vec![Row { dept: Some(""), amount: 1.0, success: false }];
        let groups = group(&rows);
        assert_eq!(groups[0].name, UNKNOWN_KEY);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let rows = vec![
            Row { dept: Some("B"), amount: 1.0, success: true },
            Row { dept: Some("A"), amount: 1.0, success: true },
            Row { dept: Some("B"), amount: 1.0, success: true },
        ];
        let names: Vec<String> = group(&rows).into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_stable_sort_and_truncation() {
        let rows = vec![
            Row { dept: Some("First"), amount: 10.0, success: true },
            Row { dept: Some("Second"), amount: 10.0, success: true },
            Row { dept: Some("Third"), amount: 50.0, success: true },
        ];
        let mut groups = group(&rows);
        groups.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
        groups.truncate(2);
        // ties keep insertion order under the stable sort
        assert_eq!(groups[0].name, "Third");
        assert_eq!(groups[1].name, "First");
    }

    #[test]
    fn test_rate_bounds_and_zero_denominator() {
        assert_eq!(rate(0, 0), 0.0);
        assert_eq!(rate(1, 3), 33.3);
        assert_eq!(rate(2, 3), 66.7);
        assert_eq!(rate(3, 3), 100.0);
        for (part, total) in [(0u64, 5u64), (5, 5), (1, 7), (6, 7)] {
            let r = rate(part, total);
            assert!((0.0..=100.0).contains(&r));
        }
    }
}
