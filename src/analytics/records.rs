//! Storage-row to wire-record normalization.
//!
//! The store speaks snake_case (`id`, `created_at`, `updated_at`); the
//! dashboard contract expects `_id`, `createdAt` and `updatedAt`. The
//! normalizer adds the aliases without removing the originals, so a
//! record that already carries them passes through unchanged.

use serde::Serialize;
use serde_json::{Map, Value};

/// Map a storage row to its wire shape.
///
/// Copy-on-write: the input is never mutated. Non-object values
/// (including `Null`) are returned as-is, and applying the normalizer
/// twice yields the same result as applying it once.
pub fn normalize(record: &Value) -> Value {
    let Some(fields) = record.as_object() else {
        return record.clone();
    };

    let mut mapped = fields.clone();
    alias(&mut mapped, "id", "_id");
    alias(&mut mapped, "created_at", "createdAt");
    alias(&mut mapped, "updated_at", "updatedAt");
    Value::Object(mapped)
}

/// Normalize a whole row set.
pub fn normalize_all(records: &[Value]) -> Vec<Value> {
    records.iter().map(normalize).collect()
}

/// Serialize any record type and normalize it in one step.
pub fn to_wire<T: Serialize>(record: &T) -> Value {
    let value = serde_json::to_value(record).unwrap_or(Value::Null);
    normalize(&value)
}

fn alias(fields: &mut Map<String, Value>, from: &str, to: &str) {
    if fields.contains_key(to) {
        return;
    }
    if let Some(value) = fields.get(from) {
        if !value.is_null() {
            fields.insert(to.to_string(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_adds_aliases() {
        let row = json!({
            "id": 7,
            "created_at": "2024-01-01T10:00:00Z",
            "updated_at": "2024-01-02T10:00:00Z",
            "amount": 100.0
        });
        let mapped = normalize(&row);
        assert_eq!(mapped["_id"], json!(7));
        assert_eq!(mapped["createdAt"], json!("2024-01-01T10:00:00Z"));
        assert_eq!(mapped["updatedAt"], json!("2024-01-02T10:00:00Z"));
        // originals retained, other fields untouched
        assert_eq!(mapped["id"], json!(7));
        assert_eq!(mapped["amount"], json!(100.0));
    }

    #[test]
    fn test_idempotent() {
        let row = json!({"id": 1, "created_at": "2024-01-01T00:00:00Z"});
        let once = normalize(&row);
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_existing_alias_wins() {
        let row = json!({"id": 1, "_id": "keep-me"});
        let mapped = normalize(&row);
        assert_eq!(mapped["_id"], json!("keep-me"));
    }

    #[test]
    fn test_null_and_non_objects_pass_through() {
        assert_eq!(normalize(&Value::Null), Value::Null);
        assert_eq!(normalize(&json!("plain")), json!("plain"));
        assert_eq!(normalize(&json!([1, 2])), json!([1, 2]));
    }

    #[test]
    fn test_input_not_mutated() {
        let row = json!({"id": 3});
        let _ = normalize(&row);
        assert!(row.get("_id").is_none());
    }

    #[test]
    fn test_null_source_field_not_aliased() {
        let row = json!({"id": 1, "updated_at": null});
        let mapped = normalize(&row);
        assert!(mapped.get("updatedAt").is_none());
    }
}
