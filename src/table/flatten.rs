//! Flattening nested JSON into dot-path rows, and extracting the column set

use crate::table::types::FlatRow;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Flatten one JSON record into a single-level mapping keyed by dot path.
///
/// - Nested non-null objects recurse, prefixing child keys with
///   `parent.child`.
/// - Arrays (regardless of element type) become one column holding the
///   array's canonical JSON text.
/// - Scalars and null are stored as-is.
///
/// Non-object records flatten to the empty row; the caller decides whether
/// that constitutes a degraded table.
pub fn flatten_value(value: &Value) -> FlatRow {
    let mut row = Map::new();
    if let Value::Object(obj) = value {
        flatten_into(obj, "", &mut row);
    }
    row
}

fn flatten_into(obj: &Map<String, Value>, prefix: &str, out: &mut FlatRow) {
    for (key, value) in obj {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::Object(nested) => flatten_into(nested, &path, out),
            Value::Array(_) => {
                // Arrays are never recursed into; serialize the whole value
                out.insert(path, Value::String(value.to_string()));
            }
            other => {
                // Paths are unique by construction; a collision can only come
                // from pathological input and resolves last-write-wins
                out.insert(path, other.clone());
            }
        }
    }
}

/// Compute the column set: the union of flattened keys across all rows,
/// sorted lexicographically so the column order is stable no matter which
/// record first introduced a key.
pub fn extract_columns(rows: &[FlatRow]) -> Vec<String> {
    let mut keys = BTreeSet::new();
    for row in rows {
        for key in row.keys() {
            keys.insert(key.clone());
        }
    }
    keys.into_iter().collect()
}
