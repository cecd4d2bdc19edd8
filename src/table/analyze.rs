//! Field analysis: infer a semantic type and summary statistics per column
//!
//! Types are inferred by tagging every observed value and resolving the tag
//! set through an explicit priority list, never by ad-hoc truthiness.

use crate::table::types::{ColumnInfo, ColumnType, FlatRow};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

// Anchored at the start only: a full ISO timestamp still counts as a date
static DATE_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap());

/// Resolution order when a column carries more than one value tag
const TYPE_PRIORITY: [ColumnType; 3] = [ColumnType::Number, ColumnType::String, ColumnType::Boolean];

/// Analyze every column over the full row collection.
///
/// Recomputed from scratch whenever the rows change; there is no incremental
/// update path.
pub fn analyze_columns(rows: &[FlatRow], columns: &[String]) -> HashMap<String, ColumnInfo> {
    columns
        .iter()
        .map(|name| (name.clone(), analyze_column(rows, name)))
        .collect()
}

fn analyze_column(rows: &[FlatRow], name: &str) -> ColumnInfo {
    let mut tags: HashSet<ColumnType> = HashSet::new();
    let mut unique_values: Vec<Value> = Vec::new();
    let mut numbers: Vec<f64> = Vec::new();
    let mut null_count = 0usize;
    let mut sample: Option<Value> = None;

    for row in rows {
        match row.get(name) {
            None | Some(Value::Null) => {
                null_count += 1;
                tags.insert(ColumnType::Null);
            }
            Some(value) => {
                tags.insert(tag_value(value));

                if let Some(n) = value.as_f64() {
                    numbers.push(n);
                }
                if !unique_values.contains(value) {
                    unique_values.push(value.clone());
                }
                if sample.is_none() {
                    sample = Some(value.clone());
                }
            }
        }
    }

    let column_type = resolve_primary_type(&tags);

    let (min, max) = if column_type == ColumnType::Number && !numbers.is_empty() {
        (
            numbers.iter().copied().reduce(f64::min),
            numbers.iter().copied().reduce(f64::max),
        )
    } else {
        (None, None)
    };

    ColumnInfo {
        name: name.to_string(),
        column_type,
        unique_count: unique_values.len(),
        unique_values,
        null_count,
        min,
        max,
        sample,
    }
}

/// Tag a single non-null flattened value
fn tag_value(value: &Value) -> ColumnType {
    match value {
        Value::Number(_) => ColumnType::Number,
        Value::Bool(_) => ColumnType::Boolean,
        Value::String(s) => {
            if looks_like_json_array(s) {
                // The flattener serialized the original array to JSON text;
                // re-detect it here so array columns keep their tag
                ColumnType::Array
            } else if DATE_PREFIX_REGEX.is_match(s) {
                ColumnType::Date
            } else {
                ColumnType::String
            }
        }
        Value::Object(_) => ColumnType::Object,
        Value::Array(_) => ColumnType::Array,
        Value::Null => ColumnType::Null,
    }
}

/// A string holding serialized array text, per the flattener's contract.
/// A genuine string value that happens to look like a JSON array is counted
/// as one too; that is the accepted cost of re-detection.
fn looks_like_json_array(s: &str) -> bool {
    s.starts_with('[') && s.ends_with(']')
}

fn resolve_primary_type(tags: &HashSet<ColumnType>) -> ColumnType {
    if tags.len() == 1 {
        return *tags.iter().next().unwrap();
    }

    TYPE_PRIORITY
        .iter()
        .copied()
        .find(|t| tags.contains(t))
        .unwrap_or(ColumnType::Mixed)
}
