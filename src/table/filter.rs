//! Filter engine: per-column predicates combined with logical AND
//!
//! Every rule here is total: malformed or unknown conditions fall back to the
//! fail-open/fail-closed behavior documented on each variant instead of
//! erroring.

use crate::table::types::{cell_text, coerce_number, ColumnInfo, FlatRow};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Active filter conditions, at most one per column
pub type FilterMap = HashMap<String, Filter>;

/// Boolean filter selector, mirroring an all/true/false dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoolFilter {
    All,
    True,
    False,
}

/// One filter condition. The payload shape is fixed per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Filter {
    /// Case-insensitive substring match; the empty pattern always passes
    Text { value: String },

    /// Inclusive bounds; an absent bound is unconstrained
    NumberRange {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },

    /// Strict equality against a JSON boolean; `All` always passes
    Boolean { value: BoolFilter },

    /// Row value must be a member; the empty sequence passes vacuously
    MultiSelect { values: Vec<Value> },

    /// Unrecognized condition kinds pass every row (fail open)
    #[serde(other)]
    Unknown,
}

impl Filter {
    pub fn text(value: impl Into<String>) -> Self {
        Filter::Text { value: value.into() }
    }

    pub fn number_range(min: Option<f64>, max: Option<f64>) -> Self {
        Filter::NumberRange { min, max }
    }

    pub fn multi_select(values: Vec<Value>) -> Self {
        Filter::MultiSelect { values }
    }

    /// Whether the filter's own value is empty. A missing row value only
    /// passes a condition whose value is empty in this sense.
    fn is_empty_valued(&self) -> bool {
        matches!(self, Filter::Text { value } if value.is_empty())
    }

    /// Evaluate this condition against one cell
    fn matches(&self, value: Option<&Value>) -> bool {
        let value = match value {
            None | Some(Value::Null) => return self.is_empty_valued(),
            Some(v) => v,
        };

        match self {
            Filter::Text { value: pattern } => {
                if pattern.is_empty() {
                    return true;
                }
                cell_text(value)
                    .to_lowercase()
                    .contains(&pattern.to_lowercase())
            }
            Filter::NumberRange { min, max } => {
                let n = match coerce_number(value) {
                    Some(n) => n,
                    // Coercion failure excludes the row, silently
                    None => return false,
                };
                if min.is_some_and(|lo| n < lo) {
                    return false;
                }
                if max.is_some_and(|hi| n > hi) {
                    return false;
                }
                true
            }
            Filter::Boolean { value: choice } => match choice {
                BoolFilter::All => true,
                BoolFilter::True => matches!(value, Value::Bool(true)),
                BoolFilter::False => matches!(value, Value::Bool(false)),
            },
            Filter::MultiSelect { values } => values.is_empty() || values.contains(value),
            Filter::Unknown => true,
        }
    }
}

/// Return the rows satisfying every active condition.
///
/// An empty filter map is the identity: the full row set comes back as
/// borrows without touching any row. Conditions naming a column that is not
/// in the metadata pass.
pub fn filter_rows<'a>(
    rows: &'a [FlatRow],
    filters: &FilterMap,
    columns: &HashMap<String, ColumnInfo>,
) -> Vec<&'a FlatRow> {
    if filters.is_empty() {
        return rows.iter().collect();
    }

    rows.iter()
        .filter(|row| {
            filters.iter().all(|(name, filter)| {
                if !columns.contains_key(name) {
                    return true;
                }
                filter.matches(row.get(name))
            })
        })
        .collect()
}
