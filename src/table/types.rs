use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A single flattened record: dot-delimited path -> scalar or serialized value.
///
/// Arrays are stored as their canonical JSON text (`Value::String`), never
/// recursed into. `Value::Null` entries are allowed and treated the same as
/// a missing key by the analyzer and the filter engine.
pub type FlatRow = Map<String, Value>;

/// Errors surfaced by the table pipeline
#[derive(Debug, Error)]
pub enum TableError {
    /// The source value is neither an object nor an array, so there is
    /// nothing to render as a table. Non-fatal; callers show an advisory.
    #[error("data cannot be rendered as a table")]
    NotTabular,
}

/// The inferred semantic type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Boolean,
    Date,
    Object,
    Array,
    Null,
    Mixed,
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::Object => "object",
            ColumnType::Array => "array",
            ColumnType::Null => "null",
            ColumnType::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary information for one column across all rows
#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    /// The dot-delimited path serving as the column name
    pub name: String,

    /// Primary inferred type (see analyze module for the resolution rules)
    pub column_type: ColumnType,

    /// Distinct non-null values in first-seen order
    pub unique_values: Vec<Value>,

    /// Number of distinct non-null values
    pub unique_count: usize,

    /// Number of rows where the value is null or missing
    pub null_count: usize,

    /// Minimum over numeric values, only set for number columns
    pub min: Option<f64>,

    /// Maximum over numeric values, only set for number columns
    pub max: Option<f64>,

    /// First non-null value seen for this column
    pub sample: Option<Value>,
}

/// Render a cell value the way it appears in the table.
///
/// Strings render without surrounding quotes; everything else uses its
/// canonical JSON text.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Coerce a cell value to a number for range filtering.
///
/// Numbers pass through; strings are parsed. Anything else has no numeric
/// interpretation.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Whether a cell is considered missing (absent keys are handled by callers)
pub fn is_missing(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}
