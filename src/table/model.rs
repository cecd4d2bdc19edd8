//! The `Table` model: the full pipeline from a parsed JSON value to a
//! derived view
//!
//! The table owns the flattened rows, the sorted column set, and the column
//! metadata, all computed eagerly from the source value. Views are derived
//! on demand from a [`ViewState`]; deriving the same view twice yields the
//! same result, so callers are free to recompute on every change.

use crate::table::analyze::analyze_columns;
use crate::table::filter::filter_rows;
use crate::table::flatten::{extract_columns, flatten_value};
use crate::table::types::{ColumnInfo, FlatRow, TableError};
use crate::table::view::{group_rows, paginate, Group, PageView, ViewState};
use serde_json::Value;
use std::collections::HashMap;

/// A flattened, analyzed table built from one JSON document
#[derive(Debug)]
pub struct Table {
    rows: Vec<FlatRow>,
    columns: Vec<String>,
    column_info: HashMap<String, ColumnInfo>,
}

/// The derived view model: what a renderer consumes
#[derive(Debug)]
pub struct TableView<'a> {
    /// Visible columns, in the table's stable column order
    pub columns: Vec<String>,

    /// Row count before filtering
    pub total_rows: usize,

    /// Row count after filtering
    pub filtered_rows: usize,

    pub mode: ViewMode<'a>,
}

/// The two mutually exclusive presentation modes
#[derive(Debug)]
pub enum ViewMode<'a> {
    Pages(PageView<'a>),
    Groups(Vec<Group<'a>>),
}

impl Table {
    /// Build a table from a parsed JSON value.
    ///
    /// An array is treated as a collection of records and an object as a
    /// single-record collection. Anything else cannot be rendered as a table
    /// and comes back as [`TableError::NotTabular`], which callers surface
    /// as an advisory rather than a failure.
    pub fn from_value(value: &Value) -> Result<Table, TableError> {
        let records: Vec<&Value> = match value {
            Value::Array(items) => items.iter().collect(),
            Value::Object(_) => vec![value],
            _ => return Err(TableError::NotTabular),
        };

        let rows: Vec<FlatRow> = records.into_iter().map(flatten_value).collect();
        let columns = extract_columns(&rows);
        let column_info = analyze_columns(&rows, &columns);

        Ok(Table { rows, columns, column_info })
    }

    /// All flattened rows, unfiltered
    pub fn rows(&self) -> &[FlatRow] {
        &self.rows
    }

    /// The full column set, sorted lexicographically
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_info(&self) -> &HashMap<String, ColumnInfo> {
        &self.column_info
    }

    pub fn info(&self, column: &str) -> Option<&ColumnInfo> {
        self.column_info.get(column)
    }

    /// Derive the view for the given state: filter first, then either group
    /// or paginate. Pure; recomputing at any time produces identical output.
    pub fn view<'a>(&'a self, state: &ViewState) -> TableView<'a> {
        let filtered = filter_rows(&self.rows, state.filters(), &self.column_info);
        let filtered_rows = filtered.len();

        let mode = match &state.group_by {
            Some(column) => ViewMode::Groups(group_rows(&filtered, column)),
            None => ViewMode::Pages(paginate(&filtered, state.page(), state.page_size())),
        };

        TableView {
            columns: self
                .columns
                .iter()
                .filter(|c| state.is_visible(c))
                .cloned()
                .collect(),
            total_rows: self.rows.len(),
            filtered_rows,
            mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::filter::Filter;
    use crate::table::types::ColumnType;
    use serde_json::json;

    fn sample_table() -> Table {
        Table::from_value(&json!([
            {"a": 1, "b": {"c": 2}, "tag": "x"},
            {"a": 3, "b": {"c": 4}, "tag": "y"},
            {"a": 5, "b": {"c": 6}, "tag": "x"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_build_from_array() {
        let table = sample_table();
        assert_eq!(table.rows().len(), 3);
        assert_eq!(table.columns(), ["a", "b.c", "tag"]);
        assert_eq!(table.info("a").unwrap().column_type, ColumnType::Number);
    }

    #[test]
    fn test_build_from_single_object() {
        let table = Table::from_value(&json!({"a": 1, "b": {"c": 2}})).unwrap();
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.columns(), ["a", "b.c"]);
    }

    #[test]
    fn test_scalar_root_is_not_tabular() {
        assert!(matches!(
            Table::from_value(&json!(42)),
            Err(TableError::NotTabular)
        ));
        assert!(matches!(
            Table::from_value(&json!("text")),
            Err(TableError::NotTabular)
        ));
    }

    #[test]
    fn test_array_of_scalars_degrades_to_empty_rows() {
        let table = Table::from_value(&json!([1, 2, 3])).unwrap();
        assert_eq!(table.rows().len(), 3);
        assert!(table.columns().is_empty());
    }

    #[test]
    fn test_view_paginated_default() {
        let table = sample_table();
        let view = table.view(&ViewState::new());

        assert_eq!(view.total_rows, 3);
        assert_eq!(view.filtered_rows, 3);
        match view.mode {
            ViewMode::Pages(page) => {
                assert_eq!(page.page, 1);
                assert_eq!(page.total_pages, 1);
                assert_eq!(page.rows.len(), 3);
            }
            ViewMode::Groups(_) => panic!("expected paginated mode"),
        }
    }

    #[test]
    fn test_view_filters_before_grouping() {
        let table = sample_table();
        let mut state = ViewState::new();
        state.set_filter("a", Filter::number_range(Some(2.0), None));
        state.set_group_by(Some("tag".into()));

        let view = table.view(&state);
        assert_eq!(view.filtered_rows, 2);
        match view.mode {
            ViewMode::Groups(groups) => {
                // Only the filtered rows are partitioned
                assert_eq!(groups.len(), 2);
                assert_eq!(groups[0].key, "y");
                assert_eq!(groups[1].key, "x");
            }
            ViewMode::Pages(_) => panic!("expected grouped mode"),
        }
    }

    #[test]
    fn test_view_hides_columns() {
        let table = sample_table();
        let mut state = ViewState::new();
        state.set_visible("b.c", false);

        let view = table.view(&state);
        assert_eq!(view.columns, ["a", "tag"]);
    }

    #[test]
    fn test_view_recompute_is_stable() {
        let table = sample_table();
        let mut state = ViewState::new();
        state.set_filter("tag", Filter::text("x"));

        let first = table.view(&state);
        let second = table.view(&state);
        assert_eq!(first.filtered_rows, second.filtered_rows);
        assert_eq!(first.columns, second.columns);
    }
}
