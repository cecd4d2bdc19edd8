//! Tabular data shaping: flatten nested JSON into typed, filterable,
//! groupable, paginated rows
//!
//! The pipeline runs in a fixed order: flatten each record, take the union
//! of keys as the column set, analyze each column, filter, then group or
//! paginate. Every stage is a pure function of its inputs.

pub mod analyze;
pub mod filter;
pub mod flatten;
pub mod model;
pub mod types;
pub mod view;

pub use analyze::analyze_columns;
pub use filter::{filter_rows, BoolFilter, Filter, FilterMap};
pub use flatten::{extract_columns, flatten_value};
pub use model::{Table, TableView, ViewMode};
pub use types::{cell_text, ColumnInfo, ColumnType, FlatRow, TableError};
pub use view::{
    group_rows, paginate, Group, PageView, ViewState, DEFAULT_PAGE_SIZE, EMPTY_GROUP_KEY,
    PAGE_SIZES,
};
