//! # Flatview - JSON Table Shaping
//!
//! A library for turning arbitrary nested JSON into a flat, typed,
//! filterable, groupable, paginated table, with snapshot persistence over a
//! small key-value interface.
//!
//! ## Modules
//!
//! - **table**: the data-shaping pipeline (flatten, analyze, filter, view)
//! - **store**: named snapshots and preferences behind a `KvStore` trait
//!
//! ## Quick Start
//!
//! ### Building a table
//!
//! ```rust
//! use flatview::table::{Table, ViewState, ViewMode, Filter};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), flatview::table::TableError> {
//! let data = json!([
//!     {"a": 1, "b": {"c": 2}},
//!     {"a": 3, "b": {"c": 4}}
//! ]);
//!
//! let table = Table::from_value(&data)?;
//! assert_eq!(table.columns(), ["a", "b.c"]);
//!
//! let mut state = ViewState::new();
//! state.set_filter("a", Filter::number_range(Some(2.0), None));
//!
//! let view = table.view(&state);
//! assert_eq!(view.filtered_rows, 1);
//! # Ok(())
//! # }
//! ```
//!
//! ### Saving snapshots
//!
//! ```rust
//! use flatview::store::{MemoryStore, Snapshots};
//! use serde_json::json;
//!
//! let mut snapshots = Snapshots::new(MemoryStore::new());
//! let item = snapshots.save(json!({"a": 1}), "my data").unwrap();
//! assert_eq!(snapshots.load().unwrap().id, item.id);
//! ```

pub mod store;
pub mod table;

// Re-export commonly used types for convenience
pub use store::{KvStore, MemoryStore, Snapshots, StorageItem, StoreError};
pub use table::{
    ColumnInfo, ColumnType, Filter, FilterMap, FlatRow, Table, TableError, TableView, ViewMode,
    ViewState,
};
