//! Grouping and pagination over the filtered row set, plus the view state
//! that drives them
//!
//! Both derivations are pure functions of their inputs; the caller recomputes
//! them whenever the rows, filters, group column, page, or page size change.

use crate::table::filter::{Filter, FilterMap};
use crate::table::types::{cell_text, FlatRow};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Selectable page sizes
pub const PAGE_SIZES: [usize; 4] = [25, 50, 100, 200];

pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Group key used for rows with a missing or null value in the group column
pub const EMPTY_GROUP_KEY: &str = "(empty)";

/// One page of the filtered row set
#[derive(Debug)]
pub struct PageView<'a> {
    pub rows: Vec<&'a FlatRow>,

    /// 1-based page number as requested
    pub page: usize,

    pub page_size: usize,

    /// At least 1, even over an empty row set
    pub total_pages: usize,

    /// Number of filtered rows across all pages
    pub total_rows: usize,

    /// Half-open row range `[start, end)` this page covers
    pub start: usize,
    pub end: usize,
}

/// One bucket of the grouped view
#[derive(Debug)]
pub struct Group<'a> {
    /// Stringified group column value, or `(empty)` for missing values
    pub key: String,
    pub rows: Vec<&'a FlatRow>,
}

/// Slice one page out of the filtered rows.
///
/// The slice is clamped to the available rows; a page past the end yields an
/// empty page rather than an error.
pub fn paginate<'a>(rows: &[&'a FlatRow], page: usize, page_size: usize) -> PageView<'a> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total_rows = rows.len();
    let total_pages = (total_rows.div_ceil(page_size)).max(1);

    let start = ((page - 1) * page_size).min(total_rows);
    let end = (start + page_size).min(total_rows);

    PageView {
        rows: rows[start..end].to_vec(),
        page,
        page_size,
        total_pages,
        total_rows,
        start,
        end,
    }
}

/// Partition the filtered rows by the stringified value of one column.
///
/// Groups come back in the order their keys are first encountered while
/// scanning the rows top to bottom; rows keep their relative order inside
/// each group.
pub fn group_rows<'a>(rows: &[&'a FlatRow], column: &str) -> Vec<Group<'a>> {
    let mut groups: Vec<Group<'a>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let key = match row.get(column) {
            None | Some(Value::Null) => EMPTY_GROUP_KEY.to_string(),
            Some(value) => cell_text(value),
        };

        match index.get(&key) {
            Some(&i) => groups[i].rows.push(row),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group { key, rows: vec![row] });
            }
        }
    }

    groups
}

/// User-owned view state for one table session.
///
/// Mutations that change the filtered row set reset the page to 1; the group
/// and pagination modes are mutually exclusive, arbitrated by `group_by`.
#[derive(Debug, Clone)]
pub struct ViewState {
    visible: HashMap<String, bool>,
    collapsed: HashSet<String>,
    filters: FilterMap,
    pub group_by: Option<String>,
    page: usize,
    page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        ViewState {
            visible: HashMap::new(),
            collapsed: HashSet::new(),
            filters: FilterMap::new(),
            group_by: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Start from a persisted column-visibility preference
    pub fn with_visibility(visible: HashMap<String, bool>) -> Self {
        ViewState { visible, ..Self::new() }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Changing the page size also returns to page 1, so the current page
    /// can never end up past the new last page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn filters(&self) -> &FilterMap {
        &self.filters
    }

    pub fn set_filter(&mut self, column: impl Into<String>, filter: Filter) {
        self.filters.insert(column.into(), filter);
        self.page = 1;
    }

    pub fn remove_filter(&mut self, column: &str) {
        if self.filters.remove(column).is_some() {
            self.page = 1;
        }
    }

    pub fn clear_filters(&mut self) {
        if !self.filters.is_empty() {
            self.filters.clear();
            self.page = 1;
        }
    }

    /// Select or clear the group-by column. The page is left alone; the
    /// paginated mode resumes where it was when grouping is cleared.
    pub fn set_group_by(&mut self, column: Option<String>) {
        self.group_by = column;
    }

    /// Columns with no recorded preference are visible
    pub fn is_visible(&self, column: &str) -> bool {
        self.visible.get(column).copied().unwrap_or(true)
    }

    pub fn set_visible(&mut self, column: impl Into<String>, visible: bool) {
        self.visible.insert(column.into(), visible);
    }

    pub fn set_all_visible(&mut self, columns: &[String], visible: bool) {
        for column in columns {
            self.visible.insert(column.clone(), visible);
        }
    }

    pub fn visibility(&self) -> &HashMap<String, bool> {
        &self.visible
    }

    /// Groups default to expanded until explicitly collapsed
    pub fn is_group_expanded(&self, key: &str) -> bool {
        !self.collapsed.contains(key)
    }

    pub fn toggle_group(&mut self, key: &str) {
        if !self.collapsed.remove(key) {
            self.collapsed.insert(key.to_string());
        }
    }
}
