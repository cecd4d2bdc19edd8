//! Snapshot persistence over a small key-value interface
//!
//! The consuming application hands the table layer a [`KvStore`] rather than
//! reaching for ambient storage. On top of it, [`Snapshots`] keeps one
//! current document, a history list capped at the ten most recent saves, and
//! the column-visibility preference.
//!
//! Load paths degrade: absent or malformed stored data reads back as absent,
//! never as an error. Save paths do report failures, and quota exhaustion is
//! distinguishable from other storage faults.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

const CURRENT_KEY: &str = "uploaded_json_data";
const HISTORY_KEY: &str = "upload_history";
const VISIBLE_COLUMNS_KEY: &str = "table_visible_columns";

/// Maximum number of history entries; saving an eleventh evicts the oldest
pub const HISTORY_LIMIT: usize = 10;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("failed to serialize stored value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Minimal key-value storage interface, the shape of a browser-local store
pub trait KvStore {
    fn put(&mut self, key: &str, value: &str) -> StoreResult<()>;
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn remove(&mut self, key: &str) -> StoreResult<()>;
}

/// In-memory [`KvStore`] with an optional byte quota.
///
/// Used by the CLIs and tests; the quota makes quota-exceeded handling
/// exercisable without a real constrained store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        MemoryStore {
            entries: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Total bytes held across keys and values
    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl KvStore for MemoryStore {
    fn put(&mut self, key: &str, value: &str) -> StoreResult<()> {
        if let Some(quota) = self.quota_bytes {
            let existing = self.entries.get(key).map(|v| v.len() + key.len()).unwrap_or(0);
            let after = self.used_bytes() - existing + key.len() + value.len();
            if after > quota {
                return Err(StoreError::QuotaExceeded);
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One persisted snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageItem {
    pub id: String,
    pub data: Value,
    /// Creation time, milliseconds since the Unix epoch
    pub timestamp: u64,
    pub name: String,
    /// Serialized byte size of the payload
    pub size: usize,
}

/// Storage usage summary
#[derive(Debug, Clone, Copy)]
pub struct StoreUsage {
    pub used_bytes: usize,
}

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn generate_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let n = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{:x}-{:x}", millis, n)
}

/// Named-snapshot storage: current document, capped history, and the
/// column-visibility preference
pub struct Snapshots<S: KvStore> {
    store: S,
}

impl<S: KvStore> Snapshots<S> {
    pub fn new(store: S) -> Self {
        Snapshots { store }
    }

    /// Save a snapshot as the current document and prepend it to the
    /// history, evicting the oldest entry past [`HISTORY_LIMIT`].
    pub fn save(&mut self, data: Value, name: impl Into<String>) -> StoreResult<StorageItem> {
        let serialized_data = serde_json::to_string(&data)?;
        let item = StorageItem {
            id: generate_id(),
            size: serialized_data.len(),
            data,
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0),
            name: name.into(),
        };

        self.store.put(CURRENT_KEY, &serde_json::to_string(&item)?)?;

        let mut history = self.history();
        history.insert(0, item.clone());
        history.truncate(HISTORY_LIMIT);
        self.store.put(HISTORY_KEY, &serde_json::to_string(&history)?)?;

        Ok(item)
    }

    /// The current document, or `None` when absent or unreadable
    pub fn load(&self) -> Option<StorageItem> {
        let text = self.store.get(CURRENT_KEY).ok().flatten()?;
        serde_json::from_str(&text).ok()
    }

    pub fn clear(&mut self) -> StoreResult<()> {
        self.store.remove(CURRENT_KEY)
    }

    /// All history entries, newest first; unreadable history reads as empty
    pub fn history(&self) -> Vec<StorageItem> {
        self.store
            .get(HISTORY_KEY)
            .ok()
            .flatten()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default()
    }

    pub fn history_item(&self, id: &str) -> Option<StorageItem> {
        self.history().into_iter().find(|item| item.id == id)
    }

    pub fn delete_history_item(&mut self, id: &str) -> StoreResult<()> {
        let history: Vec<StorageItem> = self
            .history()
            .into_iter()
            .filter(|item| item.id != id)
            .collect();
        self.store.put(HISTORY_KEY, &serde_json::to_string(&history)?)
    }

    pub fn clear_history(&mut self) -> StoreResult<()> {
        self.store.remove(HISTORY_KEY)
    }

    /// Load the column-visibility preference. Absent, malformed, or failed
    /// reads all come back as the empty map, which the view treats as
    /// "all columns visible".
    pub fn load_column_visibility(&self) -> HashMap<String, bool> {
        self.store
            .get(VISIBLE_COLUMNS_KEY)
            .ok()
            .flatten()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default()
    }

    pub fn save_column_visibility(&mut self, visible: &HashMap<String, bool>) -> StoreResult<()> {
        self.store
            .put(VISIBLE_COLUMNS_KEY, &serde_json::to_string(visible)?)
    }

    pub fn usage(&self) -> StoreUsage
    where
        S: UsageReport,
    {
        StoreUsage {
            used_bytes: self.store.report_used_bytes(),
        }
    }
}

/// Stores that can report how much space they hold
pub trait UsageReport {
    fn report_used_bytes(&self) -> usize;
}

impl UsageReport for MemoryStore {
    fn report_used_bytes(&self) -> usize {
        self.used_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_save_and_load_roundtrip() {
        let mut snapshots = Snapshots::new(MemoryStore::new());
        let saved = snapshots.save(json!({"a": 1}), "first").unwrap();

        let loaded = snapshots.load().unwrap();
        assert_eq!(loaded.id, saved.id);
        assert_eq!(loaded.name, "first");
        assert_eq!(loaded.data, json!({"a": 1}));
        assert_eq!(loaded.size, r#"{"a":1}"#.len());
    }

    #[test]
    fn test_load_absent_is_none() {
        let snapshots = Snapshots::new(MemoryStore::new());
        assert!(snapshots.load().is_none());
    }

    #[test]
    fn test_load_malformed_is_none() {
        let mut store = MemoryStore::new();
        store.put(CURRENT_KEY, "{not json").unwrap();
        let snapshots = Snapshots::new(store);
        assert!(snapshots.load().is_none());
    }

    #[test]
    fn test_history_newest_first() {
        let mut snapshots = Snapshots::new(MemoryStore::new());
        snapshots.save(json!(1), "one").unwrap();
        snapshots.save(json!(2), "two").unwrap();

        let history = snapshots.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].name, "two");
        assert_eq!(history[1].name, "one");
    }

    #[test]
    fn test_history_capped_at_limit() {
        let mut snapshots = Snapshots::new(MemoryStore::new());
        for i in 0..HISTORY_LIMIT + 3 {
            snapshots.save(json!(i), format!("item-{}", i)).unwrap();
        }

        let history = snapshots.history();
        assert_eq!(history.len(), HISTORY_LIMIT);
        // Newest kept, oldest evicted
        assert_eq!(history[0].name, "item-12");
        assert_eq!(history[HISTORY_LIMIT - 1].name, "item-3");
    }

    #[test]
    fn test_history_item_lookup_and_delete() {
        let mut snapshots = Snapshots::new(MemoryStore::new());
        let a = snapshots.save(json!("a"), "a").unwrap();
        let b = snapshots.save(json!("b"), "b").unwrap();

        assert_eq!(snapshots.history_item(&a.id).unwrap().name, "a");

        snapshots.delete_history_item(&a.id).unwrap();
        assert!(snapshots.history_item(&a.id).is_none());
        assert!(snapshots.history_item(&b.id).is_some());
    }

    #[test]
    fn test_clear_current_keeps_history() {
        let mut snapshots = Snapshots::new(MemoryStore::new());
        snapshots.save(json!(1), "one").unwrap();
        snapshots.clear().unwrap();

        assert!(snapshots.load().is_none());
        assert_eq!(snapshots.history().len(), 1);
    }

    #[test]
    fn test_quota_exceeded_is_distinct() {
        let mut snapshots = Snapshots::new(MemoryStore::with_quota(16));
        let err = snapshots
            .save(json!({"big": "payload that will not fit"}), "x")
            .unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded));
    }

    #[test]
    fn test_visibility_defaults_to_empty_map() {
        let snapshots = Snapshots::new(MemoryStore::new());
        assert!(snapshots.load_column_visibility().is_empty());
    }

    #[test]
    fn test_visibility_malformed_reads_as_empty() {
        let mut store = MemoryStore::new();
        store.put(VISIBLE_COLUMNS_KEY, "][").unwrap();
        let snapshots = Snapshots::new(store);
        assert!(snapshots.load_column_visibility().is_empty());
    }

    #[test]
    fn test_visibility_roundtrip() {
        let mut snapshots = Snapshots::new(MemoryStore::new());
        let mut prefs = HashMap::new();
        prefs.insert("a".to_string(), false);
        prefs.insert("b.c".to_string(), true);
        snapshots.save_column_visibility(&prefs).unwrap();

        assert_eq!(snapshots.load_column_visibility(), prefs);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let mut snapshots = Snapshots::new(MemoryStore::new());
        let a = snapshots.save(json!(1), "a").unwrap();
        let b = snapshots.save(json!(2), "b").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_usage_reports_bytes() {
        let mut snapshots = Snapshots::new(MemoryStore::new());
        assert_eq!(snapshots.usage().used_bytes, 0);
        snapshots.save(json!({"a": 1}), "x").unwrap();
        assert!(snapshots.usage().used_bytes > 0);
    }
}
