use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::storage::KeyValueStorage;
use crate::models::{SearchHistoryEntry, SearchMode};

/// Storage key holding the serialized history list
pub const SEARCH_HISTORY_KEY: &str = "github-search-history";
/// Maximum number of entries kept
pub const MAX_HISTORY_ITEMS: usize = 10;

/// Bounded, most-recent-first search history.
///
/// All operations are best-effort: storage failures are logged and the
/// operation becomes a no-op (or yields an empty list for reads).
pub struct HistoryStore {
    storage: Box<dyn KeyValueStorage>,
    key: String,
}

impl HistoryStore {
    pub fn new(storage: Box<dyn KeyValueStorage>) -> Self {
        Self { storage, key: SEARCH_HISTORY_KEY.to_string() }
    }

    /// Record a completed search at the current time
    pub fn save(&mut self, query: &str, result_count: usize, mode: SearchMode) {
        self.save_at(query, result_count, mode, Utc::now());
    }

    /// Record a completed search with an explicit timestamp (millisecond precision is kept)
    pub fn save_at(
        &mut self,
        query: &str,
        result_count: usize,
        mode: SearchMode,
        now: DateTime<Utc>,
    ) {
        let timestamp = DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now);
        let entry = SearchHistoryEntry {
            id: Uuid::now_v7().to_string(),
            query: query.to_string(),
            timestamp,
            result_count,
            search_mode: mode,
        };

        let mut history = self.load();
        history.retain(|item| item.query != query);
        history.insert(0, entry);
        history.truncate(MAX_HISTORY_ITEMS);

        self.write(&history);
    }

    /// Load entries, most recent first. Missing or corrupt storage yields an empty list.
    pub fn load(&self) -> Vec<SearchHistoryEntry> {
        let stored = match self.storage.get(&self.key) {
            Ok(Some(stored)) => stored,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::error!("Failed to load search history: {:#}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<SearchHistoryEntry>>(&stored) {
            Ok(history) => history,
            Err(e) => {
                log::error!("Failed to load search history: {}", e);
                Vec::new()
            }
        }
    }

    /// Remove one entry by id. Returns whether an entry was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let mut history = self.load();
        let before = history.len();
        history.retain(|item| item.id != id);

        if history.len() == before {
            return false;
        }
        self.write(&history);
        true
    }

    /// Remove the stored history entirely
    pub fn clear(&mut self) {
        if let Err(e) = self.storage.remove(&self.key) {
            log::error!("Failed to clear search history: {:#}", e);
        }
    }

    fn write(&mut self, history: &[SearchHistoryEntry]) {
        let serialized = match serde_json::to_string(history) {
            Ok(serialized) => serialized,
            Err(e) => {
                log::error!("Failed to save search history: {}", e);
                return;
            }
        };

        if let Err(e) = self.storage.set(&self.key, &serialized) {
            log::error!("Failed to save search history: {:#}", e);
        }
    }
}
