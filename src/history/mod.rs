//! Persistent search history
//!
//! A bounded list (10 entries, most recent first, unique by query text) kept
//! under a single key of a [`KeyValueStorage`]. The default backend writes
//! `github-search-history.json` into the data directory:
//! - macOS: `~/Library/Application Support/github-repo-explorer/`
//! - Linux: `~/.local/share/github-repo-explorer/`
//! - Windows: `%APPDATA%\github-repo-explorer\`

pub mod storage;
pub mod store;

pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{HistoryStore, MAX_HISTORY_ITEMS, SEARCH_HISTORY_KEY};
