use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SearchMode;

/// A completed search, persisted in the history store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryEntry {
    pub id: String,
    pub query: String,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub result_count: usize,
    #[serde(alias = "searchType")]
    pub search_mode: SearchMode,
}
