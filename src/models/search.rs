use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Search preset controlling page size of the GitHub query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Quick,
    Exhaustive,
}

impl SearchMode {
    pub fn per_page(self) -> u8 {
        match self {
            SearchMode::Quick => 20,
            SearchMode::Exhaustive => 50,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SearchMode::Quick => SearchMode::Exhaustive,
            SearchMode::Exhaustive => SearchMode::Quick,
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Quick => write!(f, "quick"),
            SearchMode::Exhaustive => write!(f, "exhaustive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetrics {
    pub total_repositories: usize,
    pub unique_languages: usize,
    pub most_popular_language: String,
    pub average_stars: u64,
    pub average_forks: u64,
    /// Elapsed search time in milliseconds
    pub search_time: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageStats {
    pub language: String,
    pub count: usize,
    pub percentage: u32,
    pub total_stars: u64,
}
