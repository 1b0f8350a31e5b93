//! Data models for GitHub repository search.
//!
//! This module defines the data structures used throughout the application:
//!
//! - [`Repository`] - A search result item as returned by the GitHub REST API
//! - [`EnhancedRepository`] - A repository decorated with mock similarity scores and download URLs
//! - [`SearchHistoryEntry`] - A persisted record of a completed search
//! - [`SearchMetrics`] / [`LanguageStats`] - Aggregates derived from a result set
//!
//! Timestamps in persisted history go through the custom deserializers in
//! `crate::parsers::deserializers`.

pub mod history;
pub mod repository;
pub mod search;

pub use history::SearchHistoryEntry;
pub use repository::{
    DownloadUrls, EnhancedRepository, License, Owner, Repository, SimilarityMetrics,
};
pub use search::{LanguageStats, SearchMetrics, SearchMode};
