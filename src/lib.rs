//! GitHub Repo Explorer - search public GitHub repositories from the terminal
//!
//! The library holds the whole search pipeline so the CLI and the TUI share it:
//!
//! - Validating free-text queries before anything hits the network
//! - Building the search query string (sort by stars, mode-dependent page size)
//! - Fetching from the GitHub search API and decorating results
//! - Language statistics and aggregate metrics over a result set
//! - A bounded, persisted history of successful searches
//! - A pull-to-refresh gesture state machine driven by pointer drags
//! - JSON export and clipboard copy of results
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use github_repo_explorer::history::{HistoryStore, MemoryStorage};
//! use github_repo_explorer::{Config, GitHubClient, SearchSession};
//!
//! let runtime = tokio::runtime::Runtime::new()?;
//! let config = Config::from_env()?;
//! let client = GitHubClient::new(&config)?;
//! let history = HistoryStore::new(Box::new(MemoryStorage::new()));
//!
//! let mut session = SearchSession::new(Arc::new(client), runtime.handle().clone(), history);
//! session.search("terminal ui")?;
//! runtime.block_on(session.next_event());
//! println!("Found {} repositories", session.repositories().len());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod export;
pub mod gesture;
pub mod history;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod parsers;
pub mod search;
pub mod tui;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use metrics::{calculate_language_stats, calculate_search_metrics};
pub use models::{EnhancedRepository, Repository, SearchHistoryEntry, SearchMode};
pub use search::{
    GitHubClient, SearchSession, build_github_search_query, validate_search_query,
};
