//! The search pipeline: validate -> build query -> fetch -> decorate.
//!
//! [`SearchSession`] sequences the pipeline for interactive and one-shot use
//! and feeds completed searches to the metrics calculator and history store.

pub mod client;
pub mod query;
pub mod session;
pub mod similarity;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{FetchError, GitHubClient, RepositorySource};
pub use query::build_github_search_query;
pub use session::{SEARCH_FAILED_MESSAGE, SearchEvent, SearchSession, SearchStatus};
pub use similarity::{enhance_repositories, generate_similarity_metrics};
pub use validation::{QueryValidation, ValidationError, check_search_query, validate_search_query};
