//! Search session: owns the state of one search view and sequences fetches.
//!
//! Every search gets a sequence number. Starting a new search aborts the
//! in-flight task, and any outcome that still arrives with an older sequence
//! is discarded, so a slow earlier response can never overwrite a newer one.
//!
//! Fetches run on a tokio runtime; outcomes come back over an unbounded
//! channel. Event loops call [`SearchSession::poll`] each tick, async callers
//! await [`SearchSession::next_event`].

use std::sync::Arc;
use std::time::Instant;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;

use super::client::{FetchError, RepositorySource};
use super::query::build_github_search_query;
use super::similarity::enhance_repositories;
use super::validation::{QueryValidation, ValidationError, check_search_query, validate_search_query};
use crate::history::HistoryStore;
use crate::metrics::{calculate_language_stats, calculate_search_metrics};
use crate::models::{
    EnhancedRepository, LanguageStats, SearchHistoryEntry, SearchMetrics, SearchMode,
};

/// The only failure message shown to users; details go to the log
pub const SEARCH_FAILED_MESSAGE: &str = "Failed to search repositories. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Completed { query: String, count: usize, search_time_ms: u64, refreshed: bool },
    Failed { query: String, message: String, refreshed: bool },
}

#[derive(Debug)]
struct SearchOutcome {
    sequence: u64,
    query: String,
    mode: SearchMode,
    refreshed: bool,
    search_time_ms: u64,
    result: Result<Vec<EnhancedRepository>, FetchError>,
}

pub struct SearchSession {
    source: Arc<dyn RepositorySource>,
    runtime: Handle,
    history_store: HistoryStore,
    history: Vec<SearchHistoryEntry>,
    query: String,
    mode: SearchMode,
    searched_query: Option<String>,
    repositories: Vec<EnhancedRepository>,
    metrics: Option<SearchMetrics>,
    language_stats: Vec<LanguageStats>,
    status: SearchStatus,
    sequence: u64,
    in_flight: Option<JoinHandle<()>>,
    outcome_tx: UnboundedSender<SearchOutcome>,
    outcome_rx: UnboundedReceiver<SearchOutcome>,
}

impl SearchSession {
    pub fn new(source: Arc<dyn RepositorySource>, runtime: Handle, history_store: HistoryStore) -> Self {
        let (outcome_tx, outcome_rx) = unbounded_channel();
        let history = history_store.load();

        Self {
            source,
            runtime,
            history_store,
            history,
            query: String::new(),
            mode: SearchMode::default(),
            searched_query: None,
            repositories: Vec::new(),
            metrics: None,
            language_stats: Vec::new(),
            status: SearchStatus::Idle,
            sequence: 0,
            in_flight: None,
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query_mut(&mut self) -> &mut String {
        &mut self.query
    }

    /// Inline validation of the current input
    pub fn validation(&self) -> QueryValidation {
        check_search_query(&self.query)
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) -> SearchMode {
        self.mode = self.mode.toggled();
        self.mode
    }

    pub fn status(&self) -> &SearchStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }

    /// Query of the most recently started search
    pub fn searched_query(&self) -> Option<&str> {
        self.searched_query.as_deref()
    }

    pub fn repositories(&self) -> &[EnhancedRepository] {
        &self.repositories
    }

    pub fn metrics(&self) -> Option<&SearchMetrics> {
        self.metrics.as_ref()
    }

    pub fn language_stats(&self) -> &[LanguageStats] {
        &self.language_stats
    }

    pub fn history(&self) -> &[SearchHistoryEntry] {
        &self.history
    }

    /// Validate the current input and start searching for it
    pub fn submit(&mut self) -> Result<u64, ValidationError> {
        validate_search_query(&self.query)?;
        Ok(self.start(self.query.clone(), false))
    }

    /// Replace the input with `query` and submit it
    pub fn search(&mut self, query: &str) -> Result<u64, ValidationError> {
        self.query = query.to_string();
        self.submit()
    }

    /// Re-run the last search. Returns `None` when nothing has been searched yet.
    pub fn refresh(&mut self) -> Option<u64> {
        let query = self.searched_query.clone().filter(|q| !q.trim().is_empty())?;
        Some(self.start(query, true))
    }

    /// Abort the in-flight search, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
            // Invalidate anything the aborted task may already have sent
            self.sequence += 1;
            self.status =
                if self.metrics.is_some() { SearchStatus::Ready } else { SearchStatus::Idle };
        }
    }

    pub fn clear_history(&mut self) {
        self.history_store.clear();
        self.history = self.history_store.load();
    }

    pub fn remove_history_entry(&mut self, id: &str) -> bool {
        let removed = self.history_store.remove(id);
        self.history = self.history_store.load();
        removed
    }

    /// Apply every outcome that has arrived so far, without blocking
    pub fn poll(&mut self) -> Vec<SearchEvent> {
        let mut events = Vec::new();
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            if let Some(event) = self.apply(outcome) {
                events.push(event);
            }
        }
        events
    }

    /// Wait for the next current (non-stale) outcome.
    ///
    /// Only meaningful while a search is in flight; otherwise this waits forever.
    pub async fn next_event(&mut self) -> Option<SearchEvent> {
        loop {
            let outcome = self.outcome_rx.recv().await?;
            if let Some(event) = self.apply(outcome) {
                return Some(event);
            }
        }
    }

    fn start(&mut self, query: String, refreshed: bool) -> u64 {
        self.sequence += 1;
        let sequence = self.sequence;

        if let Some(previous) = self.in_flight.take() {
            log::debug!("Aborting superseded search before #{}", sequence);
            previous.abort();
        }

        self.status = SearchStatus::Loading;
        self.searched_query = Some(query.clone());

        let source = Arc::clone(&self.source);
        let outcome_tx = self.outcome_tx.clone();
        let mode = self.mode;

        log::info!("Search #{} started: {:?} ({})", sequence, query, mode);
        self.in_flight = Some(self.runtime.spawn(async move {
            let started = Instant::now();
            let query_string = build_github_search_query(&query, mode);
            let result = source
                .search(&query_string)
                .await
                .map(|repositories| enhance_repositories(repositories, &mut rand::thread_rng()));
            let search_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

            let outcome = SearchOutcome { sequence, query, mode, refreshed, search_time_ms, result };
            // Receiver is gone only when the session was dropped
            let _ = outcome_tx.send(outcome);
        }));

        sequence
    }

    fn apply(&mut self, outcome: SearchOutcome) -> Option<SearchEvent> {
        if outcome.sequence != self.sequence {
            log::debug!(
                "Discarding stale response for search #{} (current #{})",
                outcome.sequence,
                self.sequence
            );
            return None;
        }
        self.in_flight = None;

        match outcome.result {
            Ok(repositories) => {
                let count = repositories.len();
                self.metrics = Some(calculate_search_metrics(&repositories, outcome.search_time_ms));
                self.language_stats = calculate_language_stats(&repositories);
                self.repositories = repositories;
                self.status = SearchStatus::Ready;

                self.history_store.save(&outcome.query, count, outcome.mode);
                self.history = self.history_store.load();

                log::info!(
                    "Search #{} completed: {} repositories in {}ms",
                    outcome.sequence,
                    count,
                    outcome.search_time_ms
                );
                Some(SearchEvent::Completed {
                    query: outcome.query,
                    count,
                    search_time_ms: outcome.search_time_ms,
                    refreshed: outcome.refreshed,
                })
            }
            Err(e) => {
                log::error!("Search error for {:?}: {}", outcome.query, e);
                self.status = SearchStatus::Failed(SEARCH_FAILED_MESSAGE.to_string());
                Some(SearchEvent::Failed {
                    query: outcome.query,
                    message: SEARCH_FAILED_MESSAGE.to_string(),
                    refreshed: outcome.refreshed,
                })
            }
        }
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::StatusCode;

    use super::*;
    use crate::history::MemoryStorage;
    use crate::search::testing::{MockSource, repos};

    fn session(source: MockSource) -> SearchSession {
        SearchSession::new(
            Arc::new(source),
            Handle::current(),
            HistoryStore::new(Box::new(MemoryStorage::new())),
        )
    }

    async fn next(session: &mut SearchSession) -> SearchEvent {
        tokio::time::timeout(Duration::from_secs(5), session.next_event())
            .await
            .expect("search did not finish")
            .expect("channel closed")
    }

    #[tokio::test]
    async fn test_submit_rejects_invalid_query_without_searching() {
        let mut session = session(MockSource::default());
        session.set_query("x");

        assert_eq!(session.submit(), Err(ValidationError::TooShort));
        assert_eq!(session.status(), &SearchStatus::Idle);
        assert!(session.searched_query().is_none());
        assert!(!session.validation().is_valid);
    }

    #[tokio::test]
    async fn test_successful_search_updates_state_and_history() {
        let source = MockSource::default().with(
            "rust",
            0,
            Ok(repos(&[("a", Some("Rust")), ("b", Some("Rust")), ("c", Some("C"))])),
        );
        let mut session = session(source);

        session.search("rust").unwrap();
        assert!(session.is_loading());

        let event = next(&mut session).await;
        assert!(matches!(event, SearchEvent::Completed { count: 3, refreshed: false, .. }));
        assert_eq!(session.status(), &SearchStatus::Ready);
        assert_eq!(session.repositories().len(), 3);

        let metrics = session.metrics().unwrap();
        assert_eq!(metrics.total_repositories, 3);
        assert_eq!(metrics.most_popular_language, "Rust");
        assert_eq!(session.language_stats()[0].count, 2);

        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].query, "rust");
        assert_eq!(session.history()[0].result_count, 3);
    }

    #[tokio::test]
    async fn test_results_are_decorated() {
        let source = MockSource::default().with("zig", 0, Ok(repos(&[("zls", Some("Zig"))])));
        let mut session = session(source);

        session.search("zig").unwrap();
        next(&mut session).await;

        let repo = &session.repositories()[0];
        assert!((80..=100).contains(&repo.similarity.overall_similarity));
        assert_eq!(repo.download_urls.zip, "https://github.com/owner/zls/archive/refs/heads/main.zip");
    }

    #[tokio::test]
    async fn test_failure_sets_generic_error_and_skips_history() {
        let source = MockSource::default().with("broken", 0, Err(StatusCode::FORBIDDEN));
        let mut session = session(source);

        session.search("broken").unwrap();
        let event = next(&mut session).await;

        assert_eq!(
            event,
            SearchEvent::Failed {
                query: "broken".to_string(),
                message: SEARCH_FAILED_MESSAGE.to_string(),
                refreshed: false,
            }
        );
        assert_eq!(session.status(), &SearchStatus::Failed(SEARCH_FAILED_MESSAGE.to_string()));
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_newer_search_wins_over_slower_older_one() {
        let source = MockSource::default()
            .with("slow", 200, Ok(repos(&[("old", None)])))
            .with("fast", 0, Ok(repos(&[("new1", None), ("new2", None)])));
        let mut session = session(source);

        session.search("slow").unwrap();
        session.search("fast").unwrap();

        let event = next(&mut session).await;
        assert!(matches!(event, SearchEvent::Completed { ref query, count: 2, .. } if query == "fast"));

        // The superseded search never lands
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(session.poll().is_empty());
        assert_eq!(session.repositories()[0].repository.name, "new1");
        assert_eq!(session.history().len(), 1);
    }

    #[tokio::test]
    async fn test_stale_outcome_is_discarded() {
        let mut session = session(MockSource::default());
        session.sequence = 5;

        let stale = SearchOutcome {
            sequence: 4,
            query: "old".to_string(),
            mode: SearchMode::Quick,
            refreshed: false,
            search_time_ms: 1,
            result: Ok(Vec::new()),
        };

        assert!(session.apply(stale).is_none());
        assert!(session.metrics().is_none());
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_reruns_last_query() {
        let source = MockSource::default().with("serde", 0, Ok(repos(&[("serde", Some("Rust"))])));
        let mut session = session(source);

        assert!(session.refresh().is_none());

        session.search("serde").unwrap();
        next(&mut session).await;

        // Editing the input does not change what refresh re-runs
        session.set_query("something else");
        assert!(session.refresh().is_some());

        let event = next(&mut session).await;
        assert!(matches!(event, SearchEvent::Completed { ref query, refreshed: true, .. } if query == "serde"));
    }

    #[tokio::test]
    async fn test_mode_is_captured_at_start() {
        let source = MockSource::default().with("mode", 0, Ok(Vec::new()));
        let mut session = session(source);

        session.set_mode(SearchMode::Exhaustive);
        session.search("mode").unwrap();
        session.toggle_mode();
        next(&mut session).await;

        assert_eq!(session.mode(), SearchMode::Quick);
        assert_eq!(session.history()[0].search_mode, SearchMode::Exhaustive);
    }

    #[tokio::test]
    async fn test_cancel_discards_in_flight_search() {
        let source = MockSource::default().with("slow", 100, Ok(repos(&[("late", None)])));
        let mut session = session(source);

        session.search("slow").unwrap();
        session.cancel();
        assert_eq!(session.status(), &SearchStatus::Idle);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(session.poll().is_empty());
        assert!(session.repositories().is_empty());
    }

    #[tokio::test]
    async fn test_history_management() {
        let source = MockSource::default();
        let mut session = session(source);

        session.search("first").unwrap();
        next(&mut session).await;
        session.search("second").unwrap();
        next(&mut session).await;
        assert_eq!(session.history().len(), 2);

        let id = session.history()[1].id.clone();
        assert!(session.remove_history_entry(&id));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].query, "second");

        session.clear_history();
        assert!(session.history().is_empty());
    }
}
