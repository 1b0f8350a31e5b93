//! In-memory `RepositorySource` for unit tests

use std::collections::HashMap;
use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::StatusCode;

use super::client::{FetchError, RepositorySource};
use crate::models::Repository;

/// Responses keyed by the encoded query (text before the first `&`).
/// Unknown queries succeed immediately with no results.
#[derive(Default)]
pub struct MockSource {
    responses: HashMap<String, (Duration, Result<Vec<Repository>, StatusCode>)>,
}

impl MockSource {
    pub fn with(
        mut self,
        query: &str,
        delay_ms: u64,
        result: Result<Vec<Repository>, StatusCode>,
    ) -> Self {
        self.responses.insert(query.to_string(), (Duration::from_millis(delay_ms), result));
        self
    }
}

impl RepositorySource for MockSource {
    fn search<'a>(
        &'a self,
        query_string: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Repository>, FetchError>> {
        Box::pin(async move {
            let key = query_string.split('&').next().unwrap_or_default();
            let (delay, result) =
                self.responses.get(key).cloned().unwrap_or((Duration::ZERO, Ok(Vec::new())));
            tokio::time::sleep(delay).await;
            result.map_err(|status| FetchError::Status { status })
        })
    }
}

/// `owner/{name}` repositories with increasing stars
pub fn repos(names: &[(&str, Option<&str>)]) -> Vec<Repository> {
    names
        .iter()
        .enumerate()
        .map(|(i, (name, language))| {
            serde_json::from_value(serde_json::json!({
                "id": i,
                "name": name,
                "full_name": format!("owner/{}", name),
                "html_url": format!("https://github.com/owner/{}", name),
                "stargazers_count": 10 * (i + 1),
                "forks_count": i,
                "language": language,
            }))
            .unwrap()
        })
        .collect()
}
