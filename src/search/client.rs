//! GitHub repository search client
//!
//! One unauthenticated `GET /search/repositories` per call. There is no retry,
//! no caching and no rate-limit detection: any non-success status is reported
//! as a single [`FetchError::Status`].

use futures::future::BoxFuture;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::config::Config;
use crate::models::Repository;
use crate::parsers::parse_search_response;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch repositories (HTTP {status})")]
    Status { status: StatusCode },

    #[error("failed to fetch repositories: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse search response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Anything that can answer a built GitHub search query string.
///
/// Implemented by [`GitHubClient`]; tests substitute in-memory sources.
pub trait RepositorySource: Send + Sync {
    fn search<'a>(&'a self, query_string: &'a str) -> BoxFuture<'a, Result<Vec<Repository>, FetchError>>;
}

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_base_url: String,
    user_agent: String,
}

impl GitHubClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_http_client(http, &config.api_base_url, &config.user_agent))
    }

    /// Use a preconfigured HTTP client (custom proxy or TLS settings)
    pub fn with_http_client(http: Client, api_base_url: &str, user_agent: &str) -> Self {
        Self {
            http,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    pub fn search_url(&self, query_string: &str) -> String {
        format!("{}/search/repositories?q={}", self.api_base_url, query_string)
    }

    /// Run a search and return the raw result items
    pub async fn search_repositories(&self, query_string: &str) -> Result<Vec<Repository>, FetchError> {
        let url = self.search_url(query_string);
        log::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, GITHUB_ACCEPT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }

        let body = response.text().await?;
        let repositories = parse_search_response(&body)?;
        log::debug!("Search returned {} repositories", repositories.len());
        Ok(repositories)
    }
}

impl RepositorySource for GitHubClient {
    fn search<'a>(&'a self, query_string: &'a str) -> BoxFuture<'a, Result<Vec<Repository>, FetchError>> {
        Box::pin(self.search_repositories(query_string))
    }
}
