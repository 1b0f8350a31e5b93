use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Branch used for archive links when the API omits `default_branch`
const FALLBACK_BRANCH: &str = "main";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    #[serde(default)]
    pub spdx_id: Option<String>,
}

/// A repository item from the GitHub search API.
///
/// Only `id`, `name`, `full_name` and `html_url` are required; everything else
/// falls back to a default so partially populated items still deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub clone_url: String,
    #[serde(default)]
    pub owner: Owner,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub license: Option<License>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
}

impl Repository {
    /// Archive and page links offered for download
    pub fn download_urls(&self) -> DownloadUrls {
        let branch = self
            .default_branch
            .as_deref()
            .filter(|b| !b.is_empty())
            .unwrap_or(FALLBACK_BRANCH);

        DownloadUrls {
            zip: format!("{}/archive/refs/heads/{}.zip", self.html_url, branch),
            html: self.html_url.clone(),
        }
    }
}

impl AsRef<Repository> for Repository {
    fn as_ref(&self) -> &Repository {
        self
    }
}

/// Mock similarity scores shown next to each result.
///
/// These are pseudo-random placeholders generated at fetch time (see
/// `crate::search::similarity`). They are not computed against anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityMetrics {
    pub content_similarity: u8,
    pub requirement_similarity: u8,
    pub working_similarity: u8,
    pub purpose_similarity: u8,
    pub semantic_similarity: u8,
    pub overall_similarity: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadUrls {
    pub zip: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedRepository {
    #[serde(flatten)]
    pub repository: Repository,
    pub similarity: SimilarityMetrics,
    pub download_urls: DownloadUrls,
}

impl AsRef<Repository> for EnhancedRepository {
    fn as_ref(&self) -> &Repository {
        &self.repository
    }
}
