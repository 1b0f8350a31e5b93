//! Bulk export of the current result set as a JSON document

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{EnhancedRepository, SearchMode, SimilarityMetrics};
use crate::utils::paths::write_atomic;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub query: String,
    pub search_type: SearchMode,
    pub timestamp: DateTime<Utc>,
    pub repositories: Vec<ExportedRepository>,
}

/// Reduced per-repository projection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedRepository {
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub stars: u64,
    pub forks: u64,
    pub language: Option<String>,
    pub similarity: SimilarityMetrics,
}

impl From<&EnhancedRepository> for ExportedRepository {
    fn from(repo: &EnhancedRepository) -> Self {
        let r = &repo.repository;
        Self {
            name: r.full_name.clone(),
            description: r.description.clone(),
            url: r.html_url.clone(),
            stars: r.stargazers_count,
            forks: r.forks_count,
            language: r.language.clone(),
            similarity: repo.similarity,
        }
    }
}

pub fn build_export(
    query: &str,
    mode: SearchMode,
    repositories: &[EnhancedRepository],
    now: DateTime<Utc>,
) -> ExportDocument {
    ExportDocument {
        query: query.to_string(),
        search_type: mode,
        timestamp: now,
        repositories: repositories.iter().map(ExportedRepository::from).collect(),
    }
}

/// `github-search-{query}-{epoch ms}.json`, whitespace runs in the query become `-`
pub fn export_filename(query: &str, now: DateTime<Utc>) -> String {
    let slug = query
        .split_whitespace()
        .map(|word| word.replace(['/', '\\', ':'], "-"))
        .collect::<Vec<_>>()
        .join("-");
    format!("github-search-{}-{}.json", slug, now.timestamp_millis())
}

/// Write the document as pretty JSON into `dir`, returning the file path
pub fn write_export(dir: &Path, document: &ExportDocument) -> Result<PathBuf> {
    let path = dir.join(export_filename(&document.query, document.timestamp));
    let json = serde_json::to_string_pretty(document).context("Failed to serialize export")?;
    write_atomic(&path, json.as_bytes())?;
    log::info!("Exported {} repositories to {}", document.repositories.len(), path.display());
    Ok(path)
}
