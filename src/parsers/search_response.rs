use serde::Deserialize;

use crate::models::Repository;

/// Body of `GET /search/repositories`. Only `items` is consumed.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Option<Vec<Repository>>,
}

/// Parse a repository search response body into its items.
///
/// A body without `items` (or with `"items": null`) yields an empty list.
pub fn parse_search_response(body: &str) -> serde_json::Result<Vec<Repository>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response.items.unwrap_or_default())
}
