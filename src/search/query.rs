use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::models::SearchMode;

// Same unreserved set as JavaScript's encodeURIComponent
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Build the query string for `GET /search/repositories?q=...`
///
/// # Examples
///
/// ```
/// use github_repo_explorer::models::SearchMode;
/// use github_repo_explorer::search::build_github_search_query;
///
/// assert_eq!(
///     build_github_search_query("rust cli", SearchMode::Quick),
///     "rust%20cli&sort=stars&order=desc&per_page=20"
/// );
/// ```
pub fn build_github_search_query(query: &str, mode: SearchMode) -> String {
    let encoded = utf8_percent_encode(query, QUERY_ENCODE_SET);
    format!("{}&sort=stars&order=desc&per_page={}", encoded, mode.per_page())
}
