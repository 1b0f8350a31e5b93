use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Minimum query length in characters
pub const MIN_QUERY_CHARS: usize = 2;
/// Maximum query length in characters
pub const MAX_QUERY_CHARS: usize = 256;

static UNSAFE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"(?i)<script", r"(?i)javascript:", r"(?i)on\w+="]
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                log::error!("Invalid unsafe-query pattern {pattern}: {e}");
                None
            }
        })
        .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Search query cannot be empty")]
    Empty,
    #[error("Search query must be at least {MIN_QUERY_CHARS} characters")]
    TooShort,
    #[error("Search query must be less than {MAX_QUERY_CHARS} characters")]
    TooLong,
    #[error("Invalid characters in search query")]
    UnsafePattern,
}

/// Inline validation view for surfaces that render `{isValid, error}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryValidation {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl From<Result<(), ValidationError>> for QueryValidation {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => Self { is_valid: true, error: None },
            Err(e) => Self { is_valid: false, error: Some(e.to_string()) },
        }
    }
}

/// Validate a raw search query. The first failing rule wins.
pub fn validate_search_query(query: &str) -> Result<(), ValidationError> {
    if query.trim().is_empty() {
        return Err(ValidationError::Empty);
    }

    // Unicode scalar values, not UTF-16 code units
    let len = query.chars().count();
    if len < MIN_QUERY_CHARS {
        return Err(ValidationError::TooShort);
    }
    if len > MAX_QUERY_CHARS {
        return Err(ValidationError::TooLong);
    }

    if UNSAFE_PATTERNS.iter().any(|re| re.is_match(query)) {
        return Err(ValidationError::UnsafePattern);
    }

    Ok(())
}

/// Same rules as [`validate_search_query`], as a result value
pub fn check_search_query(query: &str) -> QueryValidation {
    validate_search_query(query).into()
}
