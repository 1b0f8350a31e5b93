//! JSON parsers for GitHub search responses and persisted history
//!
//! # Error Handling Strategy
//!
//! - **Search responses**: a body that is not valid JSON is an error the caller
//!   collapses into the generic fetch failure. A valid body without `items`
//!   is simply an empty result set.
//!
//! - **History documents**: timestamps are accepted in either epoch-millisecond
//!   or RFC3339 form so older stores keep loading. A document that fails to
//!   parse is handled by the history store, which logs and treats it as empty.

pub mod deserializers;
pub mod search_response;

pub use search_response::parse_search_response;
