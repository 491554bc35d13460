//! Tagged results of the outbound enrichment calls.

use super::UpstreamError;

/// Result of a single enrichment step.
///
/// Keeps "the upstream had nothing" apart from "the upstream call failed", so
/// callers can choose different placeholders for each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The upstream produced usable data.
    Found(T),
    /// The upstream answered but had no match.
    NotFound,
    /// Every attempt failed; carries the last error message.
    Failed(String),
}

impl<T> Outcome<T> {
    /// The found value, if any.
    pub fn found(self) -> Option<T> {
        match self {
            Outcome::Found(value) => Some(value),
            Outcome::NotFound | Outcome::Failed(_) => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Found(value) => Outcome::Found(f(value)),
            Outcome::NotFound => Outcome::NotFound,
            Outcome::Failed(reason) => Outcome::Failed(reason),
        }
    }
}

impl Outcome<String> {
    /// Collapses the outcome to a string, substituting the given placeholders.
    pub fn or_placeholder(self, not_found: &str, failed: &str) -> String {
        match self {
            Outcome::Found(value) => value,
            Outcome::NotFound => not_found.to_string(),
            Outcome::Failed(_) => failed.to_string(),
        }
    }
}

impl<T> From<Result<T, UpstreamError>> for Outcome<T> {
    fn from(result: Result<T, UpstreamError>) -> Self {
        match result {
            Ok(value) => Outcome::Found(value),
            Err(UpstreamError::NotFound(_)) => Outcome::NotFound,
            Err(err) => Outcome::Failed(err.to_string()),
        }
    }
}
