//! Document query abstraction.
//!
//! The verifier never talks to a browser directly. It asks a
//! [`DocumentQuery`] whether a [`Selector`] matches in the current page.
//!
//! # Implementations
//!
//! - `ChromiumDocument` - live page over CDP (feature `browser`)
//! - [`crate::SnapshotDocument`] - offline, over a discovered element list
//! - [`MockDocument`] - scripted answers for unit tests

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

use crate::selector::Selector;

/// Answer to a single selector query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOutcome {
    /// At least one element matched
    pub found: bool,
    /// First match has a non-zero rendered box
    pub visible: bool,
    /// Tag of the first match, lower-case
    pub matched_tag: Option<String>,
    /// Number of matching elements, when the document reports it
    pub match_count: Option<usize>,
}

impl QueryOutcome {
    /// Nothing matched
    #[must_use]
    pub const fn not_found() -> Self {
        Self {
            found: false,
            visible: false,
            matched_tag: None,
            match_count: Some(0),
        }
    }

    /// A visible match with the given tag
    #[must_use]
    pub fn visible(tag: impl Into<String>) -> Self {
        Self {
            found: true,
            visible: true,
            matched_tag: Some(tag.into()),
            match_count: Some(1),
        }
    }

    /// A hidden match with the given tag
    #[must_use]
    pub fn hidden(tag: impl Into<String>) -> Self {
        Self {
            found: true,
            visible: false,
            matched_tag: Some(tag.into()),
            match_count: Some(1),
        }
    }

    /// Set the match count
    #[must_use]
    pub const fn with_match_count(mut self, count: usize) -> Self {
        self.match_count = Some(count);
        self
    }
}

/// Failures a document can report for a query
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// No live document to query
    #[error("Document unavailable")]
    Unavailable,

    /// Selector rejected by the query engine
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// Connection to the page was lost
    #[error("Document disconnected: {0}")]
    Disconnected(String),

    /// Query did not complete in time
    #[error("Query timed out: {0}")]
    Timeout(String),

    /// Query was cancelled by the caller
    #[error("Query cancelled")]
    Cancelled,

    /// Anything else the document reports
    #[error("{0}")]
    Other(String),
}

/// A document that can answer selector queries.
///
/// Implementations must not navigate or mutate the page.
#[async_trait]
pub trait DocumentQuery: Send + Sync {
    /// Query the document for a selector
    async fn query(&self, selector: &Selector) -> Result<QueryOutcome, QueryError>;
}

#[async_trait]
impl<T: DocumentQuery + ?Sized> DocumentQuery for Box<T> {
    async fn query(&self, selector: &Selector) -> Result<QueryOutcome, QueryError> {
        (**self).query(selector).await
    }
}

#[async_trait]
impl<T: DocumentQuery + ?Sized> DocumentQuery for std::sync::Arc<T> {
    async fn query(&self, selector: &Selector) -> Result<QueryOutcome, QueryError> {
        (**self).query(selector).await
    }
}

/// Raw result of the JavaScript lookup produced by
/// [`Selector::to_lookup_script`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupResponse {
    /// Match found
    #[serde(default)]
    pub found: bool,
    /// First match visible
    #[serde(default)]
    pub visible: bool,
    /// Number of matches
    #[serde(default)]
    pub count: Option<usize>,
    /// Tag of first match
    #[serde(default)]
    pub tag: Option<String>,
    /// Exception message raised by the query engine
    #[serde(default)]
    pub error: Option<String>,
}

impl LookupResponse {
    /// Convert into a query answer
    pub fn into_outcome(self) -> Result<QueryOutcome, QueryError> {
        if let Some(error) = self.error {
            return Err(if error.contains("is not a valid") || error.contains("SyntaxError") {
                QueryError::InvalidSelector(error)
            } else {
                QueryError::Other(error)
            });
        }
        Ok(QueryOutcome {
            found: self.found,
            visible: self.found && self.visible,
            matched_tag: self.tag.map(|t| t.to_lowercase()),
            match_count: self.count,
        })
    }
}

/// Mock document for unit testing
///
/// Answers are keyed by [`Selector::selector_text`]; unknown selectors are
/// reported as not found.
#[derive(Debug, Default)]
pub struct MockDocument {
    answers: HashMap<String, Result<QueryOutcome, QueryError>>,
    fallback: Option<Result<QueryOutcome, QueryError>>,
    call_history: Mutex<Vec<String>>,
}

impl MockDocument {
    /// Create new mock document
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer a selector with an outcome
    #[must_use]
    pub fn with_answer(mut self, selector: &Selector, outcome: QueryOutcome) -> Self {
        self.answers.insert(selector.selector_text(), Ok(outcome));
        self
    }

    /// Answer a selector with an error
    #[must_use]
    pub fn with_error(mut self, selector: &Selector, error: QueryError) -> Self {
        self.answers.insert(selector.selector_text(), Err(error));
        self
    }

    /// Answer every unscripted selector the same way
    #[must_use]
    pub fn with_fallback(mut self, answer: Result<QueryOutcome, QueryError>) -> Self {
        self.fallback = Some(answer);
        self
    }

    /// Selector texts queried so far, in order
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.call_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of queries issued
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.call_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl DocumentQuery for MockDocument {
    async fn query(&self, selector: &Selector) -> Result<QueryOutcome, QueryError> {
        let key = selector.selector_text();
        self.call_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(key.clone());
        self.answers
            .get(&key)
            .or(self.fallback.as_ref())
            .cloned()
            .unwrap_or_else(|| Ok(QueryOutcome::not_found()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod outcome_tests {
        use super::*;

        #[test]
        fn test_constructors() {
            assert!(!QueryOutcome::not_found().found);
            let visible = QueryOutcome::visible("button");
            assert!(visible.found && visible.visible);
            let hidden = QueryOutcome::hidden("input").with_match_count(3);
            assert!(hidden.found && !hidden.visible);
            assert_eq!(hidden.match_count, Some(3));
        }

        #[test]
        fn test_error_display() {
            assert_eq!(QueryError::Unavailable.to_string(), "Document unavailable");
            assert!(QueryError::Timeout("5s".into()).to_string().contains("5s"));
        }
    }

    mod lookup_response_tests {
        use super::*;

        #[test]
        fn test_lookup_found() {
            let raw = serde_json::json!({"found": true, "visible": true, "count": 2, "tag": "BUTTON", "error": null});
            let response: LookupResponse = serde_json::from_value(raw).unwrap();
            let outcome = response.into_outcome().unwrap();
            assert_eq!(outcome.matched_tag.as_deref(), Some("button"));
            assert_eq!(outcome.match_count, Some(2));
        }

        #[test]
        fn test_lookup_hidden_only_when_found() {
            let response: LookupResponse =
                serde_json::from_value(serde_json::json!({"found": false, "visible": true}))
                    .unwrap();
            assert!(!response.into_outcome().unwrap().visible);
        }

        #[test]
        fn test_lookup_error_classification() {
            let invalid = LookupResponse {
                error: Some("'##x' is not a valid selector".to_string()),
                ..LookupResponse::default()
            };
            assert!(matches!(
                invalid.into_outcome(),
                Err(QueryError::InvalidSelector(_))
            ));
            let other = LookupResponse {
                error: Some("boom".to_string()),
                ..LookupResponse::default()
            };
            assert_eq!(other.into_outcome(), Err(QueryError::Other("boom".into())));
        }
    }

    mod mock_tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_answers_and_history() {
            let submit = Selector::css("#submit");
            let doc = MockDocument::new()
                .with_answer(&submit, QueryOutcome::visible("button"))
                .with_error(&Selector::css("##"), QueryError::InvalidSelector("##".into()));

            assert!(doc.query(&submit).await.unwrap().found);
            assert!(!doc.query(&Selector::css("#other")).await.unwrap().found);
            assert!(doc.query(&Selector::css("##")).await.is_err());
            assert_eq!(doc.history(), vec!["#submit", "#other", "##"]);
            assert_eq!(doc.call_count(), 3);
        }

        #[tokio::test]
        async fn test_mock_fallback() {
            let doc = MockDocument::new().with_fallback(Err(QueryError::Unavailable));
            assert_eq!(
                doc.query(&Selector::text("x")).await,
                Err(QueryError::Unavailable)
            );
        }

        #[tokio::test]
        async fn test_boxed_document() {
            let doc: Box<dyn DocumentQuery> = Box::new(
                MockDocument::new().with_answer(&Selector::label("Search"), QueryOutcome::hidden("input")),
            );
            assert!(doc.query(&Selector::label("Search")).await.unwrap().found);
        }
    }
}
