//! Live locator verification.
//!
//! One selector, one query. The verifier maps whatever the document reports
//! onto a [`CheckStatus`] and never raises for a failing locator.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::driver::{DocumentQuery, QueryError};
use crate::locator::Confidence;
use crate::selector::Selector;

/// Outcome category of a single locator check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckStatus {
    /// Locator matched an element
    Success,
    /// Locator matched nothing
    NotFound,
    /// Query failed (invalid selector, timeout, disconnect)
    AmbiguousOrError,
    /// No document was available to query
    Skipped,
}

impl CheckStatus {
    /// Whether the check passed
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Whether the check failed and is eligible for correction
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::NotFound | Self::AmbiguousOrError)
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::NotFound => "not_found",
            Self::AmbiguousOrError => "error",
            Self::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// Result of verifying one selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// Element found
    pub found: bool,
    /// Element visible
    pub visible: bool,
    /// Tag of the matched element
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_tag: Option<String>,
    /// Error reported by the document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Number of elements the selector matched, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_count: Option<usize>,
    /// Status category
    pub status: CheckStatus,
    /// Verified confidence
    pub confidence: Confidence,
}

impl VerificationResult {
    /// Result for a check that could not run
    #[must_use]
    pub fn skipped() -> Self {
        Self {
            found: false,
            visible: false,
            matched_tag: None,
            error_message: Some(QueryError::Unavailable.to_string()),
            match_count: None,
            status: CheckStatus::Skipped,
            confidence: Confidence::Low,
        }
    }

    /// Result for a locator that could not be queried at all
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::failed(CheckStatus::AmbiguousOrError, Some(message.into()))
    }

    fn failed(status: CheckStatus, error: Option<String>) -> Self {
        Self {
            found: false,
            visible: false,
            matched_tag: None,
            error_message: error,
            match_count: None,
            status,
            confidence: Confidence::Low,
        }
    }
}

/// Verifies selectors against an injected document
#[derive(Clone, Copy)]
pub struct LiveVerifier<'a> {
    document: Option<&'a dyn DocumentQuery>,
    hidden_is_success: bool,
}

impl fmt::Debug for LiveVerifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveVerifier")
            .field("has_document", &self.document.is_some())
            .field("hidden_is_success", &self.hidden_is_success)
            .finish()
    }
}

impl<'a> LiveVerifier<'a> {
    /// Verifier over a live document
    #[must_use]
    pub const fn new(document: &'a dyn DocumentQuery) -> Self {
        Self {
            document: Some(document),
            hidden_is_success: true,
        }
    }

    /// Verifier with no document; every check is skipped
    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            document: None,
            hidden_is_success: true,
        }
    }

    /// Treat hidden matches as failures instead of medium-confidence passes
    #[must_use]
    pub const fn with_hidden_as_success(mut self, hidden_is_success: bool) -> Self {
        self.hidden_is_success = hidden_is_success;
        self
    }

    /// Whether a document is attached
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.document.is_some()
    }

    /// Verify a selector with exactly one document query
    pub async fn verify(&self, selector: &Selector) -> VerificationResult {
        let Some(document) = self.document else {
            debug!(selector = %selector, "no document attached, skipping");
            return VerificationResult::skipped();
        };

        let result = match document.query(selector).await {
            Err(QueryError::Unavailable) => VerificationResult::skipped(),
            Err(err) => VerificationResult::failed(CheckStatus::AmbiguousOrError, Some(err.to_string())),
            Ok(outcome) if !outcome.found => VerificationResult::failed(CheckStatus::NotFound, None),
            Ok(outcome) => {
                let (status, confidence, error_message) = if outcome.visible {
                    (CheckStatus::Success, Confidence::High, None)
                } else if self.hidden_is_success {
                    (CheckStatus::Success, Confidence::Medium, None)
                } else {
                    (
                        CheckStatus::NotFound,
                        Confidence::Low,
                        Some("Element matched but is not visible".to_string()),
                    )
                };
                if let Some(count) = outcome.match_count.filter(|&n| n > 1) {
                    warn!(selector = %selector, count, "selector matches more than one element");
                }
                VerificationResult {
                    found: true,
                    visible: outcome.visible,
                    matched_tag: outcome.matched_tag,
                    error_message,
                    match_count: outcome.match_count,
                    status,
                    confidence,
                }
            }
        };

        debug!(
            selector = %selector,
            status = %result.status,
            confidence = ?result.confidence,
            "verified selector"
        );
        result
    }
}
