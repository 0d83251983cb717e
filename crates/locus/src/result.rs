//! Result and error types for Locus.

use thiserror::Error;

/// Result type for Locus operations
pub type LocusResult<T> = Result<T, LocusError>;

/// Errors that can occur in Locus
///
/// Failures of individual locators are never errors: they are recorded in a
/// [`crate::VerificationReport`]. Only artifact-level problems and I/O reach
/// this type.
#[derive(Debug, Error)]
pub enum LocusError {
    /// Generated code could not be interpreted
    #[error("Syntax error at line {line}, column {column}: {message}")]
    SyntaxInvalid {
        /// Error message
        message: String,
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
    },

    /// Element index not present in the element store
    #[error("Element {index} not found in the element store")]
    ElementNotFound {
        /// Requested element index
        index: usize,
    },

    /// Invalid configuration value
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("Page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl LocusError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
