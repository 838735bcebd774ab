//! Error types for qa2tex operations.
//!
//! This module defines the main error type [`Qa2TexError`] which represents
//! all possible errors that can occur while fetching a question page,
//! extracting its fields, and transpiling post bodies.
//!
//! # Example
//!
//! ```rust
//! use qa2tex_core::{Qa2TexError, Result};
//!
//! fn parse_votes(text: &str) -> Result<i32> {
//!     text.trim()
//!         .parse()
//!         .map_err(|_| Qa2TexError::InvalidVoteCount { text: text.to_string() })
//! }
//! # assert_eq!(parse_votes(" 42 ").unwrap(), 42);
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for extraction and transpilation.
///
/// Failures fall into three classes: transport failures (the page or an
/// image is unreachable), structural failures (an expected element is
/// missing or holds unexpected text), and image materialization failures.
/// The last class never escapes the transpiler; it is recovered with a
/// placeholder image.
#[derive(Error, Debug)]
pub enum Qa2TexError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and non-success status codes such as a 404 page.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The input could not be turned into a question link.
    #[error("Invalid question reference: {0}")]
    InvalidQuestionRef(String),

    /// HTML parsing errors, including invalid CSS selectors.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// An element the page layout promises was not found.
    ///
    /// `field` names the model field being resolved, `selector` the last
    /// strategy that was attempted.
    #[error("Missing element for {field} (tried {selector})")]
    MissingElement { field: String, selector: String },

    /// Vote count text that is not an integer.
    #[error("Invalid vote count: {text:?}")]
    InvalidVoteCount { text: String },

    /// The streaming rewriter rejected the fragment.
    #[error("Failed to rewrite markup: {0}")]
    RewriteError(String),

    /// An image could not be materialized locally.
    #[error("Image unavailable: {url} ({reason})")]
    ImageUnavailable { url: String, reason: String },

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// A value could not be serialized.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// File read/write errors.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Qa2TexError {
    /// Whether this error comes from the network or the filesystem rather
    /// than from the page structure.
    ///
    /// The two classes abort extraction identically; only the log template
    /// differs.
    pub fn is_transport(&self) -> bool {
        match self {
            #[cfg(feature = "fetch")]
            Qa2TexError::HttpError(_) => true,
            Qa2TexError::Timeout { .. } | Qa2TexError::IoError(_) | Qa2TexError::FileNotFound(_) => true,
            _ => false,
        }
    }

    pub(crate) fn missing(field: &str, selector: impl Into<String>) -> Self {
        Qa2TexError::MissingElement { field: field.to_string(), selector: selector.into() }
    }
}

/// Result type alias for Qa2TexError.
pub type Result<T> = std::result::Result<T, Qa2TexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Qa2TexError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_missing_element_display() {
        let err = Qa2TexError::missing("question title", "div#question-header");
        let message = err.to_string();
        assert!(message.contains("question title"));
        assert!(message.contains("div#question-header"));
    }

    #[test]
    fn test_vote_count_error() {
        let err = Qa2TexError::InvalidVoteCount { text: "abc".to_string() };
        assert!(err.to_string().contains("\"abc\""));
    }

    #[test]
    fn test_serialization_error() {
        let err: Qa2TexError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, Qa2TexError::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization failed"));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_transport_classification() {
        assert!(Qa2TexError::Timeout { timeout: 30 }.is_transport());
        assert!(Qa2TexError::FileNotFound(PathBuf::from("q.html")).is_transport());
        assert!(!Qa2TexError::InvalidVoteCount { text: "x".into() }.is_transport());
        assert!(!Qa2TexError::missing("votes", "div.js-vote-count").is_transport());
    }
}
