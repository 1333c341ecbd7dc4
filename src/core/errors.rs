//! Error types for the patlas-rs library.
//!
//! Two error classes exist with different propagation policies: fatal errors
//! (`Config`, `Io`, `Serialization`, `Internal`) surface immediately through
//! `Result`, while per-item errors (`MalformedConcept`, `Embedding`) are
//! handled where they occur — logged, counted in the run diagnostics, and
//! never allowed to abort the batch.

use std::io;

use thiserror::Error;

/// Main result type for patlas operations.
pub type Result<T> = std::result::Result<T, PatlasError>;

/// Comprehensive error type for all patlas operations.
#[derive(Error, Debug)]
pub enum PatlasError {
    /// Configuration errors; fatal, raised before any matching begins
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// A concept record missing a required field; recoverable per record
    #[error("Malformed concept record: {message}")]
    MalformedConcept {
        /// Error description
        message: String,
        /// Source file the record came from, if known
        source_path: Option<String>,
    },

    /// Embedding backend failure for one text; recoverable per text
    #[error("Embedding failure: {message}")]
    Embedding {
        /// Error description
        message: String,
        /// Leading characters of the text that failed to embed
        text_preview: Option<String>,
    },

    /// I/O errors on input or output files
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Serialization/deserialization errors on structured input files
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error description
        message: String,
    },
}

impl PatlasError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new malformed-concept error
    pub fn malformed_concept(message: impl Into<String>) -> Self {
        Self::MalformedConcept {
            message: message.into(),
            source_path: None,
        }
    }

    /// Create a new malformed-concept error with the originating file
    pub fn malformed_concept_at(
        message: impl Into<String>,
        source_path: impl Into<String>,
    ) -> Self {
        Self::MalformedConcept {
            message: message.into(),
            source_path: Some(source_path.into()),
        }
    }

    /// Create a new embedding error for a given input text
    pub fn embedding(message: impl Into<String>, text: &str) -> Self {
        Self::Embedding {
            message: message.into(),
            text_preview: Some(text.chars().take(60).collect()),
        }
    }

    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new serialization error wrapping a serde failure
    pub fn serialization(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Serialization {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error is recoverable at the item level rather than fatal
    /// for the whole run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MalformedConcept { .. } | Self::Embedding { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_formats_message() {
        let err = PatlasError::config_field("threshold out of range", "semantic_threshold");
        assert!(err.to_string().contains("threshold out of range"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn embedding_error_truncates_preview() {
        let long_text = "x".repeat(200);
        let err = PatlasError::embedding("backend unavailable", &long_text);
        match err {
            PatlasError::Embedding { text_preview, .. } => {
                assert_eq!(text_preview.unwrap().len(), 60);
            }
            _ => panic!("expected embedding error"),
        }
    }

    #[test]
    fn recoverable_classification() {
        assert!(PatlasError::malformed_concept("no name").is_recoverable());
        assert!(PatlasError::embedding("timeout", "text").is_recoverable());
        assert!(!PatlasError::internal("bug").is_recoverable());
    }
}
