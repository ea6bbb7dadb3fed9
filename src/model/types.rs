//! Shared error definitions for the document model.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building or generating a gateway document.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// A method, encoding or algorithm outside its allowed set.
    #[error("{kind} {value:?} is not supported")]
    InvalidEnumeration { kind: &'static str, value: String },

    /// An argument outside its accepted range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The document tree could not be encoded to JSON.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The encoded document could not be written.
    #[error("Failed to write {path:?}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GeneratorError {
    pub(crate) fn invalid(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidEnumeration {
            kind,
            value: value.into(),
        }
    }
}

/// Result type for document operations.
pub type GeneratorResult<T> = Result<T, GeneratorError>;
