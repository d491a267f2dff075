//! Error types for markward-core.

use std::path::{Path, PathBuf};

/// Result type alias for Markward operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running the rendering pipeline.
///
/// Recoverable conditions (missing front matter, nothing to sanitize, empty
/// input) are not errors and never surface through this type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The Markdown converter failed. No HTML is available for the document.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A sanitizer rule could not be compiled.
    #[error("Invalid sanitizer rule '{tag}': {reason}")]
    InvalidRule {
        /// The offending blocked-tag entry
        tag: String,
        /// Why it was rejected
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// A rendered document could not be serialized for output.
    #[error("Serialization error: {message}")]
    Serialization {
        /// What was being serialized
        message: String,
        /// Underlying serializer error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// I/O error without path context
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error on a specific file
    #[error("I/O error on {}: {source}", path.display())]
    IoWithPath {
        /// File that could not be read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Creates a conversion error with a message.
    pub fn conversion<S: Into<String>>(message: S) -> Self {
        Error::Conversion {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a conversion error with a message and source error.
    pub fn conversion_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Conversion {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an invalid sanitizer rule error.
    pub fn invalid_rule<T, R>(tag: T, reason: R) -> Self
    where
        T: Into<String>,
        R: Into<String>,
    {
        Error::InvalidRule {
            tag: tag.into(),
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates a serialization error wrapping the serializer's error.
    pub fn serialization<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Serialization {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Wraps an I/O error with the path it occurred on.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::IoWithPath {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Returns `true` if the error came from the Markdown converter.
    pub fn is_conversion(&self) -> bool {
        matches!(self, Error::Conversion { .. })
    }
}
