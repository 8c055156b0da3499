//! Error types for the core library

use thiserror::Error;

/// Error type for core operations
///
/// The reconstruction, lookup and drift operations never return errors for
/// data-shape problems; they degrade to empty results instead. Errors only
/// surface from strict parsing and validation entry points.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration value out of range or rule table malformed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input that cannot be interpreted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON decoding failure
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl CoreError {
    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
