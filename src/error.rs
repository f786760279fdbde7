use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TryOnError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Source image unavailable ({uri}): {reason}")]
    SourceImageUnavailable { uri: String, reason: String },

    #[error("Generation API did not respond within {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Generation failed after {attempts} attempt(s): {source}")]
    GenerationFailed {
        attempts: u32,
        #[source]
        source: Box<TryOnError>,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl TryOnError {
    /// Only failures that may resolve by waiting are retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TryOnError::Timeout(_) | TryOnError::TransportError(_))
    }

    pub(crate) fn source_unavailable(uri: &str, reason: impl Into<String>) -> Self {
        TryOnError::SourceImageUnavailable {
            uri: uri.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TryOnError>;
