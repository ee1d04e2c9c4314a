//! Error types for the chat client.

use std::time::Duration;
use thiserror::Error;

/// Result type for chat client operations.
pub type Result<T> = std::result::Result<T, ChatError>;

/// Chat client errors.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request did not complete within the per-call timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Network error (connection failed)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response, rate limit, unknown model)
    #[error("API error: {0}")]
    Api(String),

    /// Parse error (invalid JSON, no choices)
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_second_timeout_keeps_its_precision() {
        let err = ChatError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "Request timed out after 250ms");
    }
}
