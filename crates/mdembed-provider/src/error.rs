//! Provider errors.

/// Error returned by entity and snippet providers.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProviderError {
    /// The issue or article does not exist or is not visible.
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// The tracker request failed.
    #[error("Request for {target} failed: {message}")]
    Request {
        /// Entity ID or snippet rule the request was for.
        target: String,
        /// Failure description.
        message: String,
    },

    /// The snippet rule threw while producing content.
    #[error("Snippet failed: {message}")]
    Snippet {
        /// Error message from the rule.
        message: String,
        /// Script stack trace, when available.
        stack: Option<String>,
    },

    /// A response body could not be parsed.
    #[error("Invalid response: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProviderError {
    /// Request failure for `target`.
    pub fn request(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Request {
            target: target.into(),
            message: message.into(),
        }
    }
}
