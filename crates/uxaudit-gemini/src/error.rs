use thiserror::Error;
use uxaudit_core::CoreError;

/// Errors returned by the Gemini analysis client.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status (bad key, quota, ...).
    #[error("Gemini API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider's envelope could not be decoded.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Input, credential or payload failure classified by the core.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl GeminiError {
    /// Text for the single failure banner shown to the user. The underlying
    /// message is passed through when there is one.
    #[must_use]
    pub fn user_message(&self) -> String {
        format!("Node Failure: {self}")
    }
}
