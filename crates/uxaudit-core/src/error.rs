use thiserror::Error;

/// Classified failures of a single audit attempt.
///
/// Every variant is terminal for the attempt that produced it; nothing is
/// retried automatically and no partial result survives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Neither a session key nor a process default is available.
    #[error("no API key available; enter a session key before starting the audit")]
    NeedsCredential,

    /// The key-entry form was submitted with empty or whitespace-only input.
    #[error("API key must not be blank")]
    BlankCredential,

    /// No image bytes were supplied.
    #[error("telemetry data missing: no image supplied")]
    EmptyInput,

    /// The image is not one of the accepted formats.
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),

    /// The model call returned no text body.
    #[error("model returned an empty response")]
    EmptyResponse,

    /// The body is present but is not JSON or violates the response schema.
    #[error("malformed analysis payload: {reason}")]
    MalformedPayload { reason: String },

    /// An audit is already running for this workspace.
    #[error("an audit is already in flight")]
    AuditInFlight,

    /// An audit was requested before any image was loaded.
    #[error("no image loaded")]
    NoImageLoaded,
}

impl CoreError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading [`crate::AppConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
