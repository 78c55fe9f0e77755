use serde::Serialize;
use thiserror::Error;

/// Application-wide error taxonomy for Atrium.
///
/// This is a closed set: every error surfaced by a request handler is one of
/// these kinds, and each kind has a fixed HTTP status mapping applied by the
/// server's response layer.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration load or parse failed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Missing, malformed, or expired credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Valid credentials without the required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource already exists in a conflicting state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Request was malformed before field-level validation could run
    /// (unparsable body, bad path or query parameter).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body failed field-level validation.
    #[error("Request validation failed")]
    Validation(Vec<FieldFailure>),

    /// Anything else.
    #[error("{0}")]
    Internal(String),
}

/// A single field-level validation failure.
///
/// `target` is the name of the validated request type, so clients can tell
/// which body a failure refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldFailure {
    pub target: &'static str,
    pub property: String,
    pub message: String,
}

impl FieldFailure {
    pub fn new(
        target: &'static str,
        property: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            target,
            property: property.into(),
            message: message.into(),
        }
    }
}
