//! Unified error type for the fal client.
//!
//! Every failure surfaces to the immediate caller; nothing is retried or
//! recovered internally. HTTP status codes are mapped onto dedicated
//! variants so callers can match on them exhaustively instead of inspecting
//! numeric codes.

use crate::traits::TransportError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by fal client operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The server rejected the credentials (HTTP 401).
    #[error("unauthorized (401): {0}")]
    Unauthorized(String),

    /// Access to the resource is forbidden (HTTP 403).
    #[error("forbidden (403): {0}")]
    Forbidden(String),

    /// The resource does not exist (HTTP 404).
    #[error("not found (404): {0}")]
    NotFound(String),

    /// Any other non-success HTTP status.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Malformed JSON in a response body or an SSE data field.
    #[error("decode error: {0}")]
    Decode(String),

    /// Connection, timeout, or I/O failure in the underlying network layer.
    #[error("transport error: {0}")]
    Transport(TransportError),

    /// Missing or invalid credentials or base URLs.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Map a non-success HTTP status and its body onto the error taxonomy.
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => Error::Unauthorized(message),
            403 => Error::Forbidden(message),
            404 => Error::NotFound(message),
            _ => Error::Server { status, message },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        match err {
            // Streaming calls report non-success statuses through the
            // transport; fold them into the same taxonomy as buffered calls.
            TransportError::Status { status, message } => Error::from_status(status, message),
            other => Error::Transport(other),
        }
    }
}
