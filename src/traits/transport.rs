//! HTTP transport trait abstraction.
//!
//! Provides a trait-based abstraction over the raw HTTP operations the
//! client needs: buffered GET/POST/PUT and a chunk-streaming POST used for
//! Server-Sent Events. Implementations include the production reqwest-based
//! adapter and a mock for tests.

use bytes::Bytes;
use std::collections::HashMap;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// A blocking sequence of raw body chunks from a streaming response.
///
/// Chunks arrive in network order; pulling the next item blocks the caller
/// until the server sends more data or the stream ends.
pub type ByteChunks = Box<dyn Iterator<Item = Result<Bytes, TransportError>> + Send>;

/// HTTP response wrapper.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Response body
    pub body: Bytes,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, body: Bytes) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
        }
    }

    /// Create a new response with headers.
    pub fn with_headers(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as a string.
    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }
}

/// Errors produced by the transport layer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Connection to the server failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    /// Request timed out.
    #[error("request timed out: {0}")]
    Timeout(String),
    /// I/O failure while reading a response body.
    #[error("I/O error: {0}")]
    Io(String),
    /// The request URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// Non-success HTTP status on a streaming call, where no buffered
    /// [`Response`] can be returned.
    #[error("HTTP status {status}: {message}")]
    Status { status: u16, message: String },
    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Trait for the raw HTTP operations used by [`Client`](crate::Client).
///
/// URLs arrive fully built; header assembly, auth, status-code mapping, and
/// JSON decoding are the caller's concern. All operations block until the
/// network call completes.
pub trait Transport: Send + Sync {
    /// Perform a GET request.
    fn get(&self, url: &str, headers: &Headers) -> Result<Response, TransportError>;

    /// Perform a POST request with a JSON string body.
    fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, TransportError>;

    /// Perform a PUT request with a JSON string body.
    fn put(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, TransportError>;

    /// Perform a POST request and return the response body as raw chunks.
    ///
    /// Used for `text/event-stream` responses where the body is consumed
    /// incrementally. A non-success status is reported as
    /// [`TransportError::Status`].
    fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteChunks, TransportError>;
}
