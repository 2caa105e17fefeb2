//! Mock HTTP transport for testing.
//!
//! Provides a configurable mock transport that can return predefined
//! responses, errors, or stream chunks, and records every request for
//! verification in tests.

use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::traits::{ByteChunks, Headers, Response, Transport, TransportError};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET, POST, or PUT)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body (for POST/PUT requests)
    pub body: Option<String>,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a buffered response
    Success(Response),
    /// Return a transport error
    Error(TransportError),
    /// Return a sequence of stream chunks
    Stream(Vec<Bytes>),
    /// Return an error from the streaming call
    StreamError(TransportError),
}

impl MockResponse {
    /// Shorthand for a 200 response with a JSON body.
    pub fn json(body: &str) -> Self {
        MockResponse::Success(Response::new(200, Bytes::copy_from_slice(body.as_bytes())))
    }

    /// Shorthand for a status-only response with a plain body.
    pub fn status(status: u16, body: &str) -> Self {
        MockResponse::Success(Response::new(
            status,
            Bytes::copy_from_slice(body.as_bytes()),
        ))
    }
}

/// Mock transport for testing.
///
/// Responses are keyed by URL; each URL holds a queue so successive calls to
/// the same endpoint can observe different payloads (e.g. a status poll that
/// advances). The last queued response is sticky: once the queue is down to
/// one entry it is replayed indefinitely.
///
/// # Example
///
/// ```ignore
/// use fal::adapters::mock::{MockResponse, MockTransport};
///
/// let mock = MockTransport::new();
/// mock.push_response(
///     "https://queue.fal.run/fal-ai/flux/dev",
///     MockResponse::json(r#"{"request_id":"req-1"}"#),
/// );
///
/// // ... drive the client, then verify:
/// let requests = mock.requests();
/// assert_eq!(requests.len(), 1);
/// assert_eq!(requests[0].method, "POST");
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<String, VecDeque<MockResponse>>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
    /// Create a new mock transport with no configured responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for a specific URL.
    ///
    /// Queued responses for the same URL are consumed in order; the last one
    /// is replayed for any further requests.
    pub fn push_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.entry(url.to_string()).or_default().push_back(response);
    }

    /// Replace all queued responses for a URL with a single one.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), VecDeque::from([response]));
    }

    /// Set a fallback response for URLs without a specific match.
    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Count recorded requests whose URL contains the given fragment.
    pub fn request_count_matching(&self, fragment: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.contains(fragment))
            .count()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn record(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }

    fn next_response(&self, url: &str) -> Option<MockResponse> {
        let mut responses = self.responses.lock().unwrap();

        // Exact match first, then prefix match.
        let key = if responses.contains_key(url) {
            Some(url.to_string())
        } else {
            responses
                .keys()
                .find(|pattern| url.starts_with(pattern.as_str()))
                .cloned()
        };

        if let Some(key) = key {
            let queue = responses.get_mut(&key).expect("key just looked up");
            let response = if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            };
            return response;
        }

        self.default_response.lock().unwrap().clone()
    }

    fn respond(&self, url: &str) -> Result<Response, TransportError> {
        match self.next_response(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Stream(_)) | Some(MockResponse::StreamError(_)) => Err(
                TransportError::Other("stream response on buffered request".to_string()),
            ),
            None => Err(TransportError::Other(format!(
                "no mock response for URL: {url}"
            ))),
        }
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("requests", &self.requests.lock().unwrap().len())
            .finish_non_exhaustive()
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str, headers: &Headers) -> Result<Response, TransportError> {
        self.record("GET", url, headers, None);
        self.respond(url)
    }

    fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, TransportError> {
        self.record("POST", url, headers, Some(body.to_string()));
        self.respond(url)
    }

    fn put(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, TransportError> {
        self.record("PUT", url, headers, Some(body.to_string()));
        self.respond(url)
    }

    fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteChunks, TransportError> {
        self.record("POST", url, headers, Some(body.to_string()));

        match self.next_response(url) {
            Some(MockResponse::Stream(chunks)) => Ok(Box::new(chunks.into_iter().map(Ok))),
            Some(MockResponse::StreamError(err)) => Err(err),
            Some(MockResponse::Success(_)) | Some(MockResponse::Error(_)) => Err(
                TransportError::Other("buffered response on stream request".to_string()),
            ),
            None => Err(TransportError::Other(format!(
                "no mock response for URL: {url}"
            ))),
        }
    }
}
