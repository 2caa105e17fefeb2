//! HTTP client for the fal APIs.
//!
//! [`Client`] owns the configuration and a [`Transport`], builds URLs
//! against the three base URLs (queue, sync, platform API), attaches the
//! `Authorization: Key` header, maps non-success statuses onto the error
//! taxonomy, and decodes JSON bodies. All higher-level types
//! ([`Request`](crate::Request), [`Model`](crate::Model), ...) go through
//! this one boundary.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::adapters::ReqwestTransport;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::traits::{ByteChunks, Headers, Response, Transport};

/// Client for the fal queue, sync, and platform APIs.
///
/// Cloning is cheap; clones share the same transport. Nothing else is
/// shared: each operation is a plain blocking call on the calling thread.
#[derive(Clone)]
pub struct Client {
    config: Config,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("queue_base", &self.config.queue_base)
            .field("api_base", &self.config.api_base)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client with the production reqwest transport.
    pub fn new(config: Config) -> Result<Self> {
        let transport = ReqwestTransport::new(config.request_timeout)
            .map_err(|e| Error::Configuration(e.to_string()))?;
        Ok(Self {
            config,
            transport: Arc::new(transport),
        })
    }

    /// Create a client from [`Config::from_env`] (reads `FAL_KEY`).
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env())
    }

    /// Create a client with an injected transport.
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    // Queue API (queue.fal.run)

    pub(crate) fn queue_post(&self, path: &str, payload: &Value) -> Result<Value> {
        self.post_json(&self.queue_url(path), payload)
    }

    pub(crate) fn queue_get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        self.get_json(&with_query(self.queue_url(path), query))
    }

    pub(crate) fn queue_put(&self, path: &str) -> Result<Value> {
        let url = self.queue_url(path);
        debug!(url = %url, "PUT");
        let response = self
            .transport
            .put(&url, "{}", &self.json_headers())
            .map_err(Error::from)?;
        self.decode(response, &url)
    }

    // Platform API (api.fal.ai/v1)

    pub(crate) fn api_get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        self.get_json(&with_query(self.api_url(path), query))
    }

    pub(crate) fn api_post(&self, path: &str, payload: &Value) -> Result<Value> {
        self.post_json(&self.api_url(path), payload)
    }

    // Sync API (fal.run), SSE streaming

    /// Open a `text/event-stream` POST against the sync base and return the
    /// raw chunk sequence. A non-success status is mapped onto the error
    /// taxonomy before any chunk is yielded.
    pub(crate) fn stream_post(&self, path: &str, payload: &Value) -> Result<ByteChunks> {
        let url = format!("{}{}", self.config.sync_base, path);
        let body = serde_json::to_string(payload)?;

        let mut headers = Headers::new();
        self.authorize(&mut headers);
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());
        headers.insert("Cache-Control".to_string(), "no-store".to_string());

        debug!(url = %url, "POST (stream)");
        self.transport
            .post_stream(&url, &body, &headers)
            .map_err(Error::from)
    }

    // Helpers

    fn queue_url(&self, path: &str) -> String {
        format!("{}{}", self.config.queue_base, path)
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base, path)
    }

    fn json_headers(&self) -> Headers {
        let mut headers = Headers::new();
        self.authorize(&mut headers);
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers
    }

    fn authorize(&self, headers: &mut Headers) {
        if let Some(key) = &self.config.api_key {
            headers.insert("Authorization".to_string(), format!("Key {key}"));
        }
    }

    fn get_json(&self, url: &str) -> Result<Value> {
        debug!(url = %url, "GET");
        let mut headers = Headers::new();
        self.authorize(&mut headers);
        headers.insert("Accept".to_string(), "application/json".to_string());
        let response = self.transport.get(url, &headers).map_err(Error::from)?;
        self.decode(response, url)
    }

    fn post_json(&self, url: &str, payload: &Value) -> Result<Value> {
        debug!(url = %url, "POST");
        let body = serde_json::to_string(payload)?;
        let response = self
            .transport
            .post(url, &body, &self.json_headers())
            .map_err(Error::from)?;
        self.decode(response, url)
    }

    /// Map the status onto the error taxonomy, then parse the body as JSON.
    /// An empty body decodes to `Value::Null`.
    fn decode(&self, response: Response, url: &str) -> Result<Value> {
        let text = response
            .text()
            .map_err(|e| Error::Decode(format!("response body is not UTF-8: {e}")))?;

        if !response.is_success() {
            warn!(url = %url, status = response.status, "request failed");
            return Err(Error::from_status(response.status, text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(Error::from)
    }
}

/// Append an `application/x-www-form-urlencoded` query string to a URL.
/// Repeated keys are kept, matching how batched lookups are encoded.
fn with_query(url: String, query: &[(&str, String)]) -> String {
    if query.is_empty() {
        return url;
    }
    let encoded: Vec<String> = query
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect();
    format!("{}?{}", url, encoded.join("&"))
}
