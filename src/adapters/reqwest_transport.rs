//! Reqwest-based blocking HTTP transport.
//!
//! This module provides the production transport implementation using
//! reqwest's blocking client, implementing the [`Transport`] trait from
//! `crate::traits`. Every call blocks the calling thread until the network
//! round-trip completes; streaming responses are surfaced as a blocking
//! chunk iterator.

use bytes::Bytes;
use std::io::Read;
use std::time::Duration;

use crate::traits::{ByteChunks, Headers, Response, Transport, TransportError};

/// Size of the read buffer used when pulling chunks off a streaming body.
const STREAM_CHUNK_SIZE: usize = 8 * 1024;

/// Blocking HTTP transport backed by `reqwest::blocking::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Create a transport with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;
        Ok(Self { client })
    }

    /// Create a transport wrapping a preconfigured reqwest client.
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying reqwest client.
    pub fn inner(&self) -> &reqwest::blocking::Client {
        &self.client
    }

    fn convert_error(err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            TransportError::InvalidUrl(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }

    fn convert_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    fn apply_headers(
        builder: reqwest::blocking::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::blocking::RequestBuilder {
        let mut builder = builder;
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        builder
    }

    fn buffered(response: reqwest::blocking::Response) -> Result<Response, TransportError> {
        let status = response.status().as_u16();
        let response_headers = Self::convert_headers(response.headers());
        let body = response.bytes().map_err(Self::convert_error)?;
        Ok(Response::with_headers(status, response_headers, body))
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str, headers: &Headers) -> Result<Response, TransportError> {
        let builder = Self::apply_headers(self.client.get(url), headers);
        let response = builder.send().map_err(Self::convert_error)?;
        Self::buffered(response)
    }

    fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, TransportError> {
        let builder = Self::apply_headers(self.client.post(url).body(body.to_string()), headers);
        let response = builder.send().map_err(Self::convert_error)?;
        Self::buffered(response)
    }

    fn put(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, TransportError> {
        let builder = Self::apply_headers(self.client.put(url).body(body.to_string()), headers);
        let response = builder.send().map_err(Self::convert_error)?;
        Self::buffered(response)
    }

    fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteChunks, TransportError> {
        let builder = Self::apply_headers(self.client.post(url).body(body.to_string()), headers);
        let response = builder.send().map_err(Self::convert_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().unwrap_or_else(|_| "unknown error".to_string());
            return Err(TransportError::Status { status, message });
        }

        Ok(Box::new(ChunkReader {
            response,
            finished: false,
        }))
    }
}

/// Pulls fixed-size chunks off a blocking response body.
struct ChunkReader {
    response: reqwest::blocking::Response,
    finished: bool,
}

impl Iterator for ChunkReader {
    type Item = Result<Bytes, TransportError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let mut buf = [0u8; STREAM_CHUNK_SIZE];
        match self.response.read(&mut buf) {
            Ok(0) => {
                self.finished = true;
                None
            }
            Ok(n) => Some(Ok(Bytes::copy_from_slice(&buf[..n]))),
            Err(e) => {
                self.finished = true;
                Some(Err(TransportError::Io(e.to_string())))
            }
        }
    }
}
