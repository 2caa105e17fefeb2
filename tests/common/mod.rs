//! Common test utilities for integration tests.
//!
//! Provides a client wired to a [`MockTransport`](fal::adapters::mock::MockTransport)
//! plus small helpers for building mock URLs and SSE bodies.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::sync::Arc;

use fal::adapters::mock::MockTransport;
use fal::{Client, Config};

/// Build a client backed by the given mock transport, with default base
/// URLs and a test API key. Initializes logging on first use so failing
/// tests can be rerun with `RUST_LOG=fal=debug`.
pub fn test_client(mock: &MockTransport) -> Client {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let config = Config {
        api_key: Some("test-key".to_string()),
        ..Config::default()
    };
    Client::with_transport(config, Arc::new(mock.clone()))
}

/// URL under the queue base.
pub fn queue_url(path: &str) -> String {
    format!("https://queue.fal.run{path}")
}

/// URL under the sync (streaming) base.
pub fn sync_url(path: &str) -> String {
    format!("https://fal.run{path}")
}

/// URL under the platform API base.
pub fn api_url(path: &str) -> String {
    format!("https://api.fal.ai/v1{path}")
}

/// One SSE event body: `data: <json>` plus the terminating blank line.
pub fn sse_event(data: &str) -> String {
    format!("data: {data}\n\n")
}
