//! Mock implementations for testing.
//!
//! Provides a configurable [`MockTransport`] that records every request and
//! plays back canned responses or stream chunks, enabling tests without
//! network access.

pub mod transport;

pub use transport::{MockResponse, MockTransport, RecordedRequest};
