//! Trait abstractions for dependency injection and testability.
//!
//! The [`Transport`] trait is the seam between the protocol logic and the
//! HTTP layer. Production code uses the reqwest-backed adapter from
//! [`crate::adapters`]; tests inject a mock that records requests and plays
//! back canned responses and stream chunks.

pub mod transport;

pub use transport::{ByteChunks, Headers, Response, Transport, TransportError};
