//! Concrete implementations of trait abstractions.
//!
//! This module provides the production adapter implementing the
//! [`Transport`](crate::traits::Transport) trait, plus test doubles.
//!
//! # Adapters
//!
//! - [`ReqwestTransport`] - blocking HTTP transport using reqwest
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides a test double:
//! - [`mock::MockTransport`] - configurable responses and stream chunks,
//!   records every request for verification

pub mod mock;
pub mod reqwest_transport;

pub use mock::MockTransport;
pub use reqwest_transport::ReqwestTransport;
