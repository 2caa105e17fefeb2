//! SSE (Server-Sent Events) stream handling.
//!
//! Parses the standard SSE line grammar used by fal.run streaming
//! endpoints:
//! - `event: <name>` - event name line
//! - `data: <json>` - data payload line(s), joined with newlines
//! - `id: <id>` / `retry: <ms>` - bookkeeping fields
//! - Empty line - signals end of event
//! - Lines starting with `:` - comments (ignored)
//!
//! # Module structure
//! - `decoder` - the stateful line-to-event decoder ([`SseDecoder`])
//! - `stream` - chunk-boundary-tolerant stream consumer ([`EventStream`])

mod decoder;
mod stream;

pub use decoder::{SseDecoder, SseEvent};
pub use stream::EventStream;
