//! Stream consumer for Server-Sent Events.
//!
//! [`EventStream`] drives a chunked streaming POST through the client,
//! re-assembles complete lines across arbitrary chunk boundaries, feeds them
//! to the [`SseDecoder`], and delivers decoded events to the caller's
//! callback synchronously and in arrival order. The call blocks until the
//! underlying transport call completes; there is no background delivery.

use serde_json::Value;
use tracing::debug;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::sse::{SseDecoder, SseEvent};

/// Carries an unterminated trailing line fragment across chunk boundaries.
///
/// `\r\n` and lone `\r` are normalized to line breaks while scanning, before
/// any splitting happens; a trailing `\r` is held back until the next chunk
/// reveals whether it starts a `\r\n` pair. No byte is ever lost or
/// duplicated across chunk boundaries.
#[derive(Debug, Default)]
struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    /// Append a chunk and return every complete line it closed.
    fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        let mut i = 0;
        while i < self.buf.len() {
            match self.buf[i] {
                b'\n' => {
                    lines.push(to_line(&self.buf[start..i])?);
                    i += 1;
                    start = i;
                }
                b'\r' => {
                    if i + 1 == self.buf.len() {
                        // Might be the first half of \r\n; wait for more.
                        break;
                    }
                    lines.push(to_line(&self.buf[start..i])?);
                    i += if self.buf[i + 1] == b'\n' { 2 } else { 1 };
                    start = i;
                }
                _ => i += 1,
            }
        }
        self.buf.drain(..start);

        Ok(lines)
    }
}

fn to_line(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| Error::Decode(format!("SSE line is not UTF-8: {e}")))
}

/// Consumer for one `text/event-stream` session.
///
/// Decoder and line buffer are created at stream start and discarded when
/// the session ends. Bytes buffered at end-of-stream that never formed a
/// complete line are discarded, never treated as a final event.
pub struct EventStream<'a> {
    client: &'a Client,
    path: String,
    input: Value,
}

impl<'a> EventStream<'a> {
    /// Prepare a stream session for `POST {sync_base}{path}`.
    pub fn new(client: &'a Client, path: impl Into<String>, input: Value) -> Self {
        Self {
            client,
            path: path.into(),
            input,
        }
    }

    /// Consume the stream, invoking `on_event` for every decoded event
    /// before the next line is processed. Returns the last event observed,
    /// if any.
    ///
    /// A transport failure or a decode failure mid-stream aborts the
    /// remaining consumption and propagates.
    pub fn run<F>(self, mut on_event: F) -> Result<Option<SseEvent>>
    where
        F: FnMut(&SseEvent),
    {
        let chunks = self.client.stream_post(&self.path, &self.input)?;

        let mut buffer = LineBuffer::default();
        let mut decoder = SseDecoder::new();
        let mut last = None;

        for chunk in chunks {
            let chunk = chunk.map_err(Error::from)?;
            for line in buffer.push(&chunk)? {
                if let Some(event) = decoder.decode(&line)? {
                    debug!(event = event.event.as_deref().unwrap_or(""), "SSE event");
                    on_event(&event);
                    last = Some(event);
                }
            }
        }

        Ok(last)
    }
}
