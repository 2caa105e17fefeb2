//! Incremental Server-Sent Events decoder.
//!
//! [`SseDecoder`] is the stateful leaf of the streaming pipeline: it is fed
//! one complete line at a time (no terminator) and emits a decoded
//! [`SseEvent`] whenever a blank line flushes a non-empty data accumulator.

use serde_json::Value;

use crate::error::{Error, Result};

/// A decoded server-sent event.
///
/// `data` is always present and already parsed as JSON; the remaining
/// fields are only set when the server sent the corresponding SSE lines.
#[derive(Debug, Clone, PartialEq)]
pub struct SseEvent {
    /// Parsed JSON payload from the `data:` field(s).
    pub data: Value,
    /// Event name from the `event:` field, when present.
    pub event: Option<String>,
    /// Last event id from the `id:` field, when present.
    pub id: Option<String>,
    /// Reconnection delay from the `retry:` field, when present.
    pub retry: Option<u64>,
}

/// Stateful SSE decoder.
///
/// Accumulator state is owned exclusively by one decoder instance and is
/// mutated only by [`decode`](Self::decode). A flush resets every field in
/// the same step, so no event is ever partially represented across two
/// flushes.
#[derive(Debug, Default)]
pub struct SseDecoder {
    event: String,
    data: String,
    id: Option<String>,
    retry: Option<u64>,
}

impl SseDecoder {
    /// Create a new decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one complete line (without its terminator), in arrival order.
    ///
    /// Returns `Ok(Some(event))` when a blank line flushed a complete event,
    /// `Ok(None)` when the line was consumed without emitting, and an error
    /// when the accumulated data is not valid JSON. A stray blank line with
    /// nothing accumulated emits nothing.
    pub fn decode(&mut self, line: &str) -> Result<Option<SseEvent>> {
        if line.is_empty() {
            return self.flush();
        }
        if line.starts_with(':') {
            // Comment, e.g. ":heartbeat". No state change.
            return Ok(None);
        }

        let (field, value) = line.split_once(':').unwrap_or((line, ""));
        let value = value.strip_prefix(' ').unwrap_or(value);

        match field {
            "event" => self.event = value.to_string(),
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
            }
            "id" => self.id = Some(value.to_string()),
            // Non-numeric retry values are coerced to 0, not dropped.
            "retry" => self.retry = Some(value.parse().unwrap_or(0)),
            _ => {}
        }

        Ok(None)
    }

    fn flush(&mut self) -> Result<Option<SseEvent>> {
        if self.data.is_empty() {
            return Ok(None);
        }

        // The accumulator always ends in the newline appended by the last
        // data line; trim exactly that one before parsing.
        let joined = self.data.strip_suffix('\n').unwrap_or(&self.data);
        let data: Value = serde_json::from_str(joined)
            .map_err(|e| Error::Decode(format!("invalid JSON in SSE data: {e}")))?;

        let event = SseEvent {
            data,
            event: (!self.event.is_empty()).then(|| self.event.clone()),
            id: self.id.take(),
            retry: self.retry.take(),
        };

        self.event.clear();
        self.data.clear();

        Ok(Some(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simple_event() {
        let mut decoder = SseDecoder::new();

        assert!(decoder.decode(r#"data: {"a":1}"#).unwrap().is_none());
        let event = decoder.decode("").unwrap().unwrap();

        assert_eq!(event.data, json!({"a":1}));
        assert_eq!(event.event, None);
        assert_eq!(event.id, None);
        assert_eq!(event.retry, None);
    }

    #[test]
    fn test_named_event_with_id_and_retry() {
        let mut decoder = SseDecoder::new();

        decoder.decode("event: progress").unwrap();
        decoder.decode("id: 42").unwrap();
        decoder.decode("retry: 3000").unwrap();
        decoder.decode(r#"data: {"status":"IN_PROGRESS"}"#).unwrap();

        let event = decoder.decode("").unwrap().unwrap();
        assert_eq!(event.event.as_deref(), Some("progress"));
        assert_eq!(event.id.as_deref(), Some("42"));
        assert_eq!(event.retry, Some(3000));
    }

    #[test]
    fn test_stray_blank_line_emits_nothing() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.decode("").unwrap().is_none());
        assert!(decoder.decode("").unwrap().is_none());
    }

    #[test]
    fn test_comment_never_produces_event_or_mutates_state() {
        let mut decoder = SseDecoder::new();

        assert!(decoder.decode(":heartbeat").unwrap().is_none());
        // A following blank line must still find an empty accumulator.
        assert!(decoder.decode("").unwrap().is_none());

        // Comments mid-event leave accumulated data untouched.
        decoder.decode(r#"data: {"a":1}"#).unwrap();
        decoder.decode(":heartbeat").unwrap();
        let event = decoder.decode("").unwrap().unwrap();
        assert_eq!(event.data, json!({"a":1}));
    }

    #[test]
    fn test_multi_line_data_joined_with_newline() {
        let mut decoder = SseDecoder::new();

        decoder.decode(r#"data: {"text":"#).unwrap();
        decoder.decode(r#"data: "hi"}"#).unwrap();

        // Lines join as {"text":\n"hi"} which is valid JSON.
        let event = decoder.decode("").unwrap().unwrap();
        assert_eq!(event.data, json!({"text":"hi"}));
    }

    #[test]
    fn test_no_space_after_colon() {
        let mut decoder = SseDecoder::new();
        decoder.decode(r#"data:{"a":1}"#).unwrap();
        let event = decoder.decode("").unwrap().unwrap();
        assert_eq!(event.data, json!({"a":1}));
    }

    #[test]
    fn test_only_one_leading_space_stripped() {
        let mut decoder = SseDecoder::new();
        decoder.decode(r#"data:  "x""#).unwrap();
        let event = decoder.decode("").unwrap().unwrap();
        // Second space is part of the value; JSON tolerates it.
        assert_eq!(event.data, json!("x"));
    }

    #[test]
    fn test_retry_non_numeric_becomes_zero() {
        let mut decoder = SseDecoder::new();
        decoder.decode("retry: soon").unwrap();
        decoder.decode(r#"data: {}"#).unwrap();
        let event = decoder.decode("").unwrap().unwrap();
        assert_eq!(event.retry, Some(0));
    }

    #[test]
    fn test_unknown_field_ignored() {
        let mut decoder = SseDecoder::new();
        decoder.decode("whatever: value").unwrap();
        decoder.decode(r#"data: {"a":1}"#).unwrap();
        let event = decoder.decode("").unwrap().unwrap();
        assert_eq!(event.data, json!({"a":1}));
    }

    #[test]
    fn test_field_without_colon_ignored() {
        let mut decoder = SseDecoder::new();
        // Per the SSE grammar this is a field named "dataless" with an
        // empty value; it matches no known field.
        decoder.decode("dataless").unwrap();
        assert!(decoder.decode("").unwrap().is_none());
    }

    #[test]
    fn test_invalid_json_is_fatal() {
        let mut decoder = SseDecoder::new();
        decoder.decode("data: not json").unwrap();
        let result = decoder.decode("");
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_flush_resets_all_state() {
        let mut decoder = SseDecoder::new();

        decoder.decode("event: first").unwrap();
        decoder.decode("id: 1").unwrap();
        decoder.decode("retry: 100").unwrap();
        decoder.decode(r#"data: {"n":1}"#).unwrap();
        let first = decoder.decode("").unwrap().unwrap();
        assert_eq!(first.event.as_deref(), Some("first"));

        // Second event must not inherit anything from the first.
        decoder.decode(r#"data: {"n":2}"#).unwrap();
        let second = decoder.decode("").unwrap().unwrap();
        assert_eq!(second.data, json!({"n":2}));
        assert_eq!(second.event, None);
        assert_eq!(second.id, None);
        assert_eq!(second.retry, None);
    }
}
