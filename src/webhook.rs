//! Incoming webhook payloads.
//!
//! When a request is submitted with a `fal_webhook` URL, fal delivers the
//! outcome to that URL as JSON. [`WebhookPayload`] parses that body and
//! exposes success/error helpers.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Webhook delivery status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum WebhookStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "ERROR")]
    Error,
}

/// A parsed webhook delivery from fal.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    /// The request this delivery is about.
    #[serde(default)]
    pub request_id: Option<String>,
    /// Gateway-level request id, when present.
    #[serde(default)]
    pub gateway_request_id: Option<String>,
    /// Delivery status, when provided.
    #[serde(default)]
    pub status: Option<WebhookStatus>,
    /// Error message, when the request failed.
    #[serde(default)]
    pub error: Option<String>,
    /// Model-specific response payload.
    #[serde(default)]
    pub payload: Option<Value>,
    /// Log entries, when present.
    #[serde(default)]
    pub logs: Option<Vec<Value>>,
    /// Metrics, when present.
    #[serde(default)]
    pub metrics: Option<Value>,
}

impl WebhookPayload {
    /// Parse a webhook body from a JSON string.
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(Error::from)
    }

    /// Build from an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(Error::from)
    }

    /// Whether the delivery reports success. A payload without status or
    /// error counts as success.
    pub fn success(&self) -> bool {
        match self.status {
            Some(WebhookStatus::Ok) => true,
            Some(WebhookStatus::Error) => false,
            None => self.error.is_none(),
        }
    }

    /// Whether the delivery reports an error.
    pub fn is_error(&self) -> bool {
        !self.success()
    }

    /// Nested error detail from the payload, when present.
    pub fn error_detail(&self) -> Option<&str> {
        self.payload
            .as_ref()
            .and_then(|p| p.get("detail"))
            .and_then(Value::as_str)
    }
}
