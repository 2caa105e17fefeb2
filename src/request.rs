//! Queued inference requests.
//!
//! [`Request`] is the client-side record of a job submitted to a fal
//! endpoint via the Queue API: submission, status polling, result fetch,
//! cancellation, and the alternate stream-based completion path.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::sse::EventStream;

/// Status of a queued request, as reported by the Queue API.
///
/// The variant order defines the lifecycle ordering
/// `InQueue < InProgress < Completed`; a record never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    /// Waiting in the queue (initial state).
    InQueue,
    /// Being processed.
    InProgress,
    /// Finished; the response payload can be fetched (terminal state).
    Completed,
}

/// Sparse fields shared by Queue API responses. Absent fields must not
/// clobber previously known values, so everything is optional here and
/// merged explicitly.
#[derive(Debug, Default, Deserialize)]
struct QueueFields {
    request_id: Option<String>,
    status: Option<RequestStatus>,
    queue_position: Option<u64>,
    logs: Option<Vec<Value>>,
    response: Option<Value>,
}

/// Decode queue response attributes, tolerating an empty (null) body.
fn queue_fields(value: Value) -> Result<QueueFields> {
    if value.is_null() {
        return Ok(QueueFields::default());
    }
    serde_json::from_value(value).map_err(Error::from)
}

/// A request submitted to a fal model endpoint.
///
/// The record is a value owned by the caller; it is mutated only by
/// [`reload`](Self::reload). Field invariants:
///
/// - `id`, once set from a server response, is never cleared by a later
///   response lacking one (last value wins only for present fields);
/// - `status` is monotonic non-decreasing across reloads, even if the
///   server momentarily reports an earlier state;
/// - `response` is populated only from the result endpoint once the record
///   is `Completed`; stream-derived records are the exception, see
///   [`Request::stream`].
#[derive(Debug, Clone)]
pub struct Request {
    id: Option<String>,
    status: Option<RequestStatus>,
    queue_position: Option<u64>,
    logs: Option<Vec<Value>>,
    response: Option<Value>,
    endpoint_id: String,
    client: Client,
}

impl Request {
    /// Submit `input` as a new queued request for `endpoint_id`.
    ///
    /// `POST {queue_base}/{endpoint_id}`, optionally with a `fal_webhook`
    /// query parameter for completion delivery. The returned record carries
    /// the server-assigned id; an omitted status defaults to
    /// [`RequestStatus::InQueue`].
    pub fn submit(
        client: &Client,
        endpoint_id: &str,
        input: &Value,
        webhook_url: Option<&str>,
    ) -> Result<Request> {
        let mut path = format!("/{endpoint_id}");
        if let Some(url) = webhook_url {
            path = format!("{path}?fal_webhook={}", urlencoding::encode(url));
        }

        let attrs = client.queue_post(&path, input)?;
        let mut request = Request::empty(client, endpoint_id);
        request.apply(queue_fields(attrs)?);
        request.status.get_or_insert(RequestStatus::InQueue);
        Ok(request)
    }

    /// Fetch the current status of an existing request by id.
    ///
    /// One-shot lookup against
    /// `GET {queue_base}/{ns}/requests/{id}/status`; does not mutate any
    /// other record.
    pub fn find(client: &Client, id: &str, endpoint_id: &str, logs: bool) -> Result<Request> {
        let mut request = Request::empty(client, endpoint_id);
        request.id = Some(id.to_string());
        let attrs = request.fetch_status(logs)?;
        request.apply(attrs);
        request.status.get_or_insert(RequestStatus::InQueue);
        Ok(request)
    }

    /// Run a synchronous streaming request and derive the terminal record
    /// from the last event.
    ///
    /// Consumes `POST {sync_base}/{endpoint_id}/stream` as SSE, invoking
    /// `on_data` with each event's data payload, in order, before the next
    /// event is decoded. The terminal record is built from the **last**
    /// event: a nested `response` field is unwrapped as the payload when
    /// present, otherwise the whole data value is the payload; `request_id`
    /// and `status` are taken from the last event when present.
    ///
    /// A last event carrying no `status` field leaves the record's status
    /// unset even though a payload was received. That is expected for
    /// endpoints that stream bare output chunks, not an error.
    pub fn stream<F>(
        client: &Client,
        endpoint_id: &str,
        input: &Value,
        mut on_data: F,
    ) -> Result<Request>
    where
        F: FnMut(&Value),
    {
        let path = format!("/{endpoint_id}/stream");
        let last = EventStream::new(client, path, input.clone()).run(|event| on_data(&event.data))?;

        let mut request = Request::empty(client, endpoint_id);
        if let Some(event) = last {
            let data = event.data;
            let fields = QueueFields {
                request_id: data
                    .get("request_id")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                status: data
                    .get("status")
                    .cloned()
                    .and_then(|s| serde_json::from_value(s).ok()),
                queue_position: None,
                logs: None,
                response: Some(match data.get("response") {
                    Some(inner) => inner.clone(),
                    None => data.clone(),
                }),
            };
            request.apply(fields);
        }
        Ok(request)
    }

    fn empty(client: &Client, endpoint_id: &str) -> Request {
        Request {
            id: None,
            status: None,
            queue_position: None,
            logs: None,
            response: None,
            endpoint_id: endpoint_id.to_string(),
            client: client.clone(),
        }
    }

    /// The server-assigned request id, once known.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The last known status. `None` only for stream-derived records whose
    /// final event carried no status field.
    pub fn status(&self) -> Option<RequestStatus> {
        self.status
    }

    /// Position in the queue, when the server reported one.
    pub fn queue_position(&self) -> Option<u64> {
        self.queue_position
    }

    /// Log entries, when requested via `reload` with `logs = true`.
    pub fn logs(&self) -> Option<&[Value]> {
        self.logs.as_deref()
    }

    /// The response payload. `None` until the record completes.
    pub fn response(&self) -> Option<&Value> {
        self.response.as_ref()
    }

    /// The endpoint this request was submitted to.
    pub fn endpoint_id(&self) -> &str {
        &self.endpoint_id
    }

    /// Whether the request is still waiting in the queue.
    pub fn in_queue(&self) -> bool {
        self.status == Some(RequestStatus::InQueue)
    }

    /// Whether the request is being processed.
    pub fn in_progress(&self) -> bool {
        self.status == Some(RequestStatus::InProgress)
    }

    /// Whether the request has completed.
    pub fn completed(&self) -> bool {
        self.status == Some(RequestStatus::Completed)
    }

    /// Refresh this record from the Queue API.
    ///
    /// Polls the status endpoint unless the record is already `Completed`;
    /// then, if the (possibly just-updated) status is `Completed`, fetches
    /// the result endpoint and stores its payload as `response`. The result
    /// endpoint is a stable read, so repeated reloads after completion
    /// simply re-fetch the same payload.
    pub fn reload(&mut self, logs: bool) -> Result<&mut Self> {
        if !self.completed() {
            let attrs = self.fetch_status(logs)?;
            self.apply(attrs);
        }

        if self.completed() {
            let response = self
                .client
                .queue_get(&format!("/{}/requests/{}", self.namespace(), self.known_id()?), &[])?;
            self.response = Some(response);
        }

        Ok(self)
    }

    /// Request cancellation, unconditionally.
    ///
    /// `PUT {queue_base}/{ns}/requests/{id}/cancel`. The server decides
    /// whether cancellation is honored; its answer is returned verbatim,
    /// including for jobs that already completed.
    pub fn cancel(&self) -> Result<Value> {
        self.client
            .queue_put(&format!("/{}/requests/{}/cancel", self.namespace(), self.known_id()?))
    }

    fn fetch_status(&self, logs: bool) -> Result<QueueFields> {
        let path = format!("/{}/requests/{}/status", self.namespace(), self.known_id()?);
        let query: Vec<(&str, String)> = if logs {
            vec![("logs", "1".to_string())]
        } else {
            Vec::new()
        };
        let attrs = self.client.queue_get(&path, &query)?;
        queue_fields(attrs)
    }

    /// The endpoint id truncated to its first two path segments, the
    /// namespace used by the per-request Queue API routes.
    fn namespace(&self) -> String {
        self.endpoint_id
            .split('/')
            .take(2)
            .collect::<Vec<_>>()
            .join("/")
    }

    fn known_id(&self) -> Result<&str> {
        self.id.as_deref().ok_or_else(|| {
            Error::Configuration("request has no id; it cannot be polled or cancelled".to_string())
        })
    }

    /// Merge sparse response fields into the record. Present fields win;
    /// absent fields keep their previous values; status never regresses.
    fn apply(&mut self, fields: QueueFields) {
        if let Some(id) = fields.request_id {
            self.id = Some(id);
        }
        if let Some(status) = fields.status {
            self.status = Some(match self.status {
                Some(current) => current.max(status),
                None => status,
            });
        }
        if fields.queue_position.is_some() {
            self.queue_position = fields.queue_position;
        }
        if fields.logs.is_some() {
            self.logs = fields.logs;
        }
        if fields.response.is_some() {
            self.response = fields.response;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ordering() {
        assert!(RequestStatus::InQueue < RequestStatus::InProgress);
        assert!(RequestStatus::InProgress < RequestStatus::Completed);
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&RequestStatus::InQueue).unwrap(),
            r#""IN_QUEUE""#
        );
        assert_eq!(
            serde_json::from_str::<RequestStatus>(r#""IN_PROGRESS""#).unwrap(),
            RequestStatus::InProgress
        );
        assert_eq!(
            serde_json::from_str::<RequestStatus>(r#""COMPLETED""#).unwrap(),
            RequestStatus::Completed
        );
    }
}
