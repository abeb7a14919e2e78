//! SSE frame and event types
//!
//! Contains the values that flow between the frame splitter, the event
//! interpreter and the stream consumer.

use serde::Serialize;

use crate::error::StreamError;
use crate::traits::Headers;

/// One complete SSE event block, without its blank-line separator.
pub type Frame = String;

/// Event name used when a frame carries no `event:` field.
pub const DEFAULT_EVENT_NAME: &str = "message";

/// Literal data payload that terminates a stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Represents a parsed SSE line
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    /// Event type declaration (e.g., "event: report")
    Event(String),
    /// Data payload (e.g., "data: {\"delta\": \"hel\"}")
    Data(String),
    /// Comment line (starts with ':')
    Comment,
    /// Any other field (`id:`, `retry:`, unknown names)
    Other,
}

/// The named fields of one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedEvent {
    /// Value of the last `event:` line, `None` if the frame had none
    pub event_name: Option<String>,
    /// `data:` line contents joined with `\n`, in arrival order
    pub data: String,
}

impl ParsedEvent {
    /// Event name with the `message` default applied.
    pub fn name(&self) -> &str {
        self.event_name.as_deref().unwrap_or(DEFAULT_EVENT_NAME)
    }
}

/// Why a stream completed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DoneReason {
    /// `[DONE]` sentinel or `event: done`
    Done,
    /// A `{"type":"done", ...}` payload; carries the full object, nested
    /// under `payload` so its keys never collide with the tag
    Payload {
        payload: serde_json::Map<String, serde_json::Value>,
    },
    /// Input ended without an explicit termination marker
    Eof,
}

impl DoneReason {
    /// Short label for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            DoneReason::Done | DoneReason::Payload { .. } => "done",
            DoneReason::Eof => "eof",
        }
    }
}

/// Status and headers of an accepted streaming response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseInfo {
    pub status: u16,
    pub headers: Headers,
}

/// Everything a stream consumer can observe, in delivery order.
#[derive(Debug)]
pub enum StreamEvent {
    /// The transport accepted the request
    Open(ResponseInfo),
    /// One non-empty text fragment
    Token(String),
    /// The stream completed; emitted at most once per session
    Done(DoneReason),
    /// The transport failed; no further events follow
    Error(StreamError),
}

impl StreamEvent {
    /// Returns the event type name as a string for debugging purposes.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            StreamEvent::Open(_) => "open",
            StreamEvent::Token(_) => "token",
            StreamEvent::Done(_) => "done",
            StreamEvent::Error(_) => "error",
        }
    }
}
