//! Frame interpretation
//!
//! Turns one complete frame into at most one stream event. Parsing of the
//! field grammar and classification of the payload are pure functions; the
//! [`EventInterpreter`] only adds the once-per-session completion rule.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::sse::events::{DoneReason, ParsedEvent, SseLine, StreamEvent, DONE_SENTINEL};

/// Parse a single SSE line into its component type
///
/// Exactly one space after the colon is stripped; the rest of the value is
/// kept verbatim.
pub fn parse_sse_line(line: &str) -> SseLine {
    if line.starts_with(':') {
        return SseLine::Comment;
    }

    if let Some(rest) = line.strip_prefix("event:") {
        return SseLine::Event(strip_one_space(rest).to_string());
    }

    if let Some(rest) = line.strip_prefix("data:") {
        return SseLine::Data(strip_one_space(rest).to_string());
    }

    // id:, retry: and anything unrecognized
    SseLine::Other
}

fn strip_one_space(value: &str) -> &str {
    value.strip_prefix(' ').unwrap_or(value)
}

/// Extract the fields of a frame.
///
/// Returns `None` for inert frames: blank, comment-led, or without any
/// `data:` line.
pub fn parse_frame(frame: &str) -> Option<ParsedEvent> {
    let trimmed = frame.trim();
    if trimmed.is_empty() || trimmed.starts_with(':') {
        return None;
    }

    let mut event_name = None;
    let mut data_lines: Vec<String> = Vec::new();

    for line in frame.split('\n') {
        match parse_sse_line(line) {
            SseLine::Event(name) => event_name = Some(name),
            SseLine::Data(data) => data_lines.push(data),
            SseLine::Comment | SseLine::Other => {}
        }
    }

    if data_lines.is_empty() {
        return None;
    }

    Some(ParsedEvent {
        event_name,
        data: data_lines.join("\n"),
    })
}

/// Recognized shapes of a JSON object payload, in match priority order.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadShape {
    /// `{"type":"token","delta":...}`
    TypedToken(Value),
    /// `{"delta":...}`
    Delta(Value),
    /// `{"content":...}`
    Content(Value),
    /// `{"type":"done", ...}`
    TypedDone(Map<String, Value>),
    /// An object matching none of the above
    Unrecognized,
}

/// Classify a JSON object by the first matching rule.
///
/// The order matters: `{"type":"done","delta":"x"}` is a delta, not a
/// completion.
pub fn classify_payload(object: Map<String, Value>) -> PayloadShape {
    let non_null = |key: &str| object.get(key).filter(|v| !v.is_null()).cloned();
    let type_is = |name: &str| object.get("type").and_then(Value::as_str) == Some(name);

    if type_is("token") {
        if let Some(delta) = non_null("delta") {
            return PayloadShape::TypedToken(delta);
        }
    }
    if let Some(delta) = non_null("delta") {
        return PayloadShape::Delta(delta);
    }
    if let Some(content) = non_null("content") {
        return PayloadShape::Content(content);
    }
    if type_is("done") {
        return PayloadShape::TypedDone(object);
    }
    PayloadShape::Unrecognized
}

/// What a single frame asks the consumer to do.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameAction {
    /// Nothing: inert frame or empty token
    Ignore,
    /// Deliver a non-empty text fragment
    Token(String),
    /// Complete the stream
    Done(DoneReason),
}

/// Decide the effect of one parsed event.
pub fn classify_event(event: &ParsedEvent) -> FrameAction {
    if event.data == DONE_SENTINEL || event.event_name.as_deref() == Some("done") {
        return FrameAction::Done(DoneReason::Done);
    }

    let object = match serde_json::from_str::<Value>(&event.data) {
        Ok(Value::Object(object)) => object,
        // Plain text, or JSON that is not an object
        _ => return token(event.data.clone()),
    };

    match classify_payload(object) {
        PayloadShape::TypedToken(value)
        | PayloadShape::Delta(value)
        | PayloadShape::Content(value) => token(value_to_text(value)),
        PayloadShape::TypedDone(payload) => FrameAction::Done(DoneReason::Payload { payload }),
        PayloadShape::Unrecognized => token(event.data.clone()),
    }
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn token(text: String) -> FrameAction {
    if text.is_empty() {
        FrameAction::Ignore
    } else {
        FrameAction::Token(text)
    }
}

/// Stateful interpreter for one stream session.
///
/// Tracks whether completion has been reported so that a second
/// termination marker is ignored.
#[derive(Debug, Default)]
pub struct EventInterpreter {
    done_emitted: bool,
}

impl EventInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpret one frame, returning the event to deliver if any.
    pub fn interpret(&mut self, frame: &str) -> Option<StreamEvent> {
        let Some(event) = parse_frame(frame) else {
            trace!(frame_len = frame.len(), "Skipping inert SSE frame");
            return None;
        };

        debug!(event = event.name(), data = %event.data, "SSE frame");

        match classify_event(&event) {
            FrameAction::Ignore => None,
            FrameAction::Token(text) => Some(StreamEvent::Token(text)),
            FrameAction::Done(reason) => {
                if self.done_emitted {
                    debug!("Ignoring repeated termination marker");
                    return None;
                }
                self.done_emitted = true;
                Some(StreamEvent::Done(reason))
            }
        }
    }

    /// Whether a completion has already been produced.
    pub fn done_emitted(&self) -> bool {
        self.done_emitted
    }

    /// Produce the end-of-input completion if none was sent yet.
    pub fn finish(&mut self) -> Option<StreamEvent> {
        if self.done_emitted {
            return None;
        }
        self.done_emitted = true;
        Some(StreamEvent::Done(DoneReason::Eof))
    }
}
