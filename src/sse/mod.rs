//! SSE (Server-Sent Events) stream decoding
//!
//! Decodes the event-stream bodies produced by the chat and report
//! generation backends. SSE format consists of:
//! - `event: <name>` - event name line
//! - `data: <payload>` - data payload line(s), joined with `\n`
//! - Empty line - signals end of event
//! - Lines starting with `:` - comments (ignored)
//!
//! # Module structure
//! - `decoder` - Stateful UTF-8 decoding of byte chunks
//! - `splitter` - Buffering and blank-line framing (FrameSplitter)
//! - `interpreter` - Field parsing and payload classification (EventInterpreter)
//! - `events` - Frame, ParsedEvent, DoneReason and StreamEvent types

mod decoder;
mod events;
mod interpreter;
mod splitter;

// Re-export public types
pub use decoder::Utf8Decoder;
pub use events::{
    DoneReason, Frame, ParsedEvent, ResponseInfo, SseLine, StreamEvent, DEFAULT_EVENT_NAME,
    DONE_SENTINEL,
};
pub use interpreter::{
    classify_event, classify_payload, parse_frame, parse_sse_line, EventInterpreter, FrameAction,
    PayloadShape,
};
pub use splitter::FrameSplitter;
