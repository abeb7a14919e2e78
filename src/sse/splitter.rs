//! Frame splitting for incrementally received SSE text.
//!
//! The splitter owns the stream's text buffer. It normalizes `\r\n` to `\n`
//! and cuts the buffer at every blank line, never looking inside a frame.

use crate::sse::events::Frame;

const FRAME_SEPARATOR: &str = "\n\n";

/// Accumulates decoded text and yields complete frames in arrival order.
#[derive(Debug, Default)]
pub struct FrameSplitter {
    buffer: String,
    /// A chunk ended in `\r`; it is held until the next chunk shows
    /// whether it starts a `\r\n` pair
    pending_cr: bool,
}

impl FrameSplitter {
    /// Create a splitter with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every frame it completes.
    ///
    /// After this returns the buffer holds at most one partial frame.
    pub fn ingest(&mut self, chunk: &str) -> Vec<Frame> {
        if chunk.is_empty() {
            return Vec::new();
        }

        // Only new text is normalized; a held `\r` rejoins at the front
        let mut text = String::with_capacity(chunk.len() + 1);
        if std::mem::take(&mut self.pending_cr) {
            text.push('\r');
        }
        text.push_str(chunk);
        if text.ends_with('\r') {
            text.pop();
            self.pending_cr = true;
        }
        self.buffer.push_str(&text.replace("\r\n", "\n"));

        let mut frames = Vec::new();
        let mut consumed = 0;
        while let Some(idx) = self.buffer[consumed..].find(FRAME_SEPARATOR) {
            let end = consumed + idx;
            frames.push(self.buffer[consumed..end].to_string());
            consumed = end + FRAME_SEPARATOR.len();
        }
        if consumed > 0 {
            self.buffer.drain(..consumed);
        }

        frames
    }

    /// Take whatever is left as a final frame once input has ended.
    ///
    /// Returns `None` if the remainder is only whitespace. The buffer is
    /// empty afterwards either way.
    pub fn flush(&mut self) -> Option<Frame> {
        let rest = std::mem::take(&mut self.buffer);
        self.pending_cr = false;
        let tail = rest.trim();
        if tail.is_empty() {
            None
        } else {
            Some(tail.to_string())
        }
    }

    /// Discard any buffered partial frame.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.pending_cr = false;
    }

    /// The partial frame currently held back.
    pub fn buffered(&self) -> &str {
        &self.buffer
    }
}
