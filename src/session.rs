//! Stream session: the driving loop behind one streaming request.
//!
//! A session issues the POST, pulls body chunks one at a time and pushes
//! them through the UTF-8 decoder, the frame splitter and the event
//! interpreter. Events are queued and handed out one per call to
//! [`StreamSession::next_event`]; the only suspension points are the request
//! itself and the pull of the next chunk.

use std::collections::VecDeque;
use std::sync::Arc;

use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument, Span};
use uuid::Uuid;

use crate::config::StreamRequest;
use crate::error::StreamError;
use crate::sse::{EventInterpreter, Frame, FrameSplitter, ResponseInfo, StreamEvent, Utf8Decoder};
use crate::traits::{ByteStream, HttpClient};

enum Phase {
    /// Request not sent yet
    Connect,
    /// Body open, chunks pending
    Reading(ByteStream),
    /// Nothing more will be read
    Finished,
}

/// State owned by one stream from request to exit.
pub struct StreamSession {
    id: Uuid,
    http: Arc<dyn HttpClient>,
    request: StreamRequest,
    decoder: Utf8Decoder,
    splitter: FrameSplitter,
    interpreter: EventInterpreter,
    pending: VecDeque<StreamEvent>,
    phase: Phase,
    span: Span,
}

impl StreamSession {
    /// Create a session; nothing is sent until the first `next_event`.
    pub fn new(http: Arc<dyn HttpClient>, request: StreamRequest) -> Self {
        let id = Uuid::new_v4();
        let span = info_span!("sse_session", session_id = %id, endpoint = %request.endpoint);
        Self {
            id,
            http,
            request,
            decoder: Utf8Decoder::new(),
            splitter: FrameSplitter::new(),
            interpreter: EventInterpreter::new(),
            pending: VecDeque::new(),
            phase: Phase::Connect,
            span,
        }
    }

    /// Session identifier used in log output.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether a completion has been produced for this session.
    pub fn done_emitted(&self) -> bool {
        self.interpreter.done_emitted()
    }

    /// Token that cancels this session.
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.request.cancel
    }

    /// Next event in delivery order, or `None` once the session is over.
    ///
    /// After cancellation is observed this returns `None` without yielding
    /// anything still queued.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        let span = self.span.clone();
        self.step().instrument(span).await
    }

    async fn step(&mut self) -> Option<StreamEvent> {
        loop {
            if self.request.cancel.is_cancelled() {
                self.close();
                return None;
            }

            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }

            match std::mem::replace(&mut self.phase, Phase::Finished) {
                Phase::Connect => self.connect().await,
                Phase::Reading(mut body) => {
                    let cancel = self.request.cancel.clone();
                    let next = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => None,
                        chunk = body.next() => Some(chunk),
                    };

                    match next {
                        // Cancelled while waiting; dropping `body` releases the reader
                        None => continue,
                        Some(Some(Ok(bytes))) => {
                            if !self.ingest(&bytes) {
                                self.phase = Phase::Reading(body);
                            }
                        }
                        Some(Some(Err(err))) => self.fail(StreamError::Interrupted(err)),
                        Some(None) => self.finish_input(),
                    }
                }
                Phase::Finished => return None,
            }
        }
    }

    async fn connect(&mut self) {
        let body = self.request.payload.to_string();
        let headers = self.request.request_headers();
        let cancel = self.request.cancel.clone();
        let http = Arc::clone(&self.http);

        debug!("Opening stream");
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            result = http.post_stream(&self.request.endpoint, &body, &headers) => result,
        };

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                self.fail(StreamError::Connect(err));
                return;
            }
        };

        if !response.is_success() {
            self.fail(StreamError::HttpStatus {
                status: response.status,
            });
            return;
        }

        info!(status = response.status, "Stream opened");
        self.pending.push_back(StreamEvent::Open(ResponseInfo {
            status: response.status,
            headers: response.headers,
        }));

        match response.body {
            Some(body) => self.phase = Phase::Reading(body),
            None => self.fail(StreamError::BodyUnavailable),
        }
    }

    /// Feed one chunk through the pipeline. Returns true if the session
    /// should stop reading.
    fn ingest(&mut self, bytes: &[u8]) -> bool {
        let text = self.decoder.decode(bytes);
        let frames = self.splitter.ingest(&text);
        debug!(bytes = bytes.len(), frames = frames.len(), "Received chunk");
        self.dispatch(frames)
    }

    fn finish_input(&mut self) {
        let tail = self.decoder.finish();
        let mut frames = self.splitter.ingest(&tail);
        frames.extend(self.splitter.flush());
        debug!(frames = frames.len(), "End of input");

        if self.dispatch(frames) {
            return;
        }
        if let Some(done) = self.interpreter.finish() {
            info!(reason = "eof", "Stream completed");
            self.pending.push_back(done);
        }
    }

    fn dispatch(&mut self, frames: Vec<Frame>) -> bool {
        for frame in frames {
            let Some(event) = self.interpreter.interpret(&frame) else {
                continue;
            };

            let completed = if let StreamEvent::Done(reason) = &event {
                info!(reason = reason.as_str(), "Stream completed");
                true
            } else {
                false
            };
            self.pending.push_back(event);

            if completed && self.request.stop_on_done {
                debug!("Stopping at first completion");
                return true;
            }
        }
        false
    }

    fn fail(&mut self, err: StreamError) {
        warn!(code = err.error_code(), category = %err.category(), error = %err, "Stream failed");
        self.pending.push_back(StreamEvent::Error(err));
    }

    fn close(&mut self) {
        if !matches!(self.phase, Phase::Finished) || !self.pending.is_empty() {
            debug!("Stream cancelled");
        }
        self.phase = Phase::Finished;
        self.pending.clear();
        self.splitter.reset();
    }
}

impl std::fmt::Debug for StreamSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSession")
            .field("id", &self.id)
            .field("endpoint", &self.request.endpoint)
            .field("done_emitted", &self.interpreter.done_emitted())
            .field("pending", &self.pending.len())
            .finish()
    }
}
