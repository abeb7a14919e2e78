//! Stream client for the chat and report generation backends.
//!
//! Offers the same session two ways: a lazy stream of [`StreamEvent`]s, or a
//! callback-driven run that returns how the stream ended.

use std::pin::Pin;
use std::sync::Arc;

use futures_util::stream::{self, Stream};
use futures_util::StreamExt;

use crate::adapters::ReqwestHttpClient;
use crate::callbacks::StreamCallbacks;
use crate::config::{ClientSettings, StreamRequest};
use crate::error::StreamError;
use crate::session::StreamSession;
use crate::sse::{DoneReason, StreamEvent};
use crate::traits::{HttpClient, HttpError};

/// Events of one session, in delivery order.
pub type EventStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;

/// How a callback-driven stream ended.
#[derive(Debug)]
pub enum StreamOutcome {
    /// A completion was delivered
    Completed(DoneReason),
    /// The transport failed
    Failed(StreamError),
    /// The cancellation token fired first
    Cancelled,
}

/// Client for consuming SSE streams.
#[derive(Clone)]
pub struct StreamClient {
    http: Arc<dyn HttpClient>,
}

impl StreamClient {
    /// Create a client over any transport.
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    /// Create a client over reqwest with the given settings.
    pub fn with_settings(settings: &ClientSettings) -> Result<Self, HttpError> {
        let http = ReqwestHttpClient::from_settings(settings)?;
        Ok(Self::new(Arc::new(http)))
    }

    /// Open a stream and return its events lazily.
    ///
    /// The request is sent on first poll. Dropping the stream releases the
    /// transport.
    pub fn events(&self, request: StreamRequest) -> EventStream {
        let session = StreamSession::new(Arc::clone(&self.http), request);
        Box::pin(stream::unfold(session, |mut session| async move {
            session.next_event().await.map(|event| (event, session))
        }))
    }

    /// Run a stream to its end, invoking `callbacks` for every event.
    ///
    /// Cancellation ends the run without calling `on_done` or `on_error`.
    pub async fn run(&self, request: StreamRequest, mut callbacks: StreamCallbacks) -> StreamOutcome {
        let mut events = self.events(request);
        let mut outcome = StreamOutcome::Cancelled;

        while let Some(event) = events.next().await {
            callbacks.dispatch(&event);
            match event {
                StreamEvent::Done(reason) => outcome = StreamOutcome::Completed(reason),
                StreamEvent::Error(err) => outcome = StreamOutcome::Failed(err),
                StreamEvent::Open(_) | StreamEvent::Token(_) => {}
            }
        }

        outcome
    }
}

impl std::fmt::Debug for StreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamClient").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use serde_json::json;
    use std::sync::Mutex;

    const URL: &str = "http://backend.test/api/report/stream";

    fn client_with(response: MockResponse) -> StreamClient {
        let mock = MockHttpClient::new();
        mock.set_response(URL, response);
        StreamClient::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn test_events_stream_collects_tokens() {
        let client = client_with(MockResponse::sse(&[
            "data: {\"type\":\"token\",\"delta\":\"职业\"}\n\n",
            "data: {\"content\":\"规划\"}\n\ndata: {\"type\":\"done\"}\n\n",
        ]));

        let events: Vec<StreamEvent> = client
            .events(StreamRequest::new(URL, json!({})))
            .collect()
            .await;

        let tokens: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Token(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(tokens, vec!["职业", "规划"]);
        assert!(matches!(
            events.last(),
            Some(StreamEvent::Done(DoneReason::Payload { .. }))
        ));
    }

    #[tokio::test]
    async fn test_run_invokes_callbacks_in_order() {
        let client = client_with(MockResponse::sse(&["data: a\n\ndata: b\n\n"]));
        let log = Arc::new(Mutex::new(Vec::new()));
        let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());

        let outcome = client
            .run(
                StreamRequest::new(URL, json!({})),
                StreamCallbacks::new()
                    .on_open(move |info| l1.lock().unwrap().push(format!("open:{}", info.status)))
                    .on_token(move |t| l2.lock().unwrap().push(format!("token:{}", t)))
                    .on_done(move |r| l3.lock().unwrap().push(format!("done:{}", r.as_str()))),
            )
            .await;

        assert!(matches!(outcome, StreamOutcome::Completed(DoneReason::Eof)));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["open:200", "token:a", "token:b", "done:eof"]
        );
    }

    #[tokio::test]
    async fn test_run_reports_transport_failure_once() {
        let client = client_with(MockResponse::status(401));
        let errors = Arc::new(Mutex::new(Vec::new()));
        let dones = Arc::new(Mutex::new(0));
        let (e, d) = (errors.clone(), dones.clone());

        let outcome = client
            .run(
                StreamRequest::new(URL, json!({})),
                StreamCallbacks::new()
                    .on_error(move |err| e.lock().unwrap().push(err.to_string()))
                    .on_done(move |_| *d.lock().unwrap() += 1),
            )
            .await;

        assert!(matches!(
            outcome,
            StreamOutcome::Failed(StreamError::HttpStatus { status: 401 })
        ));
        assert_eq!(*errors.lock().unwrap(), vec!["HTTP 401"]);
        assert_eq!(*dones.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_run_cancel_from_token_callback() {
        let client = client_with(MockResponse::sse(&["data: one\n\ndata: two\n\n"]));
        let request = StreamRequest::new(URL, json!({}));
        let cancel = request.cancel.clone();
        let tokens = Arc::new(Mutex::new(Vec::new()));
        let dones = Arc::new(Mutex::new(0));
        let (t, d) = (tokens.clone(), dones.clone());

        let outcome = client
            .run(
                request,
                StreamCallbacks::new()
                    .on_token(move |text| {
                        t.lock().unwrap().push(text.to_string());
                        cancel.cancel();
                    })
                    .on_done(move |_| *d.lock().unwrap() += 1),
            )
            .await;

        assert!(matches!(outcome, StreamOutcome::Cancelled));
        assert_eq!(*tokens.lock().unwrap(), vec!["one"]);
        assert_eq!(*dones.lock().unwrap(), 0);
    }
}
