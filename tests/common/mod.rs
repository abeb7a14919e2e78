//! Common test utilities for integration tests.
//!
//! Builds clients over the mock transport and records every callback as a
//! flat list of strings so ordering can be asserted in one comparison.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use gradquest_stream::adapters::mock::{MockHttpClient, MockResponse};
use gradquest_stream::{StreamCallbacks, StreamClient, StreamEvent};

pub const CHAT_URL: &str = "http://backend.test/api/agent/chat";

/// Creates a client whose transport answers `CHAT_URL` with `response`.
pub fn mock_client(response: MockResponse) -> (StreamClient, MockHttpClient) {
    let mock = MockHttpClient::new();
    mock.set_response(CHAT_URL, response);
    (StreamClient::new(Arc::new(mock.clone())), mock)
}

/// Shared log of callback invocations.
#[derive(Clone, Default)]
pub struct CallbackLog(Arc<Mutex<Vec<String>>>);

impl CallbackLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callbacks that append `open:<status>`, `token:<text>`,
    /// `done:<reason>` and `error:<message>` entries.
    pub fn callbacks(&self) -> StreamCallbacks {
        let (open, token, done, error) = (self.clone(), self.clone(), self.clone(), self.clone());
        StreamCallbacks::new()
            .on_open(move |info| open.push(format!("open:{}", info.status)))
            .on_token(move |text| token.push(format!("token:{}", text)))
            .on_done(move |reason| done.push(format!("done:{}", reason.as_str())))
            .on_error(move |err| error.push(format!("error:{}", err)))
    }

    pub fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.entries().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

/// Render an event the same way [`CallbackLog`] does.
pub fn describe(event: &StreamEvent) -> String {
    match event {
        StreamEvent::Open(info) => format!("open:{}", info.status),
        StreamEvent::Token(text) => format!("token:{}", text),
        StreamEvent::Done(reason) => format!("done:{}", reason.as_str()),
        StreamEvent::Error(err) => format!("error:{}", err),
    }
}
