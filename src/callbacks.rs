//! Callback bundle for consumers that prefer push-style delivery.

use crate::error::StreamError;
use crate::sse::{DoneReason, ResponseInfo, StreamEvent};

type OpenFn = Box<dyn FnMut(&ResponseInfo) + Send>;
type TokenFn = Box<dyn FnMut(&str) + Send>;
type DoneFn = Box<dyn FnMut(&DoneReason) + Send>;
type ErrorFn = Box<dyn FnMut(&StreamError) + Send>;

/// Optional handlers invoked by [`StreamClient::run`](crate::StreamClient::run).
///
/// Handlers run synchronously on the stream's task; a slow handler stalls
/// the stream. Panics are not caught.
///
/// # Example
///
/// ```ignore
/// use gradquest_stream::StreamCallbacks;
///
/// let callbacks = StreamCallbacks::new()
///     .on_token(|text| print!("{}", text))
///     .on_done(|reason| println!("\n[{}]", reason.as_str()))
///     .on_error(|err| eprintln!("{}", err.user_message()));
/// ```
#[derive(Default)]
pub struct StreamCallbacks {
    on_open: Option<OpenFn>,
    on_token: Option<TokenFn>,
    on_done: Option<DoneFn>,
    on_error: Option<ErrorFn>,
}

impl StreamCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once the backend accepts the request.
    pub fn on_open(mut self, f: impl FnMut(&ResponseInfo) + Send + 'static) -> Self {
        self.on_open = Some(Box::new(f));
        self
    }

    /// Called for every non-empty token, in stream order.
    pub fn on_token(mut self, f: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_token = Some(Box::new(f));
        self
    }

    /// Called at most once, after all preceding tokens.
    pub fn on_done(mut self, f: impl FnMut(&DoneReason) + Send + 'static) -> Self {
        self.on_done = Some(Box::new(f));
        self
    }

    /// Called at most once, on transport failure.
    pub fn on_error(mut self, f: impl FnMut(&StreamError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// Invoke the handler matching `event`, if one is set.
    pub fn dispatch(&mut self, event: &StreamEvent) {
        match event {
            StreamEvent::Open(info) => {
                if let Some(f) = self.on_open.as_mut() {
                    f(info);
                }
            }
            StreamEvent::Token(text) => {
                if let Some(f) = self.on_token.as_mut() {
                    f(text);
                }
            }
            StreamEvent::Done(reason) => {
                if let Some(f) = self.on_done.as_mut() {
                    f(reason);
                }
            }
            StreamEvent::Error(err) => {
                if let Some(f) = self.on_error.as_mut() {
                    f(err);
                }
            }
        }
    }
}

impl std::fmt::Debug for StreamCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamCallbacks")
            .field("on_open", &self.on_open.is_some())
            .field("on_token", &self.on_token.is_some())
            .field("on_done", &self.on_done.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_dispatch_routes_events() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
        let mut callbacks = StreamCallbacks::new()
            .on_token(move |t| l1.lock().unwrap().push(format!("token:{}", t)))
            .on_done(move |r| l2.lock().unwrap().push(format!("done:{}", r.as_str())))
            .on_error(move |e| l3.lock().unwrap().push(format!("error:{}", e)));

        callbacks.dispatch(&StreamEvent::Token("hi".to_string()));
        callbacks.dispatch(&StreamEvent::Done(DoneReason::Eof));
        callbacks.dispatch(&StreamEvent::Error(StreamError::HttpStatus { status: 500 }));

        assert_eq!(
            *log.lock().unwrap(),
            vec!["token:hi", "done:eof", "error:HTTP 500"]
        );
    }

    #[test]
    fn test_missing_handlers_are_skipped() {
        let mut callbacks = StreamCallbacks::new();
        callbacks.dispatch(&StreamEvent::Token("ignored".to_string()));
        callbacks.dispatch(&StreamEvent::Done(DoneReason::Done));
        assert!(format!("{:?}", callbacks).contains("on_token: false"));
    }
}
