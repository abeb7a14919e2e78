//! Stream request and client configuration.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::traits::Headers;

/// Environment variable overriding the connect timeout, in seconds.
pub const CONNECT_TIMEOUT_ENV: &str = "GQ_STREAM_CONNECT_TIMEOUT_SECS";

/// Default connect timeout for the reqwest transport.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything needed to open one stream.
///
/// Use the builder methods to customize the request.
///
/// # Example
///
/// ```ignore
/// use gradquest_stream::StreamRequest;
///
/// let request = StreamRequest::new("http://localhost:8000/api/agent/chat", payload)
///     .with_header("Authorization", "Bearer abc")
///     .with_stop_on_done(true);
/// ```
#[derive(Debug, Clone)]
pub struct StreamRequest {
    /// Target endpoint for the POST
    pub endpoint: String,
    /// JSON body sent with the request
    pub payload: serde_json::Value,
    /// Extra headers, applied over the defaults
    pub headers: Headers,
    /// Cancels the stream when triggered
    pub cancel: CancellationToken,
    /// End the session at the first completion instead of reading to EOF
    pub stop_on_done: bool,
}

impl StreamRequest {
    /// Create a request with default headers and a fresh cancellation token.
    pub fn new(endpoint: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            endpoint: endpoint.into(),
            payload,
            headers: Headers::new(),
            cancel: CancellationToken::new(),
            stop_on_done: false,
        }
    }

    /// Add or override a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Set whether the session ends at the first completion.
    pub fn with_stop_on_done(mut self, stop: bool) -> Self {
        self.stop_on_done = stop;
        self
    }

    /// Headers sent on the wire: event-stream defaults plus caller overrides.
    pub fn request_headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());
        headers.insert("Cache-Control".to_string(), "no-cache".to_string());
        for (name, value) in &self.headers {
            // Header names are case-insensitive on the wire
            headers.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
            headers.insert(name.clone(), value.clone());
        }
        headers
    }
}

/// Settings for the production HTTP transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    /// Time allowed to establish the connection
    pub connect_timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: format!("gq-stream/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientSettings {
    /// Create settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Create settings from the environment.
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let settings = Self::default();
        match std::env::var(CONNECT_TIMEOUT_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            Some(secs) => settings.with_connect_timeout(Duration::from_secs(secs)),
            None => settings,
        }
    }
}
