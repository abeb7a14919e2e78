//! HTTP transport trait abstraction.
//!
//! Provides a trait-based abstraction over the streaming POST the decoder
//! consumes, enabling dependency injection and mocking in tests.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// A response body delivered as a sequence of byte chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// Response to a streaming request, before any body bytes are read.
pub struct StreamingResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Incremental body, `None` if the transport cannot expose one
    pub body: Option<ByteStream>,
}

impl StreamingResponse {
    /// Create a response with a streaming body.
    pub fn new(status: u16, body: ByteStream) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Some(body),
        }
    }

    /// Create a response that has no readable body.
    pub fn without_body(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Attach response headers.
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl std::fmt::Debug for StreamingResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body", &self.body.as_ref().map(|_| "<stream>"))
            .finish()
    }
}

/// HTTP client errors.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    /// Connection failed
    ConnectionFailed(String),
    /// Request timeout
    Timeout(String),
    /// IO error while reading the body
    Io(String),
    /// Invalid URL
    InvalidUrl(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            HttpError::Io(msg) => write!(f, "IO error: {}", msg),
            HttpError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            HttpError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// Trait for the streaming transport.
///
/// Implementations return the status and headers as soon as they are known
/// and hand over the body unread. Status handling is left to the caller, so
/// a non-success response is `Ok`.
///
/// # Example
///
/// ```ignore
/// use gradquest_stream::traits::{HttpClient, Headers};
///
/// let response = client.post_stream(url, r#"{"q":"hi"}"#, &Headers::new()).await?;
/// if let Some(mut body) = response.body {
///     while let Some(chunk) = body.next().await {
///         // ...
///     }
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a POST request and return a streaming response.
    ///
    /// # Arguments
    /// * `url` - The URL to request
    /// * `body` - Request body as a string
    /// * `headers` - Request headers
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<StreamingResponse, HttpError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_body() -> ByteStream {
        Box::pin(futures::stream::empty())
    }

    #[test]
    fn test_streaming_response_new() {
        let response = StreamingResponse::new(200, empty_body());
        assert_eq!(response.status, 200);
        assert!(response.headers.is_empty());
        assert!(response.body.is_some());
    }

    #[test]
    fn test_streaming_response_without_body() {
        let response = StreamingResponse::without_body(200);
        assert!(response.body.is_none());
        assert!(format!("{:?}", response).contains("None"));
    }

    #[test]
    fn test_streaming_response_with_headers() {
        let mut headers = Headers::new();
        headers.insert("content-type".to_string(), "text/event-stream".to_string());
        let response = StreamingResponse::new(200, empty_body()).with_headers(headers);
        assert_eq!(
            response.headers.get("content-type"),
            Some(&"text/event-stream".to_string())
        );
    }

    #[test]
    fn test_streaming_response_is_success() {
        assert!(StreamingResponse::without_body(200).is_success());
        assert!(StreamingResponse::without_body(204).is_success());
        assert!(StreamingResponse::without_body(299).is_success());
        assert!(!StreamingResponse::without_body(300).is_success());
        assert!(!StreamingResponse::without_body(404).is_success());
        assert!(!StreamingResponse::without_body(500).is_success());
    }

    #[test]
    fn test_http_error_display() {
        assert_eq!(
            HttpError::ConnectionFailed("refused".to_string()).to_string(),
            "Connection failed: refused"
        );
        assert_eq!(
            HttpError::Timeout("30s".to_string()).to_string(),
            "Request timeout: 30s"
        );
        assert_eq!(
            HttpError::Io("read failed".to_string()).to_string(),
            "IO error: read failed"
        );
        assert_eq!(
            HttpError::InvalidUrl("bad url".to_string()).to_string(),
            "Invalid URL: bad url"
        );
        assert_eq!(
            HttpError::Other("unknown".to_string()).to_string(),
            "HTTP error: unknown"
        );
    }
}
