//! Mock HTTP transport for testing.
//!
//! Serves scripted chunk sequences so the decoder can be driven through any
//! fragmentation, failure or stall without a network.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, StreamingResponse};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body
    pub body: String,
}

/// One step of a scripted body.
#[derive(Debug, Clone)]
pub enum MockChunk {
    /// Deliver these bytes
    Data(Bytes),
    /// Fail the body read
    Error(HttpError),
    /// Never resolve; later steps are unreachable
    Pending,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Respond with a status and a scripted body
    Stream { status: u16, chunks: Vec<MockChunk> },
    /// Respond with a status but no readable body
    NoBody { status: u16 },
    /// Fail before any response
    Error(HttpError),
}

impl MockResponse {
    /// A 200 response whose body arrives as the given text chunks.
    pub fn sse<S: AsRef<str>>(chunks: &[S]) -> Self {
        MockResponse::Stream {
            status: 200,
            chunks: chunks
                .iter()
                .map(|c| MockChunk::Data(Bytes::copy_from_slice(c.as_ref().as_bytes())))
                .collect(),
        }
    }

    /// A 200 response whose body arrives as the given raw byte chunks.
    pub fn bytes(chunks: Vec<Vec<u8>>) -> Self {
        MockResponse::Stream {
            status: 200,
            chunks: chunks.into_iter().map(|c| MockChunk::Data(Bytes::from(c))).collect(),
        }
    }

    /// A response with the given status and an empty body.
    pub fn status(status: u16) -> Self {
        MockResponse::Stream {
            status,
            chunks: Vec::new(),
        }
    }
}

/// Body stream that tracks how many bodies are still held by a reader.
struct TrackedBody {
    inner: ByteStream,
    open: Arc<AtomicUsize>,
}

impl Stream for TrackedBody {
    type Item = Result<Bytes, HttpError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().inner.as_mut().poll_next(cx)
    }
}

impl Drop for TrackedBody {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Mock HTTP client for testing.
///
/// # Example
///
/// ```ignore
/// use gradquest_stream::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.set_response(
///     "http://backend/chat",
///     MockResponse::sse(&["data: {\"delta\":\"Hel", "lo\"}\n\ndata: [DONE]\n\n"]),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Configured responses by URL
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Response when no URL matches
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Bodies handed out and not yet dropped
    open_bodies: Arc<AtomicUsize>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a specific URL.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        lock(&self.responses).insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Number of response bodies that have not been dropped yet.
    pub fn open_bodies(&self) -> usize {
        self.open_bodies.load(Ordering::SeqCst)
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        if let Some(response) = lock(&self.responses).get(url) {
            return Some(response.clone());
        }
        lock(&self.default_response).clone()
    }

    fn body_stream(&self, chunks: Vec<MockChunk>) -> ByteStream {
        let mut items = Vec::new();
        let mut stalls = false;
        for chunk in chunks {
            match chunk {
                MockChunk::Data(bytes) => items.push(Ok(bytes)),
                MockChunk::Error(err) => items.push(Err(err)),
                MockChunk::Pending => {
                    stalls = true;
                    break;
                }
            }
        }

        let ready = futures::stream::iter(items);
        let inner: ByteStream = if stalls {
            Box::pin(futures::StreamExt::chain(ready, futures::stream::pending()))
        } else {
            Box::pin(ready)
        };

        self.open_bodies.fetch_add(1, Ordering::SeqCst);
        Box::pin(TrackedBody {
            inner,
            open: Arc::clone(&self.open_bodies),
        })
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<StreamingResponse, HttpError> {
        lock(&self.requests).push(RecordedRequest {
            url: url.to_string(),
            headers: headers.clone(),
            body: body.to_string(),
        });

        match self.get_response(url) {
            Some(MockResponse::Stream { status, chunks }) => {
                Ok(StreamingResponse::new(status, self.body_stream(chunks)))
            }
            Some(MockResponse::NoBody { status }) => Ok(StreamingResponse::without_body(status)),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn test_post_stream_with_chunks() {
        let client = MockHttpClient::new();
        client.set_response(
            "https://example.com/stream",
            MockResponse::sse(&["chunk1", "chunk2", "chunk3"]),
        );

        let response = client
            .post_stream("https://example.com/stream", "{}", &Headers::new())
            .await
            .unwrap();
        assert_eq!(response.status, 200);

        let mut body = response.body.unwrap();
        let mut chunks = Vec::new();
        while let Some(result) = body.next().await {
            chunks.push(result.unwrap());
        }

        assert_eq!(
            chunks,
            vec![
                Bytes::from("chunk1"),
                Bytes::from("chunk2"),
                Bytes::from("chunk3")
            ]
        );
    }

    #[tokio::test]
    async fn test_requests_are_recorded() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::status(200));

        let mut headers = Headers::new();
        headers.insert("Authorization".to_string(), "Bearer token123".to_string());
        client
            .post_stream("https://example.com/chat", r#"{"q":"hi"}"#, &headers)
            .await
            .unwrap();

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://example.com/chat");
        assert_eq!(requests[0].body, r#"{"q":"hi"}"#);
        assert_eq!(
            requests[0].headers.get("Authorization"),
            Some(&"Bearer token123".to_string())
        );
    }

    #[tokio::test]
    async fn test_no_body_and_errors() {
        let client = MockHttpClient::new();
        client.set_response("https://example.com/nobody", MockResponse::NoBody { status: 200 });
        client.set_response(
            "https://example.com/down",
            MockResponse::Error(HttpError::ConnectionFailed("refused".to_string())),
        );

        let response = client
            .post_stream("https://example.com/nobody", "{}", &Headers::new())
            .await
            .unwrap();
        assert!(response.body.is_none());

        let err = client
            .post_stream("https://example.com/down", "{}", &Headers::new())
            .await
            .unwrap_err();
        assert_eq!(err, HttpError::ConnectionFailed("refused".to_string()));

        let err = client
            .post_stream("https://example.com/missing", "{}", &Headers::new())
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Other(_)));
    }

    #[tokio::test]
    async fn test_open_bodies_tracks_drops() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::Stream {
            status: 200,
            chunks: vec![MockChunk::Data(Bytes::from("a")), MockChunk::Pending],
        });

        let response = client
            .post_stream("https://example.com/hang", "{}", &Headers::new())
            .await
            .unwrap();
        assert_eq!(client.open_bodies(), 1);

        let mut body = response.body.unwrap();
        assert_eq!(body.next().await.unwrap().unwrap(), Bytes::from("a"));

        drop(body);
        assert_eq!(client.open_bodies(), 0);
    }
}
