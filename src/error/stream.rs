//! Streaming-related error types.
//!
//! Only transport-level failures become errors. Framing irregularities are
//! absorbed by the decoder and cancellation is not an error at all.

use thiserror::Error;

use super::category::ErrorCategory;
use crate::traits::HttpError;

/// Ways a stream can fail.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The backend answered with a non-success status; no frames were read.
    #[error("HTTP {status}")]
    HttpStatus { status: u16 },

    /// The response has no body that can be read incrementally.
    #[error("response body is not available as a byte stream")]
    BodyUnavailable,

    /// The request could not be sent.
    #[error("failed to open stream: {0}")]
    Connect(#[source] HttpError),

    /// The body failed while it was being read.
    #[error("stream interrupted: {0}")]
    Interrupted(#[source] HttpError),
}

impl StreamError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            StreamError::HttpStatus { status } if *status >= 500 => ErrorCategory::Server,
            StreamError::HttpStatus { .. } | StreamError::BodyUnavailable => ErrorCategory::Client,
            StreamError::Connect(HttpError::InvalidUrl(_)) => ErrorCategory::Configuration,
            StreamError::Connect(_) | StreamError::Interrupted(_) => ErrorCategory::Network,
        }
    }

    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            // 429 is the one client status worth another attempt
            StreamError::HttpStatus { status: 429 } => true,
            other => other.category().is_retryable(),
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::HttpStatus { status } => {
                format!("The server rejected the request (HTTP {}).", status)
            }
            StreamError::BodyUnavailable => {
                "Streaming responses are not supported by this transport.".to_string()
            }
            StreamError::Connect(_) => {
                "Could not reach the server. Please check your connection.".to_string()
            }
            StreamError::Interrupted(_) => {
                "The connection was lost while the answer was streaming.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::HttpStatus { .. } => "E_STREAM_STATUS",
            StreamError::BodyUnavailable => "E_STREAM_NO_BODY",
            StreamError::Connect(_) => "E_STREAM_CONNECT",
            StreamError::Interrupted(_) => "E_STREAM_INTERRUPTED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_http_status_display_matches_wire_message() {
        assert_eq!(StreamError::HttpStatus { status: 502 }.to_string(), "HTTP 502");
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            StreamError::HttpStatus { status: 503 }.category(),
            ErrorCategory::Server
        );
        assert_eq!(
            StreamError::HttpStatus { status: 404 }.category(),
            ErrorCategory::Client
        );
        assert_eq!(StreamError::BodyUnavailable.category(), ErrorCategory::Client);
        assert_eq!(
            StreamError::Connect(HttpError::InvalidUrl("nope".to_string())).category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            StreamError::Interrupted(HttpError::Io("reset".to_string())).category(),
            ErrorCategory::Network
        );
    }

    #[test]
    fn test_retryable() {
        assert!(StreamError::HttpStatus { status: 500 }.is_retryable());
        assert!(StreamError::HttpStatus { status: 429 }.is_retryable());
        assert!(!StreamError::HttpStatus { status: 400 }.is_retryable());
        assert!(!StreamError::BodyUnavailable.is_retryable());
        assert!(StreamError::Connect(HttpError::Timeout("30s".to_string())).is_retryable());
    }

    #[test]
    fn test_source_chain() {
        let err = StreamError::Interrupted(HttpError::Io("reset by peer".to_string()));
        assert_eq!(err.to_string(), "stream interrupted: IO error: reset by peer");
        assert!(err.source().is_some());
        assert!(StreamError::BodyUnavailable.source().is_none());
    }

    #[test]
    fn test_error_codes_and_messages_are_set() {
        let errors = vec![
            StreamError::HttpStatus { status: 500 },
            StreamError::BodyUnavailable,
            StreamError::Connect(HttpError::Other("x".to_string())),
            StreamError::Interrupted(HttpError::Other("y".to_string())),
        ];
        for err in errors {
            assert!(err.error_code().starts_with("E_STREAM_"));
            assert!(!err.user_message().is_empty());
        }
    }
}
