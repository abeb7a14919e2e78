//! Error category classification.
//!
//! A coarse classification of stream errors so callers can decide between
//! retrying, reporting a backend problem, or fixing their request.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection, timeout or mid-stream transport failure.
    /// Generally transient and retryable.
    Network,

    /// Backend answered with a 5xx status.
    /// Generally transient and retryable after delay.
    Server,

    /// The request was rejected (4xx) or the environment cannot stream.
    /// Not retryable without a change on the caller's side.
    Client,

    /// Invalid endpoint or request configuration.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient
    /// and the operation can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your internet connection and try again",
            ErrorCategory::Server => {
                "The server may be experiencing issues. Please try again later"
            }
            ErrorCategory::Client => "The request was rejected. Check the endpoint and payload",
            ErrorCategory::Configuration => "Check the stream endpoint URL",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
