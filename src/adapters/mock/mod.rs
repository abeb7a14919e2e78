//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - Streaming transport with scripted chunk sequences

pub mod http;

pub use http::{MockChunk, MockHttpClient, MockResponse, RecordedRequest};
