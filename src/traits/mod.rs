//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - Streaming POST transport

pub mod http;

pub use http::{ByteStream, Headers, HttpClient, HttpError, StreamingResponse};
