//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - Streaming transport using reqwest
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides [`mock::MockHttpClient`], a scripted
//! transport for tests.

pub mod mock;
pub mod reqwest_http;

pub use mock::{MockChunk, MockHttpClient, MockResponse};
pub use reqwest_http::ReqwestHttpClient;
