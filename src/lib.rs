//! GradQuest stream decoder - incremental Server-Sent Events consumption
//! for the chat and report generation backends.
//!
//! Bytes arrive from an [`HttpClient`](traits::HttpClient), are decoded and
//! cut into frames by [`sse::FrameSplitter`], and each frame is turned into
//! at most one [`StreamEvent`] by [`sse::EventInterpreter`]. A
//! [`StreamClient`] drives that pipeline either as a lazy event stream or
//! through [`StreamCallbacks`].

pub mod adapters;
pub mod callbacks;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod sse;
pub mod traits;

pub use callbacks::StreamCallbacks;
pub use client::{EventStream, StreamClient, StreamOutcome};
pub use config::{ClientSettings, StreamRequest};
pub use error::{ErrorCategory, StreamError};
pub use session::StreamSession;
pub use sse::{DoneReason, ResponseInfo, StreamEvent};
