//! Error handling for stream consumption.
//!
//! - **Error Categories**: High-level classification for handling decisions
//! - **StreamError**: Transport failures surfaced to the caller
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection, timeout, mid-stream failure | Yes |
//! | Server | Backend 5xx | Yes |
//! | Client | 4xx, body not streamable | No |
//! | Configuration | Invalid endpoint | No |

mod category;
mod stream;

pub use category::ErrorCategory;
pub use stream::StreamError;
