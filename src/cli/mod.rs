//! CLI module for gq-stream.
//!
//! Parses the command line of the `gq-stream` binary, which opens one stream
//! against a backend endpoint and prints its tokens to stdout.

pub mod args;

pub use args::{parse_args, ArgsError, CliCommand, StreamArgs, URL_ENV};

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Usage text for `--help`.
pub const USAGE: &str = "\
Usage: gq-stream [--url <URL>] [--payload <JSON>] [-H 'Name: value']... [--stop-on-done]

Streams a chat or report response and prints tokens as they arrive.

Options:
  --url <URL>         Endpoint to POST to (default: $GQ_STREAM_URL)
  --payload <JSON>    Request body (default: {})
  -H, --header <H>    Extra request header, repeatable
  --stop-on-done      Stop reading at the first completion marker
  -V, --version       Print version
  -h, --help          Print this help

Logging is controlled with RUST_LOG (default: gradquest_stream=info).";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_format() {
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2, "Version should have at least major.minor");
    }

    #[test]
    fn test_usage_mentions_env_var() {
        assert!(USAGE.contains(URL_ENV));
    }
}
