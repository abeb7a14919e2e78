//! Command-line argument parsing for the gq-stream binary.

use thiserror::Error;

use crate::config::StreamRequest;

/// Environment variable used when `--url` is not given.
pub const URL_ENV: &str = "GQ_STREAM_URL";

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Open a stream and print its tokens
    Stream(StreamArgs),
}

/// Arguments for a stream run.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamArgs {
    pub url: String,
    pub payload: serde_json::Value,
    pub headers: Vec<(String, String)>,
    pub stop_on_done: bool,
}

impl StreamArgs {
    /// Build the stream request these arguments describe.
    pub fn into_request(self) -> StreamRequest {
        self.headers.into_iter().fold(
            StreamRequest::new(self.url, self.payload).with_stop_on_done(self.stop_on_done),
            |request, (name, value)| request.with_header(name, value),
        )
    }
}

/// Argument errors.
#[derive(Debug, Error, PartialEq)]
pub enum ArgsError {
    #[error("no endpoint given: pass --url or set GQ_STREAM_URL")]
    MissingUrl,
    #[error("{0} requires a value")]
    MissingValue(String),
    #[error("--payload is not valid JSON: {0}")]
    InvalidPayload(String),
    #[error("--header must look like 'Name: value', got '{0}'")]
    InvalidHeader(String),
    #[error("unknown argument: {0}")]
    UnknownArgument(String),
}

/// Parse command-line arguments and return the command to execute.
///
/// # Arguments
///
/// * `args` - Iterator of command-line arguments (typically `std::env::args()`)
/// * `env_url` - Fallback endpoint, usually the value of [`URL_ENV`]
///
/// # Examples
///
/// ```
/// use gradquest_stream::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["gq-stream".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter(), None), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I, env_url: Option<String>) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut url = None;
    let mut payload = serde_json::Value::Object(Default::default());
    let mut headers = Vec::new();
    let mut stop_on_done = false;

    // Skip the program name
    let mut args = args.skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--url" => url = Some(value_for(&arg, args.next())?),
            "--payload" => {
                let raw = value_for(&arg, args.next())?;
                payload = serde_json::from_str(&raw)
                    .map_err(|e| ArgsError::InvalidPayload(e.to_string()))?;
            }
            "--header" | "-H" => {
                let raw = value_for(&arg, args.next())?;
                let (name, value) = raw
                    .split_once(':')
                    .filter(|(name, _)| !name.trim().is_empty())
                    .ok_or_else(|| ArgsError::InvalidHeader(raw.clone()))?;
                headers.push((name.trim().to_string(), value.trim().to_string()));
            }
            "--stop-on-done" => stop_on_done = true,
            other => return Err(ArgsError::UnknownArgument(other.to_string())),
        }
    }

    let url = url
        .or(env_url)
        .filter(|u| !u.trim().is_empty())
        .ok_or(ArgsError::MissingUrl)?;

    Ok(CliCommand::Stream(StreamArgs {
        url,
        payload,
        headers,
        stop_on_done,
    }))
}

fn value_for(flag: &str, value: Option<String>) -> Result<String, ArgsError> {
    value.ok_or_else(|| ArgsError::MissingValue(flag.to_string()))
}
