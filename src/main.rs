use std::io::{self, Write};

use color_eyre::Result;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use gradquest_stream::cli::{parse_args, CliCommand, StreamArgs, URL_ENV, USAGE, VERSION};
use gradquest_stream::{ClientSettings, StreamCallbacks, StreamClient, StreamOutcome};

const DEFAULT_LOG_FILTER: &str = "gradquest_stream=info";

/// Install the stderr log subscriber; `RUST_LOG` overrides the default filter.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run_stream(args: StreamArgs) -> Result<()> {
    let client = StreamClient::with_settings(&ClientSettings::from_env())?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let request = args.into_request().with_cancel_token(cancel);
    let callbacks = StreamCallbacks::new()
        .on_token(|text| {
            let mut stdout = io::stdout().lock();
            // A closed stdout just means nobody is reading any more
            let _ = stdout.write_all(text.as_bytes());
            let _ = stdout.flush();
        })
        .on_done(|reason| {
            println!();
            match serde_json::to_string(reason) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{{\"reason\":\"{}\"}}", reason.as_str()),
            }
        })
        .on_error(|err| {
            eprintln!("{} ({})", err.user_message(), err.category().recovery_hint());
        });

    match client.run(request, callbacks).await {
        StreamOutcome::Completed(_) => Ok(()),
        StreamOutcome::Cancelled => {
            eprintln!("\ncancelled");
            Ok(())
        }
        StreamOutcome::Failed(err) => Err(err.into()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let command = parse_args(std::env::args(), std::env::var(URL_ENV).ok())?;
    match command {
        CliCommand::Version => println!("gq-stream {}", VERSION),
        CliCommand::Help => println!("{}", USAGE),
        CliCommand::Stream(args) => {
            init_logging();
            run_stream(args).await?;
        }
    }

    Ok(())
}
