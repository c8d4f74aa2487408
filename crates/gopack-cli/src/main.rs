//! gopack CLI binary.
//!
//! This is the entry point for the `gopack` command-line tool. It initializes
//! logging via `tracing`, parses arguments with `clap`, wires Ctrl-C to the
//! run's cancellation token, and maps failures to the process exit status.

mod cli;
mod commands;

use std::time::Duration;

use gopack_core::session::Session;
use gopack_util::errors::GopackError;
use gopack_util::progress::error_block;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse();
    let code = match run(args).await {
        Ok(code) => code,
        Err(err) => match err.downcast_ref::<GopackError>() {
            Some(validation @ GopackError::Validation { .. }) => {
                error_block(&validation.to_string());
                validation.exit_code()
            }
            Some(other) => {
                eprintln!("{err:?}");
                other.exit_code()
            }
            None => {
                eprintln!("{err:?}");
                1
            }
        },
    };
    std::process::exit(code);
}

async fn run(args: cli::Cli) -> miette::Result<i32> {
    let cwd = std::env::current_dir().map_err(GopackError::Io)?;
    let cancel = CancellationToken::new();
    let session = Session::from_env(&cwd)
        .with_cancel(cancel.clone())
        .with_fetch_timeout(args.fetch_timeout.map(Duration::from_secs));

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping after the current step");
            cancel.cancel();
        }
    });

    tokio::task::spawn_blocking(move || commands::dispatch(args, &session))
        .await
        .map_err(|e| GopackError::Generic {
            message: format!("Command task failed: {e}"),
        })?
}
