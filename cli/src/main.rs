//! `restwrap`: send one request through the client core and print the
//! decoded JSON.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use restwrap_core::{Client, ClientError, ErrorKind};
use serde_json::Value;
use tracing::error;

mod cli;

use cli::Cli;

/// Process exit codes.
#[repr(u8)]
enum Exit {
    Success = 0,
    GeneralError = 1,
    InvalidRequest = 2,
    Unauthorized = 3,
    Missing = 4,
    Timeout = 5,
    InvalidResponse = 6,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

impl From<&anyhow::Error> for Exit {
    fn from(err: &anyhow::Error) -> Self {
        let Some(err) = err.downcast_ref::<ClientError>() else {
            return Exit::GeneralError;
        };
        match err.kind() {
            ErrorKind::InvalidRequest => Exit::InvalidRequest,
            ErrorKind::Unauthorized | ErrorKind::Forbidden => Exit::Unauthorized,
            ErrorKind::NotFound | ErrorKind::Conflict => Exit::Missing,
            ErrorKind::Timeout => Exit::Timeout,
            ErrorKind::InvalidResponse => Exit::InvalidResponse,
            ErrorKind::Failure => Exit::GeneralError,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to create tokio runtime: {e}");
            return Exit::GeneralError.into();
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => Exit::Success.into(),
        Err(e) => {
            error!("{e:#}");
            Exit::from(&e).into()
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = Client::new(cli.config())?;
    let value: Value = client.execute(cli.request()).await?;
    let rendered = serde_json::to_string_pretty(&value).context("failed to render response")?;
    println!("{rendered}");
    Ok(())
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("restwrap_core=debug,warn"),
        _ => EnvFilter::new("restwrap_core=trace,debug"),
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(verbose >= 2))
        .init();
}
