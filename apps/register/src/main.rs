//! # Tally Register Entry Point
//!
//! Terminal quick-sale register for Tally POS.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()        RUST_LOG or "info,tally=debug", to stderr    │
//! │  2. RegisterConfig::load  defaults → register.toml → TALLY_* env       │
//! │  3. --api-url override    re-validated                                 │
//! │  4. ApiClient             reqwest client with timeout and token        │
//! │  5. Register loop         one command per line until quit / EOF        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod commands;
mod register;
mod render;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tally_client::{ApiClient, ClientError, QuickSaleSession, RegisterConfig};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use commands::Command;
use register::{Register, Reply};

/// Terminal quick-sale register for Tally POS.
#[derive(Debug, Parser)]
#[command(name = "tally-register", version)]
struct Args {
    /// Path to register.toml (defaults to the platform config directory).
    #[arg(long, env = "TALLY_CONFIG")]
    config: Option<PathBuf>,

    /// Backend base URL, overriding config and TALLY_API_URL.
    #[arg(long)]
    api_url: Option<String>,
}

#[derive(Debug, Error)]
enum RegisterError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Register stopped");
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), RegisterError> {
    let mut config = RegisterConfig::load(args.config)?;
    if let Some(url) = args.api_url {
        config.api.base_url = url;
        config.validate()?;
    }

    let api = Arc::new(ApiClient::from_config(&config)?);
    info!(api = %api.base_url(), limit = config.search_limit(), "Register ready");

    let session = QuickSaleSession::new(api, config.search_limit());
    let mut register = Register::new(session, config.currency_symbol());

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut output = tokio::io::stdout();

    output
        .write_all(b"Tally register. Type 'help' for commands.\n> ")
        .await?;
    output.flush().await?;

    while let Some(line) = input.next_line().await? {
        let reply = match Command::parse(&line) {
            Ok(Some(command)) => register.execute(command).await,
            Ok(None) => Default::default(),
            Err(err) => Reply::error(err),
        };

        for line in &reply.lines {
            output.write_all(line.as_bytes()).await?;
            output.write_all(b"\n").await?;
        }
        if reply.quit {
            break;
        }
        output.write_all(b"> ").await?;
        output.flush().await?;
    }

    if !register.session().ticket().is_empty() {
        info!("Leaving with an unsubmitted ticket; it was not sent");
    }

    output.flush().await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tally=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
