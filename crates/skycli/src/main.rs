//! skycli - command-line client for Skygear record databases.
//!
//! Record commands validate their arguments locally, then exchange a single
//! request with the configured endpoint (fetch-then-save for `edit`).

mod cli;
mod commands;
mod config;
mod editor;
mod output;

#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::record;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Record(record_cmd) => record::handle(record_cmd, &cli.connection).await,
    }
}

/// Logs go to stderr; stdout is reserved for record output.
fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
