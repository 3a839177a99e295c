//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

use crate::commands::record::RecordCommand;

/// Command-line client for Skygear record databases.
#[derive(Parser, Debug)]
#[command(name = "skycli")]
#[command(author, version = env!("SKYCLI_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection settings; each overrides its environment variable and the
/// config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Skygear server endpoint [env: SKYCLI_ENDPOINT]
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Application API key [env: SKYCLI_API_KEY]
    #[arg(long, global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Access token of the signed-in user [env: SKYCLI_ACCESS_TOKEN]
    #[arg(long, global = true, value_name = "TOKEN")]
    pub access_token: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Modify records in database
    ///
    /// Provides Create, Read, Update and Delete functionality for records.
    Record(RecordCommand),
}
