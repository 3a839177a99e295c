//! Record subcommand implementations.
//!
//! Every command validates its arguments before the configuration is
//! loaded, so malformed input never reaches the network.

mod delete;
mod edit;
mod export;
mod get;
mod import;
mod query;
mod set;

use std::fmt;

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::{Map, Value};
use tracing::debug;

use skycli_core::{Container, DatabaseScope, ResultItem, SkygearError};
use skycli_http::HttpTransport;

use crate::cli::ConnectionArgs;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct RecordCommand {
    /// Use the private database. Default is public.
    #[arg(short, long, global = true)]
    pub private: bool,

    #[command(subcommand)]
    pub command: RecordSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RecordSubcommand {
    /// Import records from a file to the database
    Import(import::ImportArgs),

    /// Export records from the database to a file
    Export(export::ExportArgs),

    /// Delete records from the database
    Delete(delete::DeleteArgs),

    /// Set fields on a record
    Set(set::SetArgs),

    /// Print the value of a record field
    Get(get::GetArgs),

    /// Edit a record in $EDITOR
    Edit(edit::EditArgs),

    /// Print every record of a type
    Query(query::QueryArgs),
}

pub async fn handle(cmd: RecordCommand, connection: &ConnectionArgs) -> Result<()> {
    let scope = DatabaseScope::from_private_flag(cmd.private);

    match cmd.command {
        RecordSubcommand::Import(args) => import::run(args),
        RecordSubcommand::Export(args) => export::run(args),
        RecordSubcommand::Delete(args) => delete::run(args, scope, connection).await,
        RecordSubcommand::Set(args) => set::run(args, scope, connection).await,
        RecordSubcommand::Get(args) => get::run(args, scope, connection).await,
        RecordSubcommand::Edit(args) => edit::run(args, scope, connection).await,
        RecordSubcommand::Query(args) => query::run(args, scope, connection).await,
    }
}

fn connect(connection: &ConnectionArgs) -> Result<Container<HttpTransport>> {
    Config::load(connection)?.connect()
}

/// A result list entry reported to the user instead of failing the command.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemWarning {
    Server(SkygearError),
    Unexpected,
}

impl ItemWarning {
    /// The record mapping of an entry, or the warning it raises.
    fn from_item(item: ResultItem) -> Result<Map<String, Value>, ItemWarning> {
        match item {
            ResultItem::Record(map) => Ok(map),
            ResultItem::Error(error) => Err(ItemWarning::Server(error)),
            ResultItem::Unexpected(value) => {
                debug!(%value, "Unexpected result item");
                Err(ItemWarning::Unexpected)
            }
        }
    }
}

/// Split result items into records and warnings, preserving order.
fn partition_items(items: Vec<ResultItem>) -> (Vec<Map<String, Value>>, Vec<ItemWarning>) {
    let mut records = Vec::new();
    let mut warnings = Vec::new();
    for item in items {
        match ItemWarning::from_item(item) {
            Ok(record) => records.push(record),
            Err(warning) => warnings.push(warning),
        }
    }
    (records, warnings)
}

impl fmt::Display for ItemWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemWarning::Server(error) => write!(f, "{}", error),
            ItemWarning::Unexpected => f.write_str("Encountered unexpected server data."),
        }
    }
}
