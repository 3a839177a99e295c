//! Query records command implementation.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args};
use serde_json::{Map, Value};
use tracing::{debug, info};

use skycli_core::{Container, DatabaseScope, RecordType, Transport};

use super::{ItemWarning, connect, partition_items};
use crate::cli::ConnectionArgs;
use crate::output;

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Type of the records to print
    #[arg(value_name = "RECORD_TYPE")]
    pub record_type: String,

    /// Write records to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print indented JSON
    #[arg(long)]
    pub pretty_print: bool,

    /// Download assets referenced by the records
    #[arg(
        short,
        long,
        value_name = "BOOL",
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub asset: bool,

    /// Directory to download assets into
    #[arg(short = 'd', long, value_name = "DIR")]
    pub basedir: Option<PathBuf>,
}

/// Where and how query results are written.
#[derive(Debug, Default)]
pub struct QueryOutput {
    pub path: Option<PathBuf>,
    pub pretty: bool,
}

impl From<&QueryArgs> for QueryOutput {
    fn from(args: &QueryArgs) -> Self {
        Self {
            path: args.output.clone(),
            pretty: args.pretty_print,
        }
    }
}

#[derive(Debug, Default)]
pub struct QueryOutcome {
    pub records: Vec<Map<String, Value>>,
    pub warnings: Vec<ItemWarning>,
}

pub async fn run(args: QueryArgs, scope: DatabaseScope, connection: &ConnectionArgs) -> Result<()> {
    let record_type = RecordType::new(args.record_type.as_str())?;
    if args.asset || args.basedir.is_some() {
        debug!(basedir = ?args.basedir, "Asset download is not supported; ignoring asset options");
    }
    let container = connect(connection)?;

    let outcome = execute(&container, scope, &record_type).await?;

    for warning in &outcome.warnings {
        output::warning(warning);
    }
    info!(count = outcome.records.len(), "Query returned records");

    write_records(&outcome.records, &QueryOutput::from(&args))
}

pub(crate) async fn execute<T: Transport>(
    container: &Container<T>,
    scope: DatabaseScope,
    record_type: &RecordType,
) -> Result<QueryOutcome> {
    let items = container
        .database(scope)
        .query(record_type)
        .await
        .context("Failed to query records")?;

    let (records, warnings) = partition_items(items);
    Ok(QueryOutcome { records, warnings })
}

/// One JSON document per record as sent by the server; indented when `pretty`.
pub(crate) fn write_records(records: &[Map<String, Value>], target: &QueryOutput) -> Result<()> {
    let mut out = output::destination(target.path.as_deref())?;
    for record in records {
        if target.pretty {
            output::json_pretty(&mut *out, record)?;
        } else {
            output::json(&mut *out, record)?;
        }
    }
    out.flush()?;
    Ok(())
}
