//! Get record field command implementation.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;

use skycli_core::{Container, DatabaseScope, FieldValue, RecordId, Transport};

use super::connect;
use crate::cli::ConnectionArgs;
use crate::output;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Record to read, as <type>/<id>
    #[arg(value_name = "RECORD_ID")]
    pub record_id: String,

    /// Field to print
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Write the value to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Download the asset referenced by the field
    #[arg(short, long)]
    pub asset: bool,
}

/// Where and how a fetched value is written.
#[derive(Debug, Default)]
pub struct GetOutput {
    pub path: Option<PathBuf>,
    pub asset: bool,
}

impl From<&GetArgs> for GetOutput {
    fn from(args: &GetArgs) -> Self {
        Self {
            path: args.output.clone(),
            asset: args.asset,
        }
    }
}

pub async fn run(args: GetArgs, scope: DatabaseScope, connection: &ConnectionArgs) -> Result<()> {
    let id = RecordId::new(&args.record_id)?;
    let container = connect(connection)?;

    let value = execute(&container, scope, &id, &args.key).await?;
    write_value(&value, &GetOutput::from(&args))
}

pub(crate) async fn execute<T: Transport>(
    container: &Container<T>,
    scope: DatabaseScope,
    id: &RecordId,
    key: &str,
) -> Result<FieldValue> {
    let record = container
        .database(scope)
        .fetch_record(id)
        .await
        .context("Failed to fetch record")?;

    Ok(record.get(key)?.clone())
}

pub(crate) fn write_value(value: &FieldValue, target: &GetOutput) -> Result<()> {
    if let (true, FieldValue::Asset(name)) = (target.asset, value) {
        bail!("Cannot fetch asset '{}': asset download is not supported", name);
    }

    let mut out = output::destination(target.path.as_deref())?;
    output::value(&mut *out, value)?;
    out.flush()?;
    Ok(())
}
