//! Delete records command implementation.

use anyhow::{Context, Result};
use clap::Args;

use skycli_core::{Container, DatabaseScope, RecordId, Transport, record::ID_KEY};

use super::{ItemWarning, connect, partition_items};
use crate::cli::ConnectionArgs;
use crate::output;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Records to delete, as <type>/<id>
    #[arg(required = true, value_name = "RECORD_ID")]
    pub record_ids: Vec<String>,
}

/// What the service reported for a batch delete.
#[derive(Debug, Default)]
pub struct DeleteOutcome {
    pub deleted: Vec<String>,
    pub warnings: Vec<ItemWarning>,
}

pub async fn run(args: DeleteArgs, scope: DatabaseScope, connection: &ConnectionArgs) -> Result<()> {
    let ids = parse_ids(&args.record_ids)?;
    let container = connect(connection)?;

    let outcome = execute(&container, scope, &ids).await?;

    for warning in &outcome.warnings {
        output::warning(warning);
    }
    for id in &outcome.deleted {
        output::success(&format!("Deleted record {}", id));
    }

    Ok(())
}

/// Validate every identifier; the first invalid one fails the command.
pub(crate) fn parse_ids(args: &[String]) -> Result<Vec<RecordId>> {
    args.iter()
        .map(|arg| RecordId::new(arg).map_err(anyhow::Error::from))
        .collect()
}

pub(crate) async fn execute<T: Transport>(
    container: &Container<T>,
    scope: DatabaseScope,
    ids: &[RecordId],
) -> Result<DeleteOutcome> {
    let items = container
        .database(scope)
        .delete_records(ids)
        .await
        .context("Failed to delete records")?;

    let (records, mut warnings) = partition_items(items);

    let mut deleted = Vec::with_capacity(records.len());
    for record in records {
        match record.get(ID_KEY).and_then(|id| id.as_str()) {
            Some(id) => deleted.push(id.to_string()),
            None => warnings.push(ItemWarning::Unexpected),
        }
    }

    Ok(DeleteOutcome { deleted, warnings })
}
