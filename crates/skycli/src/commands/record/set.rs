//! Set record fields command implementation.

use anyhow::{Context, Result};
use clap::Args;

use skycli_core::{Container, DatabaseScope, Record, RecordId, Transport};

use super::connect;
use crate::cli::ConnectionArgs;
use crate::output;

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Record to write, as <type>/<id>
    #[arg(value_name = "RECORD_ID")]
    pub record_id: String,

    /// Field assignments; values are typed as integer, float, boolean or string
    #[arg(required = true, value_name = "KEY=VALUE")]
    pub assignments: Vec<String>,
}

pub async fn run(args: SetArgs, scope: DatabaseScope, connection: &ConnectionArgs) -> Result<()> {
    let record = build(&args.record_id, &args.assignments)?;
    let container = connect(connection)?;

    let saved = execute(&container, scope, &record).await?;

    output::success(&format!("Saved record {}", saved.id()));
    Ok(())
}

/// Build the record to save from the command arguments.
///
/// Only the assigned fields are sent; the service merges them into any
/// existing record.
pub(crate) fn build(record_id: &str, assignments: &[String]) -> Result<Record> {
    let mut record = Record::new(RecordId::new(record_id)?);
    for assignment in assignments {
        record.assign(assignment)?;
    }
    Ok(record)
}

pub(crate) async fn execute<T: Transport>(
    container: &Container<T>,
    scope: DatabaseScope,
    record: &Record,
) -> Result<Record> {
    container
        .database(scope)
        .save_record(record)
        .await
        .context("Failed to save record")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use serde_json::json;
    use skycli_core::FieldValue;
    use skycli_core::container::SAVE_RECORDS;

    fn assignments(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn assignments_are_typed() {
        let record = build(
            "note/1",
            &assignments(&["count=42", "ratio=0.5", "done=true", "title=a=b", "empty="]),
        )
        .unwrap();

        assert_eq!(record.get("count").unwrap(), &FieldValue::Number(42.into()));
        assert_eq!(record.get("ratio").unwrap(), &FieldValue::from_json(json!(0.5)));
        assert_eq!(record.get("done").unwrap(), &FieldValue::Boolean(true));
        assert_eq!(record.get("title").unwrap(), &FieldValue::from("a=b"));
        assert_eq!(record.get("empty").unwrap(), &FieldValue::from(""));
    }

    #[test]
    fn malformed_assignment_is_rejected() {
        let err = build("note/1", &assignments(&["count=1", "nope"])).unwrap_err();
        assert!(err.to_string().contains("malformed assignment 'nope'"));

        assert!(build("note/1", &assignments(&["=1"])).is_err());
    }

    #[test]
    fn invalid_id_is_rejected() {
        assert!(build("note", &assignments(&["count=1"])).is_err());
    }

    #[tokio::test]
    async fn saves_assigned_fields() {
        let container = MockTransport::new()
            .respond(
                SAVE_RECORDS,
                json!({"result": [{"_id": "note/1", "_type": "record", "count": 42}]}),
            )
            .container();
        let record = build("note/1", &assignments(&["count=42"])).unwrap();

        let saved = execute(&container, DatabaseScope::Public, &record).await.unwrap();
        assert_eq!(saved.id().to_string(), "note/1");

        let sent = container.transport().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, SAVE_RECORDS);
        assert_eq!(sent[0].1["records"], json!([{"_id": "note/1", "count": 42}]));
    }

    #[tokio::test]
    async fn error_item_is_fatal() {
        let container = MockTransport::new()
            .respond(
                SAVE_RECORDS,
                json!({"result": [{"_id": "note/1", "_type": "error", "message": "denied"}]}),
            )
            .container();
        let record = build("note/1", &assignments(&["count=1"])).unwrap();

        let err = execute(&container, DatabaseScope::Public, &record).await.unwrap_err();
        assert!(format!("{:#}", err).contains("denied"));
    }
}
