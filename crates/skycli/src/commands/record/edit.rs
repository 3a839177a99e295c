//! Edit record command implementation.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use skycli_core::{Container, DatabaseScope, Record, RecordId, RecordType, Transport};

use super::connect;
use crate::cli::ConnectionArgs;
use crate::editor::{Editor, ExternalEditor, edit_record};
use crate::output;

#[derive(Args, Debug)]
pub struct EditArgs {
    /// A record id (<type>/<id>) to edit, or a bare type to create a new record
    #[arg(value_name = "RECORD_TYPE_OR_ID")]
    pub target: String,

    /// Create a new record instead of fetching an existing one
    #[arg(short, long)]
    pub new: bool,
}

/// The record an edit starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    /// Start from an empty record with this id.
    Create(RecordId),
    /// Start from the stored record.
    Existing(RecordId),
}

impl EditTarget {
    /// Resolve the command argument.
    ///
    /// A bare type gets a fresh random id and always creates.
    pub fn resolve(arg: &str, force_new: bool) -> Result<Self> {
        if !arg.contains('/') {
            let record_type = RecordType::new(arg)?;
            return Ok(EditTarget::Create(RecordId::generate(record_type)));
        }

        let id = RecordId::new(arg)?;
        Ok(if force_new {
            EditTarget::Create(id)
        } else {
            EditTarget::Existing(id)
        })
    }
}

pub async fn run(args: EditArgs, scope: DatabaseScope, connection: &ConnectionArgs) -> Result<()> {
    let target = EditTarget::resolve(&args.target, args.new)?;
    let container = connect(connection)?;
    let editor = ExternalEditor::from_env();

    let saved = execute(&container, scope, target, &editor).await?;

    output::success(&format!("Saved record {}", saved.id()));
    Ok(())
}

pub(crate) async fn execute<T, E>(
    container: &Container<T>,
    scope: DatabaseScope,
    target: EditTarget,
    editor: &E,
) -> Result<Record>
where
    T: Transport,
    E: Editor + ?Sized,
{
    let database = container.database(scope);

    let mut record = match target {
        EditTarget::Create(id) => {
            info!(%id, "Creating new record");
            Record::new(id)
        }
        EditTarget::Existing(id) => database
            .fetch_record(&id)
            .await
            .context("Failed to fetch record")?,
    };

    edit_record(editor, &mut record).context("Failed to edit record")?;

    database
        .save_record(&record)
        .await
        .context("Failed to save record")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::EditorError;
    use crate::testing::MockTransport;
    use serde_json::json;
    use skycli_core::container::{FETCH_RECORDS, SAVE_RECORDS};
    use std::path::Path;

    fn saving() -> MockTransport {
        MockTransport::new().respond(SAVE_RECORDS, json!({"result": [{"_id": "note/1", "_type": "record"}]}))
    }

    #[test]
    fn bare_type_creates_with_fresh_id() {
        let EditTarget::Create(first) = EditTarget::resolve("note", false).unwrap() else {
            panic!("expected create");
        };
        let EditTarget::Create(second) = EditTarget::resolve("note", false).unwrap() else {
            panic!("expected create");
        };

        assert_eq!(first.record_type().as_str(), "note");
        assert!(!first.key().is_empty());
        assert_ne!(first, second);
    }

    #[test]
    fn record_id_fetches_unless_new() {
        let id = RecordId::new("note/1").unwrap();
        assert_eq!(EditTarget::resolve("note/1", false).unwrap(), EditTarget::Existing(id.clone()));
        assert_eq!(EditTarget::resolve("note/1", true).unwrap(), EditTarget::Create(id));
    }

    #[test]
    fn invalid_target_is_rejected() {
        assert!(EditTarget::resolve("note/1/2", false).is_err());
        assert!(EditTarget::resolve("/1", false).is_err());
        assert!(EditTarget::resolve("", false).is_err());
    }

    #[tokio::test]
    async fn bare_type_never_fetches_before_editing() {
        let container = saving().container();
        let target = EditTarget::resolve("note", false).unwrap();
        let editor = |path: &Path| -> Result<(), EditorError> {
            assert!(container.transport().sent().is_empty());
            let document = std::fs::read_to_string(path)?;
            std::fs::write(path, document.replace('}', ", \"title\": \"new\"}"))?;
            Ok(())
        };

        execute(&container, DatabaseScope::Public, target, &editor).await.unwrap();

        let sent = container.transport().sent();
        assert_eq!(container.transport().actions(), vec![SAVE_RECORDS]);
        assert_eq!(sent[0].1["records"][0]["title"], "new");
    }

    #[tokio::test]
    async fn existing_record_is_fetched_edited_and_saved() {
        let container = saving()
            .respond(
                FETCH_RECORDS,
                json!({"result": [{"_id": "note/1", "title": "old", "count": 1}]}),
            )
            .container();
        let target = EditTarget::resolve("note/1", false).unwrap();
        let editor = |path: &Path| -> Result<(), EditorError> {
            let document = std::fs::read_to_string(path)?;
            std::fs::write(path, document.replace("old", "new"))?;
            Ok(())
        };

        execute(&container, DatabaseScope::Private, target, &editor).await.unwrap();

        let sent = container.transport().sent();
        assert_eq!(container.transport().actions(), vec![FETCH_RECORDS, SAVE_RECORDS]);
        assert_eq!(
            sent[1].1["records"],
            json!([{"_id": "note/1", "title": "new", "count": 1}])
        );
        assert_eq!(sent[1].1["database_id"], "_private");
    }

    #[tokio::test]
    async fn invalid_edit_is_not_saved() {
        let container = saving().container();
        let target = EditTarget::resolve("note/1", true).unwrap();
        let editor = |path: &Path| -> Result<(), EditorError> {
            std::fs::write(path, "not json")?;
            Ok(())
        };

        let err = execute(&container, DatabaseScope::Public, target, &editor).await.unwrap_err();

        assert!(err.to_string().contains("Failed to edit record"));
        assert!(container.transport().sent().is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_skips_editor() {
        let container = MockTransport::new()
            .respond(
                FETCH_RECORDS,
                json!({"result": [{"_id": "note/1", "_type": "error", "message": "record not found"}]}),
            )
            .container();
        let target = EditTarget::resolve("note/1", false).unwrap();
        let editor = |_: &Path| -> Result<(), EditorError> { panic!("editor must not run") };

        let err = execute(&container, DatabaseScope::Public, target, &editor).await.unwrap_err();
        assert!(format!("{:#}", err).contains("record not found"));
    }
}
