//! Interactive editing of a record in an external editor.
//!
//! The record is written as indented JSON to a fresh temporary file, the
//! editor is run on it, and the file is parsed back into a new record. The
//! caller's record is only replaced once the edited document parses.
//!
//! The temporary file is left on disk afterwards so the last edit buffer
//! can be recovered if saving fails.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, ExitStatus};

use thiserror::Error;
use tracing::{debug, warn};

use skycli_core::Record;

/// Editor used when `EDITOR` is unset or blank.
pub const DEFAULT_EDITOR: &str = "vim";

const BUFFER_PREFIX: &str = "skycli";
const BUFFER_SUFFIX: &str = ".json";

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("failed to prepare edit buffer: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to launch editor '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("editor '{program}' exited with {status}")]
    Exited { program: String, status: ExitStatus },

    #[error("edited document is not a valid record: {0}")]
    Parse(#[source] skycli_core::Error),
}

/// Lets the user edit a file, returning once they are done.
pub trait Editor {
    fn open(&self, path: &Path) -> Result<(), EditorError>;
}

impl<F> Editor for F
where
    F: Fn(&Path) -> Result<(), EditorError>,
{
    fn open(&self, path: &Path) -> Result<(), EditorError> {
        self(path)
    }
}

/// An editor program run as a child process on the invoking terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalEditor {
    program: String,
    args: Vec<String>,
}

impl ExternalEditor {
    /// The editor selected by `EDITOR`.
    pub fn from_env() -> Self {
        Self::from_setting(env::var("EDITOR").ok().as_deref())
    }

    /// Parse an `EDITOR`-style setting such as `code --wait`.
    pub fn from_setting(setting: Option<&str>) -> Self {
        let mut words = setting.unwrap_or_default().split_whitespace();
        match words.next() {
            Some(program) => Self {
                program: program.to_string(),
                args: words.map(str::to_string).collect(),
            },
            None => Self {
                program: DEFAULT_EDITOR.to_string(),
                args: Vec::new(),
            },
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Editor for ExternalEditor {
    fn open(&self, path: &Path) -> Result<(), EditorError> {
        debug!(program = %self.program, path = %path.display(), "Launching editor");

        // Status inherits stdin/stdout/stderr, so the editor owns the terminal.
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .status()
            .map_err(|source| EditorError::Launch {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(EditorError::Exited {
                program: self.program.clone(),
                status,
            });
        }

        Ok(())
    }
}

/// Edit `record` in `editor`.
///
/// On error `record` is left exactly as it was.
pub fn edit_record<E>(editor: &E, record: &mut Record) -> Result<(), EditorError>
where
    E: Editor + ?Sized,
{
    let document = serde_json::to_string_pretty(record)?;

    let path = {
        let (mut file, path) = tempfile::Builder::new()
            .prefix(BUFFER_PREFIX)
            .suffix(BUFFER_SUFFIX)
            .tempfile()?
            .keep()
            .map_err(io::Error::from)?;
        file.write_all(document.as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()?;
        path
    };
    debug!(path = %path.display(), "Wrote edit buffer");

    editor.open(&path)?;

    // Re-read by path: many editors replace the file rather than rewrite it.
    let edited = fs::read_to_string(&path)?;
    let edited = Record::from_json_str(&edited).map_err(EditorError::Parse)?;

    if edited.id() != record.id() {
        warn!(from = %record.id(), to = %edited.id(), "Record id changed during edit");
    }

    *record = edited;
    Ok(())
}
