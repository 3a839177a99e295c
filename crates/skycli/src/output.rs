//! Output formatting helpers.
//!
//! Record data goes to stdout (or to a file given with `--output`);
//! success and warning messages go to stderr.

use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use skycli_core::FieldValue;

/// Print a success message.
pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

/// Print a non-fatal warning.
pub fn warning(msg: impl Display) {
    eprintln!("{} {}", "Warning:".yellow(), msg);
}

/// Open the destination for record output: the file at `path`, or stdout.
pub fn destination(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// Write a field value: JSON for lists and mappings, plain text otherwise.
pub fn value(out: &mut dyn Write, value: &FieldValue) -> Result<()> {
    writeln!(out, "{}", value)?;
    Ok(())
}

/// Write a value as compact JSON on one line.
pub fn json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

/// Write a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    writeln!(out, "{}", json)?;
    Ok(())
}
