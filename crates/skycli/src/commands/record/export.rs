//! Export records command (not yet available).

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args};
use tracing::debug;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Records to export, as <type>/<id>
    #[arg(required = true, value_name = "RECORD_ID")]
    pub record_ids: Vec<String>,

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

    /// Print indented JSON
    #[arg(long)]
    pub pretty_print: bool,

    /// Write records to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

pub fn run(args: ExportArgs) -> Result<()> {
    debug!(
        records = args.record_ids.len(),
        asset = args.asset,
        basedir = ?args.basedir,
        pretty_print = args.pretty_print,
        output = ?args.output,
        "Export requested"
    );
    println!("not implemented");
    Ok(())
}
