//! Import records command (not yet available).

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args};
use tracing::debug;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Files to read records from
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Upload assets referenced by the records
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

    /// Directory to resolve asset paths against
    #[arg(short = 'd', long, value_name = "DIR")]
    pub basedir: Option<PathBuf>,

    /// Prompt for values that cannot be imported directly
    #[arg(long)]
    pub prompt_complex: bool,
}

pub fn run(args: ImportArgs) -> Result<()> {
    debug!(
        files = args.files.len(),
        asset = args.asset,
        basedir = ?args.basedir,
        prompt_complex = args.prompt_complex,
        "Import requested"
    );
    println!("not implemented");
    Ok(())
}
