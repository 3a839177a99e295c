//! Subcommand implementations.

pub mod record;
