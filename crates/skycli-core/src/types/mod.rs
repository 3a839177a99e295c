//! Core skycli types.
//!
//! These types enforce their invariants at construction time,
//! ensuring invalid states are unrepresentable.

mod database;
mod endpoint;
mod record_id;

pub use database::DatabaseScope;
pub use endpoint::Endpoint;
pub use record_id::{RecordId, RecordType};
