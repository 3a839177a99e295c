//! Request/response exchange with the remote service.
//!
//! A [`Container`] is the client-side handle for a configured connection.
//! It hands every request to a [`Transport`] and resolves which database a
//! [`Database`] handle targets. Responses are classified once at this
//! boundary into [`ResponseBody`] and [`ResultItem`] values.

mod client;
mod envelope;
mod transport;

pub use client::{Container, Database};
pub use envelope::{Request, Response, ResponseBody, ResultItem, SkygearError};
pub use transport::Transport;

/// Action deleting a batch of records.
pub const DELETE_RECORDS: &str = "record:delete";

/// Action fetching records by identifier.
pub const FETCH_RECORDS: &str = "record:fetch";

/// Action querying records of one type.
pub const QUERY_RECORDS: &str = "record:query";

/// Action saving records.
pub const SAVE_RECORDS: &str = "record:save";
