//! skycli-core - Core record and container types for the Skygear client.
//!
//! Records are addressed by a [`RecordId`] of the form `type/id` and carry a
//! mapping of typed [`FieldValue`]s. All traffic with the remote service goes
//! through a [`Container`], which delegates the actual exchange to a
//! [`Transport`] implementation.
//!
//! # Example
//!
//! ```
//! use skycli_core::{FieldValue, Record, RecordId};
//!
//! let id = RecordId::new("note/1").unwrap();
//! let mut record = Record::new(id);
//! record.assign("count=42").unwrap();
//!
//! assert_eq!(record.get("count").unwrap(), &FieldValue::from(42));
//! ```

pub mod container;
pub mod credentials;
pub mod error;
pub mod record;
pub mod types;

pub use container::{
    Container, Database, Request, ResponseBody, Response, ResultItem, SkygearError, Transport,
};
pub use credentials::{AccessToken, ApiKey};
pub use error::Error;
pub use record::{FieldValue, Record};
pub use types::{DatabaseScope, Endpoint, RecordId, RecordType};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
