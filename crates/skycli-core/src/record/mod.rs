//! Records and their field values.

mod entity;
mod value;

pub use entity::{ID_KEY, Record};
pub use value::FieldValue;
