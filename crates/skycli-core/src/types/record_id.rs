//! Record identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::error::{Error, InvalidInputError};

/// A validated record type name.
///
/// A record type is non-empty and never contains `/`, which is reserved as
/// the separator in [`RecordId`].
///
/// # Example
///
/// ```
/// use skycli_core::RecordType;
///
/// let record_type = RecordType::new("note").unwrap();
/// assert_eq!(record_type.as_str(), "note");
/// assert!(RecordType::new("note/1").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordType(String);

impl RecordType {
    /// Create a new record type, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or contains `/`.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();

        if s.is_empty() {
            return Err(InvalidInputError::RecordType {
                value: s,
                reason: "cannot be empty".to_string(),
            }
            .into());
        }

        if s.contains('/') {
            return Err(InvalidInputError::RecordType {
                value: s,
                reason: "Record type cannot contain '/'.".to_string(),
            }
            .into());
        }

        Ok(Self(s))
    }

    /// Returns the type name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RecordType {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RecordType> for String {
    fn from(record_type: RecordType) -> Self {
        record_type.0
    }
}

/// A validated record identifier.
///
/// Format: `<type>/<id>`, with exactly one `/` and both sides non-empty.
///
/// # Example
///
/// ```
/// use skycli_core::RecordId;
///
/// let id = RecordId::new("note/3f8a").unwrap();
/// assert_eq!(id.record_type().as_str(), "note");
/// assert_eq!(id.key(), "3f8a");
/// assert_eq!(id.to_string(), "note/3f8a");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId {
    record_type: RecordType,
    key: String,
}

impl RecordId {
    /// Parse a record identifier from its canonical `type/id` form.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::Identifier`] when the string contains no
    /// `/`, more than one `/`, or either side is empty.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let invalid = |reason: &str| InvalidInputError::Identifier {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let (record_type, key) = s
            .split_once('/')
            .ok_or_else(|| invalid("must have format '<type>/<id>'"))?;

        if key.contains('/') {
            return Err(invalid("must contain exactly one '/'").into());
        }
        if record_type.is_empty() {
            return Err(invalid("record type cannot be empty").into());
        }
        if key.is_empty() {
            return Err(invalid("record id cannot be empty").into());
        }

        Ok(Self {
            record_type: RecordType(record_type.to_string()),
            key: key.to_string(),
        })
    }

    /// Create a fresh identifier under the given type, using a random UUID.
    pub fn generate(record_type: RecordType) -> Self {
        Self {
            record_type,
            key: Uuid::new_v4().to_string(),
        }
    }

    /// Returns the record type.
    pub fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    /// Returns the id part (after the `/`).
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.record_type, self.key)
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RecordId::new(&s).map_err(serde::de::Error::custom)
    }
}
