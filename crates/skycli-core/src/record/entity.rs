//! The record entity and its JSON document form.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::FieldValue;
use crate::error::{Error, InvalidInputError};
use crate::types::RecordId;

/// Key holding the record identifier in the document form.
pub const ID_KEY: &str = "_id";

/// A record: an identifier plus a mapping of named field values.
///
/// The JSON document form is a flat object with the identifier under `_id`:
///
/// ```text
/// {
///   "_id": "note/1",
///   "title": "Hello",
///   "count": 42
/// }
/// ```
///
/// Every key other than `_id` is a field, including server metadata such as
/// `_created_at`, so a fetched record survives an edit round trip intact.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Create a record with no fields.
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            fields: BTreeMap::new(),
        }
    }

    /// Returns the record identifier.
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Returns all fields, ordered by key.
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Look up a field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldNotFound`] when the record has no such field.
    pub fn get(&self, key: &str) -> Result<&FieldValue, Error> {
        self.fields.get(key).ok_or_else(|| Error::FieldNotFound {
            record: self.id.clone(),
            key: key.to_string(),
        })
    }

    /// Set a field, returning the previous value if any.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.fields.insert(key.into(), value.into())
    }

    /// Apply a `key=value` assignment expression.
    ///
    /// The expression is split on the first `=`; the value is typed with
    /// [`FieldValue::parse_literal`].
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::Assignment`] when there is no `=` or the
    /// key is empty.
    pub fn assign(&mut self, expression: &str) -> Result<(), Error> {
        let (key, literal) = expression
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| InvalidInputError::Assignment {
                expression: expression.to_string(),
            })?;

        self.set(key, FieldValue::parse_literal(literal));
        Ok(())
    }

    /// Build a record from its document form.
    ///
    /// # Errors
    ///
    /// Returns an error if `_id` is missing, not a string, or not a valid
    /// record identifier.
    pub fn from_map(mut map: Map<String, Value>) -> Result<Self, Error> {
        let id = match map.remove(ID_KEY) {
            Some(Value::String(id)) => RecordId::new(id)?,
            Some(_) => {
                return Err(InvalidInputError::Document {
                    reason: format!("'{}' must be a string", ID_KEY),
                }
                .into());
            }
            None => {
                return Err(InvalidInputError::Document {
                    reason: format!("missing '{}'", ID_KEY),
                }
                .into());
            }
        };

        let fields = map
            .into_iter()
            .map(|(key, value)| (key, FieldValue::from_json(value)))
            .collect();

        Ok(Self { id, fields })
    }

    /// Parse a record from a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, Error> {
        match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => Self::from_map(map),
            Ok(_) => Err(InvalidInputError::Document {
                reason: "expected a JSON object".to_string(),
            }
            .into()),
            Err(e) => Err(InvalidInputError::Document {
                reason: e.to_string(),
            }
            .into()),
        }
    }

    /// Encode the record in its document form.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(ID_KEY.to_string(), Value::String(self.id.to_string()));
        for (key, value) in &self.fields {
            map.insert(key.clone(), value.to_json());
        }
        Value::Object(map)
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry(ID_KEY, &self.id)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Map::deserialize(deserializer)?;
        Record::from_map(map).map_err(serde::de::Error::custom)
    }
}
