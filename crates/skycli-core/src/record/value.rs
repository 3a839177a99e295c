//! Typed record field values.
//!
//! Skygear encodes non-JSON types as tagged objects:
//!
//! ```text
//! date       {"$type": "date",  "$date": "2016-01-02T03:04:05Z"}
//! reference  {"$type": "ref",   "$id":   "note/1"}
//! asset      {"$type": "asset", "$name": "cat.png"}
//! ```
//!
//! A tagged object is only recognised when it has exactly those two keys and
//! the payload parses. Anything else stays a plain [`FieldValue::Map`], so
//! decoding never loses data.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::types::RecordId;

const TYPE_KEY: &str = "$type";
const DATE_KEY: &str = "$date";
const REF_KEY: &str = "$id";
const ASSET_KEY: &str = "$name";

/// A single record field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Number(Number),
    String(String),
    Date(DateTime<Utc>),
    /// Reference to another record.
    Reference(RecordId),
    /// Reference to an uploaded asset, by name.
    Asset(String),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Decode a JSON value, recognising the tagged encodings.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(b),
            Value::Number(n) => FieldValue::Number(n),
            Value::String(s) => FieldValue::String(s),
            Value::Array(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::from_json).collect())
            }
            Value::Object(map) => Self::from_object(map),
        }
    }

    /// Encode as JSON, using the tagged encodings.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::Number(n) => Value::Number(n.clone()),
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Date(date) => tagged(
                "date",
                DATE_KEY,
                date.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ),
            FieldValue::Reference(id) => tagged("ref", REF_KEY, id.to_string()),
            FieldValue::Asset(name) => tagged("asset", ASSET_KEY, name.clone()),
            FieldValue::List(items) => Value::Array(items.iter().map(FieldValue::to_json).collect()),
            FieldValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }

    /// Best-effort typing of a literal typed on the command line.
    ///
    /// Integer and finite float literals become numbers, `true` and `false`
    /// become booleans, everything else is kept as a string.
    pub fn parse_literal(s: &str) -> Self {
        match s {
            "true" => return FieldValue::Boolean(true),
            "false" => return FieldValue::Boolean(false),
            _ => {}
        }

        if let Ok(n) = s.parse::<i64>() {
            return FieldValue::Number(n.into());
        }

        if let Some(n) = s.parse::<f64>().ok().and_then(Number::from_f64) {
            return FieldValue::Number(n);
        }

        FieldValue::String(s.to_string())
    }

    fn from_object(map: Map<String, Value>) -> Self {
        if let Some(value) = Self::from_tagged(&map) {
            return value;
        }

        FieldValue::Map(
            map.into_iter()
                .map(|(key, value)| (key, FieldValue::from_json(value)))
                .collect(),
        )
    }

    fn from_tagged(map: &Map<String, Value>) -> Option<Self> {
        if map.len() != 2 {
            return None;
        }

        match map.get(TYPE_KEY)?.as_str()? {
            "date" => {
                let date = DateTime::parse_from_rfc3339(map.get(DATE_KEY)?.as_str()?).ok()?;
                Some(FieldValue::Date(date.with_timezone(&Utc)))
            }
            "ref" => RecordId::new(map.get(REF_KEY)?.as_str()?)
                .ok()
                .map(FieldValue::Reference),
            "asset" => Some(FieldValue::Asset(map.get(ASSET_KEY)?.as_str()?.to_string())),
            _ => None,
        }
    }
}

fn tagged(kind: &str, key: &str, payload: String) -> Value {
    let mut map = Map::new();
    map.insert(TYPE_KEY.to_string(), Value::String(kind.to_string()));
    map.insert(key.to_string(), Value::String(payload));
    Value::Object(map)
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::String(s) => f.write_str(s),
            FieldValue::Date(date) => {
                f.write_str(&date.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            FieldValue::Reference(id) => write!(f, "{}", id),
            FieldValue::Asset(name) => f.write_str(name),
            FieldValue::List(_) | FieldValue::Map(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::from_json(value)
    }
}

impl Serialize for FieldValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(FieldValue::from_json)
    }
}
