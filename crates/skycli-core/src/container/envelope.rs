//! Request and response envelopes.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::Result;
use crate::error::Error;

/// Key carrying an error object in a response envelope.
const ERROR_KEY: &str = "error";

/// Key carrying the result list in a response envelope.
const RESULT_KEY: &str = "result";

/// Marker field on per-item errors inside a result list.
const ITEM_TYPE_KEY: &str = "_type";
const ITEM_ERROR_TYPE: &str = "error";

const UNKNOWN_ERROR: &str = "Unknown Error";

/// A generic mapping-valued request payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Request {
    payload: Map<String, Value>,
}

impl Request {
    /// Create an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a payload entry.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Returns the payload.
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }
}

/// A mapping-valued response payload, as received.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    payload: Map<String, Value>,
}

/// A response classified at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// A well-formed payload.
    Payload(Map<String, Value>),
    /// The service reported an error.
    Error(SkygearError),
}

impl Response {
    /// Wrap a received payload.
    pub fn new(payload: Map<String, Value>) -> Self {
        Self { payload }
    }

    /// Returns the raw payload.
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Returns true if the payload carries an `error` key, whatever its value.
    pub fn is_error(&self) -> bool {
        self.payload.contains_key(ERROR_KEY)
    }

    /// Returns the normalized error, if the payload carries one.
    pub fn error(&self) -> Option<SkygearError> {
        self.payload.get(ERROR_KEY).map(SkygearError::from_value)
    }

    /// Classify the response as payload or error.
    pub fn into_body(mut self) -> ResponseBody {
        match self.payload.remove(ERROR_KEY) {
            Some(error) => ResponseBody::Error(SkygearError::from_value(&error)),
            None => ResponseBody::Payload(self.payload),
        }
    }

    /// Extract the `result` list, classifying each entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Server`] for an error envelope and
    /// [`Error::UnexpectedServerPayload`] when `result` is missing or is not
    /// a list.
    pub fn into_result_items(self) -> Result<Vec<ResultItem>> {
        let mut payload = match self.into_body() {
            ResponseBody::Payload(payload) => payload,
            ResponseBody::Error(error) => return Err(Error::Server(error)),
        };

        match payload.remove(RESULT_KEY) {
            Some(Value::Array(items)) => Ok(items.into_iter().map(ResultItem::from_value).collect()),
            Some(_) => Err(Error::unexpected("'result' is not a list")),
            None => Err(Error::unexpected("response has no 'result'")),
        }
    }
}

impl From<Map<String, Value>> for Response {
    fn from(payload: Map<String, Value>) -> Self {
        Self::new(payload)
    }
}

/// One entry of a result list.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultItem {
    /// A record-shaped mapping.
    Record(Map<String, Value>),
    /// A per-item error reported by the service.
    Error(SkygearError),
    /// Anything that is not a mapping.
    Unexpected(Value),
}

impl ResultItem {
    /// Classify a result list entry.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) if is_error_item(&map) => ResultItem::Error(SkygearError::from_map(&map)),
            Value::Object(map) => ResultItem::Record(map),
            other => ResultItem::Unexpected(other),
        }
    }
}

fn is_error_item(map: &Map<String, Value>) -> bool {
    map.get(ITEM_TYPE_KEY).and_then(Value::as_str) == Some(ITEM_ERROR_TYPE)
}

/// Normalized error information reported by the service.
///
/// Construction never fails; missing or mistyped fields degrade to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkygearError {
    /// Identifier of the record the error concerns, if any.
    pub id: Option<String>,
    pub message: String,
    pub code: i64,
    /// Error type tag, such as `ResourceNotFound`.
    pub kind: String,
}

impl SkygearError {
    /// Normalize an error mapping.
    pub fn from_map(data: &Map<String, Value>) -> Self {
        let text = |key: &str| data.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            id: text("_id").filter(|id| !id.is_empty()),
            message: text("message")
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            code: data.get("code").and_then(Value::as_i64).unwrap_or_default(),
            kind: text("type").unwrap_or_default(),
        }
    }

    /// Normalize any error value; a bare string becomes the message.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map),
            Value::String(message) if !message.is_empty() => Self {
                message: message.clone(),
                ..Self::unknown()
            },
            _ => Self::unknown(),
        }
    }

    fn unknown() -> Self {
        Self {
            message: UNKNOWN_ERROR.to_string(),
            ..Self::default()
        }
    }
}

impl fmt::Display for SkygearError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "Record {}: {}", id, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for SkygearError {}
