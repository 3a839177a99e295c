//! Container and database handles.

use serde_json::Value;
use tracing::{debug, instrument};

use super::{
    DELETE_RECORDS, FETCH_RECORDS, QUERY_RECORDS, Request, Response, ResultItem, SAVE_RECORDS,
    Transport,
};
use crate::Result;
use crate::error::Error;
use crate::record::Record;
use crate::types::{DatabaseScope, RecordId, RecordType};

/// Client-side handle for a configured connection to the service.
#[derive(Debug, Clone)]
pub struct Container<T> {
    transport: T,
}

impl<T: Transport> Container<T> {
    /// Create a container delivering requests through `transport`.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the identifier of the shared public database.
    pub fn public_database_id(&self) -> &str {
        DatabaseScope::Public.database_id()
    }

    /// Returns the identifier of the signed-in user's private database.
    pub fn private_database_id(&self) -> &str {
        DatabaseScope::Private.database_id()
    }

    /// Resolve the database identifier for a scope.
    pub fn database_id(&self, scope: DatabaseScope) -> &str {
        match scope {
            DatabaseScope::Public => self.public_database_id(),
            DatabaseScope::Private => self.private_database_id(),
        }
    }

    /// Returns a handle on the database selected by `scope`.
    pub fn database(&self, scope: DatabaseScope) -> Database<'_, T> {
        Database {
            container: self,
            database_id: self.database_id(scope).to_string(),
        }
    }

    /// Send a request. No retry, no caching.
    #[instrument(skip(self, request))]
    pub async fn make_request(&self, action: &str, request: &Request) -> Result<Response> {
        debug!("Sending request");
        let response = self.transport.make_request(action, request).await?;
        debug!(is_error = response.is_error(), "Received response");
        Ok(response)
    }
}

/// A container bound to one database.
#[derive(Debug)]
pub struct Database<'a, T> {
    container: &'a Container<T>,
    database_id: String,
}

impl<T: Transport> Database<'_, T> {
    /// Returns the database identifier attached to every request.
    pub fn id(&self) -> &str {
        &self.database_id
    }

    /// Fetch a single record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Server`] when the service reports an error for the
    /// envelope or the record, and [`Error::UnexpectedServerPayload`] when
    /// the result is not a record.
    #[instrument(skip(self), fields(database = %self.database_id, %id))]
    pub async fn fetch_record(&self, id: &RecordId) -> Result<Record> {
        let request = Request::new()
            .with("database_id", self.database_id.as_str())
            .with("ids", vec![id.to_string()]);

        let response = self.container.make_request(FETCH_RECORDS, &request).await?;
        first_record(response.into_result_items()?)
    }

    /// Save a record, returning the record as stored by the service.
    #[instrument(skip(self, record), fields(database = %self.database_id, id = %record.id()))]
    pub async fn save_record(&self, record: &Record) -> Result<Record> {
        let request = Request::new()
            .with("database_id", self.database_id.as_str())
            .with("records", Value::Array(vec![record.to_value()]));

        let response = self.container.make_request(SAVE_RECORDS, &request).await?;
        first_record(response.into_result_items()?)
    }

    /// Delete a batch of records in one request.
    ///
    /// Per-record failures are returned as [`ResultItem::Error`] entries.
    #[instrument(skip(self, ids), fields(database = %self.database_id, count = ids.len()))]
    pub async fn delete_records(&self, ids: &[RecordId]) -> Result<Vec<ResultItem>> {
        let ids: Vec<String> = ids.iter().map(RecordId::to_string).collect();
        let request = Request::new()
            .with("database_id", self.database_id.as_str())
            .with("ids", ids);

        let response = self.container.make_request(DELETE_RECORDS, &request).await?;
        response.into_result_items()
    }

    /// Query every record of a type.
    #[instrument(skip(self), fields(database = %self.database_id, %record_type))]
    pub async fn query(&self, record_type: &RecordType) -> Result<Vec<ResultItem>> {
        let request = Request::new()
            .with("database_id", self.database_id.as_str())
            .with("record_type", record_type.as_str());

        let response = self.container.make_request(QUERY_RECORDS, &request).await?;
        response.into_result_items()
    }
}

fn first_record(items: Vec<ResultItem>) -> Result<Record> {
    match items.into_iter().next() {
        Some(ResultItem::Record(map)) => {
            Record::from_map(map).map_err(|e| Error::unexpected(e.to_string()))
        }
        Some(ResultItem::Error(error)) => Err(Error::Server(error)),
        Some(ResultItem::Unexpected(_)) => Err(Error::unexpected("result entry is not a record")),
        None => Err(Error::unexpected("empty result")),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{Map, json};

    use super::*;
    use crate::record::FieldValue;

    /// Replays one canned response and remembers what was sent.
    struct CannedTransport {
        response: Value,
        sent: Mutex<Vec<(String, Value)>>,
    }

    impl CannedTransport {
        fn new(response: Value) -> Self {
            Self {
                response,
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<(String, Value)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn make_request(&self, action: &str, request: &Request) -> Result<Response> {
            self.sent.lock().unwrap().push((
                action.to_string(),
                Value::Object(request.payload().clone()),
            ));
            match &self.response {
                Value::Object(map) => Ok(Response::new(map.clone())),
                _ => Ok(Response::new(Map::new())),
            }
        }
    }

    #[test]
    fn resolves_database_ids() {
        let container = Container::new(CannedTransport::new(json!({})));
        assert_eq!(container.database_id(DatabaseScope::Public), "_public");
        assert_eq!(container.database_id(DatabaseScope::Private), "_private");
        assert_eq!(container.database(DatabaseScope::Private).id(), "_private");
    }

    #[tokio::test]
    async fn fetch_record_sends_ids() {
        let transport = CannedTransport::new(json!({
            "result": [{"_id": "note/1", "_type": "record", "title": "Hello"}]
        }));
        let container = Container::new(&transport);
        let id = RecordId::new("note/1").unwrap();

        let record = container
            .database(DatabaseScope::Public)
            .fetch_record(&id)
            .await
            .unwrap();

        assert_eq!(record.id(), &id);
        assert_eq!(record.get("title").unwrap(), &FieldValue::from("Hello"));
        assert_eq!(
            transport.sent(),
            vec![(
                "record:fetch".to_string(),
                json!({"database_id": "_public", "ids": ["note/1"]})
            )]
        );
    }

    #[tokio::test]
    async fn fetch_record_error_item_is_server_error() {
        let transport = CannedTransport::new(json!({
            "result": [{"_id": "note/1", "_type": "error", "message": "record not found"}]
        }));
        let container = Container::new(&transport);
        let id = RecordId::new("note/1").unwrap();

        let err = container
            .database(DatabaseScope::Public)
            .fetch_record(&id)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Server(ref e) if e.message == "record not found"));
    }

    #[tokio::test]
    async fn save_record_sends_document() {
        let transport = CannedTransport::new(json!({
            "result": [{"_id": "note/1", "_type": "record", "count": 42}]
        }));
        let container = Container::new(&transport);
        let mut record = Record::new(RecordId::new("note/1").unwrap());
        record.assign("count=42").unwrap();

        let saved = container
            .database(DatabaseScope::Private)
            .save_record(&record)
            .await
            .unwrap();

        assert_eq!(saved.get("count").unwrap(), &FieldValue::from(42));
        assert_eq!(
            transport.sent(),
            vec![(
                "record:save".to_string(),
                json!({"database_id": "_private", "records": [{"_id": "note/1", "count": 42}]})
            )]
        );
    }

    #[tokio::test]
    async fn save_record_envelope_error() {
        let transport = CannedTransport::new(json!({"error": {"message": "invalid api key"}}));
        let container = Container::new(&transport);
        let record = Record::new(RecordId::new("note/1").unwrap());

        let err = container
            .database(DatabaseScope::Public)
            .save_record(&record)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "invalid api key");
    }

    #[tokio::test]
    async fn empty_result_is_unexpected() {
        let transport = CannedTransport::new(json!({"result": []}));
        let container = Container::new(&transport);
        let id = RecordId::new("note/1").unwrap();

        let err = container
            .database(DatabaseScope::Public)
            .fetch_record(&id)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::UnexpectedServerPayload { .. }));
    }

    #[tokio::test]
    async fn delete_records_is_one_batch() {
        let transport = CannedTransport::new(json!({
            "result": [
                {"_id": "note/1", "_type": "record"},
                {"_id": "note/2", "_type": "error", "message": "not found"}
            ]
        }));
        let container = Container::new(&transport);
        let ids = vec![RecordId::new("note/1").unwrap(), RecordId::new("note/2").unwrap()];

        let items = container
            .database(DatabaseScope::Public)
            .delete_records(&ids)
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(
            transport.sent(),
            vec![(
                "record:delete".to_string(),
                json!({"database_id": "_public", "ids": ["note/1", "note/2"]})
            )]
        );
    }

    #[tokio::test]
    async fn query_sends_record_type() {
        let transport = CannedTransport::new(json!({"result": []}));
        let container = Container::new(&transport);
        let record_type = RecordType::new("note").unwrap();

        let items = container
            .database(DatabaseScope::Public)
            .query(&record_type)
            .await
            .unwrap();

        assert!(items.is_empty());
        assert_eq!(
            transport.sent(),
            vec![(
                "record:query".to_string(),
                json!({"database_id": "_public", "record_type": "note"})
            )]
        );
    }
}
