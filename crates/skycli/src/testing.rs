//! Test doubles for command tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use skycli_core::{Container, Request, Response, Transport, error::TransportError};

/// Answers each action with a canned payload and records every request.
#[derive(Default)]
pub struct MockTransport {
    responses: HashMap<String, Value>,
    sent: Mutex<Vec<(String, Map<String, Value>)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `action` with `payload`, which must be a JSON object.
    pub fn respond(mut self, action: &str, payload: Value) -> Self {
        self.responses.insert(action.to_string(), payload);
        self
    }

    /// Requests sent so far, as `(action, payload)`.
    pub fn sent(&self) -> Vec<(String, Map<String, Value>)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.sent().into_iter().map(|(action, _)| action).collect()
    }

    pub fn container(self) -> Container<Self> {
        Container::new(self)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn make_request(&self, action: &str, request: &Request) -> skycli_core::Result<Response> {
        self.sent
            .lock()
            .unwrap()
            .push((action.to_string(), request.payload().clone()));

        match self.responses.get(action) {
            Some(Value::Object(payload)) => Ok(Response::new(payload.clone())),
            _ => Err(TransportError::Connection {
                message: format!("no canned response for {}", action),
            }
            .into()),
        }
    }
}
