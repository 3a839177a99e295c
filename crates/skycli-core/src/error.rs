//! Error types for skycli.
//!
//! This module provides a unified error type with explicit variants for
//! transport, server-reported, protocol-shape and input validation errors.

use thiserror::Error;

use crate::container::SkygearError;
use crate::types::RecordId;

/// The unified error type for skycli operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be completed (connection, timeout, undecodable body).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The service answered with an error envelope.
    #[error("{0}")]
    Server(#[from] SkygearError),

    /// The response did not have the expected list/mapping structure.
    #[error("Unexpected server data: {reason}")]
    UnexpectedServerPayload { reason: String },

    /// Input validation errors (bad identifier, record type or assignment).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// A record did not carry the requested field.
    #[error("record {record} has no field '{key}'")]
    FieldNotFound { record: RecordId, key: String },
}

impl Error {
    pub(crate) fn unexpected(reason: impl Into<String>) -> Self {
        Error::UnexpectedServerPayload {
            reason: reason.into(),
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// The response body could not be decoded as JSON.
    #[error("invalid response body (HTTP {status}): {message}")]
    Decode { status: u16, message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid record identifier (expected `type/id`).
    #[error("invalid record id '{value}': {reason}")]
    Identifier { value: String, reason: String },

    /// Invalid bare record type.
    #[error("invalid record type '{value}': {reason}")]
    RecordType { value: String, reason: String },

    /// Assignment expression without `=` or with an empty key.
    #[error("malformed assignment '{expression}': expected key=value")]
    Assignment { expression: String },

    /// Invalid service endpoint.
    #[error("invalid endpoint '{value}': {reason}")]
    Endpoint { value: String, reason: String },

    /// A JSON document that is not a record.
    #[error("invalid record document: {reason}")]
    Document { reason: String },
}
