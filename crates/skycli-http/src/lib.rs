//! skycli-http - HTTP transport for the Skygear action protocol.
//!
//! Each action is posted as a JSON body to a path derived from the action
//! name, with the API key and access token attached.

mod client;

pub use client::HttpTransport;
