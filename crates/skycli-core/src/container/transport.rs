//! Transport trait.

use async_trait::async_trait;

use super::{Request, Response};
use crate::Result;

/// Delivers a request to the remote service and returns its response.
///
/// Implementations own network and authentication concerns. Any mapping the
/// service answers with is returned as a [`Response`], including error
/// envelopes; only failures to complete the exchange are `Err`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` as the named action.
    async fn make_request(&self, action: &str, request: &Request) -> Result<Response>;
}

#[async_trait]
impl<T> Transport for &T
where
    T: Transport + ?Sized,
{
    async fn make_request(&self, action: &str, request: &Request) -> Result<Response> {
        (**self).make_request(action, request).await
    }
}
