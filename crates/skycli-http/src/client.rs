//! HTTP transport implementation.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};
use tracing::{debug, instrument, trace};

use skycli_core::error::TransportError;
use skycli_core::{AccessToken, ApiKey, Endpoint, Error, Request, Response, Result, Transport};

const API_KEY_HEADER: &str = "x-skygear-api-key";
const ACCESS_TOKEN_HEADER: &str = "x-skygear-access-token";

/// Posts actions to a Skygear endpoint over HTTP.
///
/// Every JSON object the service answers with becomes a [`Response`],
/// whatever the HTTP status, so error envelopes reach the caller intact.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Endpoint,
    api_key: ApiKey,
    access_token: Option<AccessToken>,
}

impl HttpTransport {
    /// Create a transport for the given endpoint and API key.
    pub fn new(endpoint: Endpoint, api_key: ApiKey) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("skycli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            access_token: None,
        })
    }

    /// Attach the signed-in user's access token to every request.
    pub fn with_access_token(mut self, access_token: AccessToken) -> Self {
        self.access_token = Some(access_token);
        self
    }

    /// Returns the endpoint this transport posts to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(API_KEY_HEADER),
            header_value(self.api_key.as_str(), "API key")?,
        );
        if let Some(token) = &self.access_token {
            headers.insert(
                HeaderName::from_static(ACCESS_TOKEN_HEADER),
                header_value(token.as_str(), "access token")?,
            );
        }
        Ok(headers)
    }

    /// The request payload plus the action name and credentials.
    fn body(&self, action: &str, request: &Request) -> Map<String, Value> {
        let mut body = request.payload().clone();
        body.insert("action".to_string(), Value::from(action));
        body.insert("api_key".to_string(), Value::from(self.api_key.as_str()));
        if let Some(token) = &self.access_token {
            body.insert("access_token".to_string(), Value::from(token.as_str()));
        }
        body
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(endpoint = %self.endpoint))]
    async fn make_request(&self, action: &str, request: &Request) -> Result<Response> {
        let url = self.endpoint.action_url(action);
        debug!(%url, "POST action");
        trace!(payload = ?request.payload(), "request payload");

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&self.body(action, request))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        trace!(status = %status, "HTTP response");

        let bytes = response.bytes().await.map_err(transport_error)?;
        let value: Value = serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode {
            status: status.as_u16(),
            message: e.to_string(),
        })?;

        match value {
            Value::Object(payload) => Ok(Response::new(payload)),
            _ if status.is_success() => Err(Error::UnexpectedServerPayload {
                reason: "response body is not a JSON object".to_string(),
            }),
            _ => Err(TransportError::Http {
                message: format!("HTTP {}", status),
            }
            .into()),
        }
    }
}

fn header_value(value: &str, what: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| {
        TransportError::Http {
            message: format!("{} contains characters not allowed in a header", what),
        }
        .into()
    })
}

fn transport_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    }
}
