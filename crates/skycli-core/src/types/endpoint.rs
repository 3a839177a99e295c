//! Service endpoint type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated Skygear service endpoint.
///
/// The URL must be absolute, use `http` or `https`, and have a host.
/// A trailing slash is normalized away so action URLs are built consistently.
///
/// # Example
///
/// ```
/// use skycli_core::Endpoint;
///
/// let endpoint = Endpoint::new("https://myapp.skygeario.com/").unwrap();
/// assert_eq!(endpoint.action_url("record:query"),
///            "https://myapp.skygeario.com/record/query");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint(Url);

impl Endpoint {
    /// Create a new endpoint from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::Endpoint {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        Ok(Self(url))
    }

    /// Returns the URL an action is posted to.
    ///
    /// Actions such as `record:query` map to the path `record/query`
    /// below the endpoint.
    pub fn action_url(&self, action: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}/{}", base, action.replace(':', "/"))
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        let invalid = |reason: &str| InvalidInputError::Endpoint {
            value: original.to_string(),
            reason: reason.to_string(),
        };

        if url.cannot_be_a_base() {
            return Err(invalid("must be an absolute URL").into());
        }

        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("must use http or https").into());
        }

        if url.host_str().is_none() {
            return Err(invalid("must have a host").into());
        }

        Ok(())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for Endpoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for Endpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Endpoint::new(&s).map_err(serde::de::Error::custom)
    }
}
