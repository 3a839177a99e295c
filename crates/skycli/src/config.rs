//! Connection configuration.
//!
//! Settings are resolved per field, first match wins:
//! command-line flags, then `SKYCLI_*` environment variables, then the
//! JSON config file in the platform config directory.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use skycli_core::{AccessToken, ApiKey, Container, Endpoint};
use skycli_http::HttpTransport;

use crate::cli::ConnectionArgs;

pub const ENDPOINT_VAR: &str = "SKYCLI_ENDPOINT";
pub const API_KEY_VAR: &str = "SKYCLI_API_KEY";
pub const ACCESS_TOKEN_VAR: &str = "SKYCLI_ACCESS_TOKEN";

/// One layer of unvalidated settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
}

impl Settings {
    /// Settings from the `SKYCLI_*` environment variables.
    pub fn from_env() -> Self {
        let var = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            endpoint: var(ENDPOINT_VAR),
            api_key: var(API_KEY_VAR),
            access_token: var(ACCESS_TOKEN_VAR),
        }
    }

    /// Settings stored in the config file, empty if there is none.
    pub fn from_file() -> Result<Self> {
        let Some(path) = config_path() else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Fill unset fields from the config file, read only when a field is
    /// missing.
    ///
    /// A broken file is only fatal while the endpoint or API key is unset.
    pub fn or_file(self, read: impl FnOnce() -> Result<Settings>) -> Result<Self> {
        if self.is_complete() {
            return Ok(self);
        }

        match read() {
            Ok(file) => Ok(self.or(file)),
            Err(e) if self.endpoint.is_some() && self.api_key.is_some() => {
                warn!(error = %format!("{:#}", e), "Ignoring unreadable config file");
                Ok(self)
            }
            Err(e) => Err(e),
        }
    }

    fn is_complete(&self) -> bool {
        self.endpoint.is_some() && self.api_key.is_some() && self.access_token.is_some()
    }

    /// Fill every unset field from `fallback`.
    pub fn or(self, fallback: Settings) -> Self {
        Self {
            endpoint: self.endpoint.or(fallback.endpoint),
            api_key: self.api_key.or(fallback.api_key),
            access_token: self.access_token.or(fallback.access_token),
        }
    }
}

impl From<&ConnectionArgs> for Settings {
    fn from(args: &ConnectionArgs) -> Self {
        Self {
            endpoint: args.endpoint.clone(),
            api_key: args.api_key.clone(),
            access_token: args.access_token.clone(),
        }
    }
}

/// Validated connection configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: Endpoint,
    pub api_key: ApiKey,
    pub access_token: Option<AccessToken>,
}

impl Config {
    /// Resolve the configuration for this invocation.
    pub fn load(args: &ConnectionArgs) -> Result<Self> {
        let settings = Settings::from(args).or(Settings::from_env());
        Self::from_settings(settings.or_file(Settings::from_file)?)
    }

    /// Validate merged settings.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let endpoint = settings.endpoint.ok_or_else(|| {
            anyhow!(
                "No endpoint configured. Pass --endpoint, set {}, or add \"endpoint\" to the config file.",
                ENDPOINT_VAR
            )
        })?;
        let endpoint = Endpoint::new(&endpoint).context("Invalid endpoint")?;

        let api_key = settings.api_key.ok_or_else(|| {
            anyhow!(
                "No API key configured. Pass --api-key, set {}, or add \"api_key\" to the config file.",
                API_KEY_VAR
            )
        })?;

        Ok(Self {
            endpoint,
            api_key: ApiKey::new(api_key),
            access_token: settings.access_token.map(AccessToken::new),
        })
    }

    /// Build a container talking HTTP to the configured endpoint.
    pub fn connect(&self) -> Result<Container<HttpTransport>> {
        let mut transport = HttpTransport::new(self.endpoint.clone(), self.api_key.clone())
            .context("Failed to create HTTP client")?;
        if let Some(token) = &self.access_token {
            transport = transport.with_access_token(token.clone());
        }
        Ok(Container::new(transport))
    }
}

/// Path of the JSON config file, if the platform has a config directory.
pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "skycli").map(|dirs| dirs.config_dir().join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(endpoint: Option<&str>, api_key: Option<&str>, token: Option<&str>) -> Settings {
        Settings {
            endpoint: endpoint.map(str::to_string),
            api_key: api_key.map(str::to_string),
            access_token: token.map(str::to_string),
        }
    }

    #[test]
    fn flags_override_env_and_file() {
        let flags = settings(Some("https://flag.example.com"), None, None);
        let env = settings(Some("https://env.example.com"), Some("env-key"), None);
        let file = settings(Some("https://file.example.com"), Some("file-key"), Some("file-token"));

        let merged = flags.or(env).or(file);
        assert_eq!(merged.endpoint.as_deref(), Some("https://flag.example.com"));
        assert_eq!(merged.api_key.as_deref(), Some("env-key"));
        assert_eq!(merged.access_token.as_deref(), Some("file-token"));
    }

    #[test]
    fn complete_settings_skip_config_file() {
        let flags = settings(Some("http://localhost:3000"), Some("key"), Some("token"));
        let merged = flags
            .clone()
            .or_file(|| panic!("config file must not be read"))
            .unwrap();
        assert_eq!(merged, flags);
    }

    #[test]
    fn broken_config_file_is_ignored_when_required_fields_are_set() {
        let flags = settings(Some("http://localhost:3000"), Some("key"), None);
        let merged = flags
            .clone()
            .or_file(|| Err(anyhow!("Invalid config file")))
            .unwrap();
        assert_eq!(merged, flags);
        assert!(Config::from_settings(merged).is_ok());
    }

    #[test]
    fn broken_config_file_fails_when_required_fields_are_missing() {
        let err = settings(None, Some("key"), None)
            .or_file(|| Err(anyhow!("Invalid config file")))
            .unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn config_file_fills_missing_fields() {
        let merged = settings(None, Some("flag-key"), None)
            .or_file(|| {
                Ok(settings(
                    Some("https://file.example.com"),
                    Some("file-key"),
                    Some("file-token"),
                ))
            })
            .unwrap();
        assert_eq!(
            merged,
            settings(Some("https://file.example.com"), Some("flag-key"), Some("file-token"))
        );
    }

    #[test]
    fn missing_endpoint_is_reported() {
        let err = Config::from_settings(settings(None, Some("key"), None)).unwrap_err();
        assert!(err.to_string().contains("No endpoint configured"));
    }

    #[test]
    fn missing_api_key_is_reported() {
        let err =
            Config::from_settings(settings(Some("http://localhost:3000"), None, None)).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn invalid_endpoint_is_reported() {
        let err = Config::from_settings(settings(Some("not a url"), Some("key"), None)).unwrap_err();
        assert!(err.to_string().contains("Invalid endpoint"));
    }

    #[test]
    fn valid_settings_connect() {
        let config = Config::from_settings(settings(
            Some("http://localhost:3000"),
            Some("key"),
            Some("token"),
        ))
        .unwrap();

        assert!(config.access_token.is_some());
        let container = config.connect().unwrap();
        assert_eq!(container.transport().endpoint(), &config.endpoint);
    }

    #[test]
    fn config_file_fields_are_optional() {
        let parsed: Settings = serde_json::from_str(r#"{"endpoint": "http://localhost:3000"}"#).unwrap();
        assert_eq!(parsed, settings(Some("http://localhost:3000"), None, None));
    }
}
