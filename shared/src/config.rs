//! Runtime configuration handed to the core by the shell.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::NOTIFICATION_WINDOW_MS;

pub const MAX_URL_LENGTH: usize = 2048;
pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "http://localhost:4000/graphql";
pub const DEFAULT_SIGNUP_PATH: &str = "/signup";
pub const DEFAULT_TOKEN_KEY: &str = "token";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("notification window must be positive")]
    ZeroNotificationWindow,

    #[error("navigation path '{0}' must start with '/'")]
    InvalidPath(String),

    #[error("storage key cannot be empty")]
    EmptyStorageKey,

    #[error("malformed configuration: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsConfig {
    pub graphql_endpoint: String,
    pub notification_window_ms: u64,
    pub signup_path: String,
    pub token_storage_key: String,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            graphql_endpoint: DEFAULT_GRAPHQL_ENDPOINT.to_string(),
            notification_window_ms: NOTIFICATION_WINDOW_MS,
            signup_path: DEFAULT_SIGNUP_PATH.to_string(),
            token_storage_key: DEFAULT_TOKEN_KEY.to_string(),
        }
    }
}

impl SettingsConfig {
    /// Parses and validates a JSON document. Missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_endpoint(&self.graphql_endpoint)?;

        if self.notification_window_ms == 0 {
            return Err(ConfigError::ZeroNotificationWindow);
        }

        if !self.signup_path.starts_with('/') {
            return Err(ConfigError::InvalidPath(self.signup_path.clone()));
        }

        if self.token_storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }

        Ok(())
    }
}

fn validate_endpoint(url: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidEndpoint {
        url: truncate_url(url),
        reason: reason.to_string(),
    };

    if url.trim().is_empty() {
        return Err(invalid("URL cannot be empty"));
    }

    if url.len() > MAX_URL_LENGTH {
        return Err(invalid("URL is too long"));
    }

    let parsed = Url::parse(url).map_err(|e| invalid(&e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("only 'http' and 'https' are allowed"));
    }

    if parsed.host_str().is_none() {
        return Err(invalid("URL must have a host"));
    }

    if !parsed.username().is_empty() || parsed.password().is_some() {
        return Err(invalid("credentials in URL are not allowed"));
    }

    Ok(())
}

fn truncate_url(url: &str) -> String {
    if url.chars().count() <= 100 {
        url.to_string()
    } else {
        let head: String = url.chars().take(100).collect();
        format!("{head}...")
    }
}
