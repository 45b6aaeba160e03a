use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::Event;

use super::AppKv;

pub const MAX_KEY_LENGTH: usize = 256;

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum KvError {
    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("storage error: {message}")]
    Storage { message: String },
}

/// A validated key for the shell's key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(key: impl Into<String>) -> Result<Self, KvError> {
        let key = key.into();
        Self::validate_key(&key)?;
        Ok(Self(key))
    }

    /// The key as seen by the shell. Unprefixed, so other screens read the
    /// token under its plain name.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.0
    }

    fn validate_key(key: &str) -> Result<(), KvError> {
        let invalid = |reason: &str| KvError::InvalidKey {
            key: key.chars().take(50).collect(),
            reason: reason.to_string(),
        };

        if key.trim().is_empty() {
            return Err(invalid("key cannot be empty"));
        }
        if key.len() > MAX_KEY_LENGTH {
            return Err(invalid("key is too long"));
        }
        if key.contains("..") {
            return Err(invalid("key cannot contain path traversal sequences"));
        }
        if key.starts_with('/') || key.starts_with('\\') {
            return Err(invalid("key cannot start with path separator"));
        }
        if key.chars().any(char::is_control) {
            return Err(invalid("key contains control characters"));
        }

        Ok(())
    }
}

pub fn persist_token(kv: &AppKv, key: &StorageKey, token: &str) {
    tracing::debug!(key = %key.raw(), "persisting session token");
    kv.set(key.raw().to_string(), token.as_bytes().to_vec(), |result| Event::TokenPersisted {
        error: result.err().map(|e| e.to_string()),
    });
}

pub fn clear_token(kv: &AppKv, key: &StorageKey) {
    tracing::debug!(key = %key.raw(), "clearing session token");
    kv.delete(key.raw().to_string(), |result| Event::TokenCleared {
        error: result.err().map(|e| e.to_string()),
    });
}
