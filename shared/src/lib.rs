// lib.rs - Account settings core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod app;
pub mod capabilities;
pub mod config;
pub mod event;
pub mod form;
pub mod graphql;
pub mod modal;
pub mod model;
pub mod notification;
pub mod overlay;
pub mod profile;
pub mod session;
pub mod theme;
pub mod validation;
pub mod view;

use serde::{Deserialize, Serialize};

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use config::SettingsConfig;
pub use crux_core::{render::Render, App as CruxApp};
pub use event::Event;
pub use form::{FormState, FormValues, SubmissionTicket, SubmitOutcome};
pub use model::{Model, SectionKey};
pub use profile::{Address, Phone, Role, UserProfile};
pub use view::ViewModel;

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const NOTIFICATION_WINDOW_MS: u64 = 3000;
pub const SUCCESS_MESSAGE: &str = "Account updated successfully";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    Timeout,
    Authentication,
    Authorization,
    Validation,
    NotFound,
    Conflict,
    RateLimited,
    Storage,
    Serialization,
    Deserialization,
    Configuration,
    InvalidState,
    Internal,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Authentication => "AUTH_ERROR",
            Self::Authorization => "FORBIDDEN",
            Self::Validation => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::RateLimited => "RATE_LIMITED",
            Self::Storage => "STORAGE_ERROR",
            Self::Serialization => "SERIALIZATION_ERROR",
            Self::Deserialization => "DESERIALIZATION_ERROR",
            Self::Configuration => "CONFIGURATION_ERROR",
            Self::InvalidState => "INVALID_STATE",
            Self::Internal => "INTERNAL_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub internal_message: Option<String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            internal_message: None,
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Network => {
                "Unable to connect. Please check your internet connection and try again.".into()
            }
            ErrorKind::Timeout => "The request timed out. Please try again.".into(),
            ErrorKind::Authentication => {
                "Your session has expired. Please sign in again.".into()
            }
            ErrorKind::Authorization => {
                "You don't have permission to perform this action.".into()
            }
            ErrorKind::Validation => self.message.clone(),
            ErrorKind::NotFound => "The requested item could not be found.".into(),
            ErrorKind::Conflict => {
                "This action conflicts with a recent change. Please refresh and try again.".into()
            }
            ErrorKind::RateLimited => "Too many requests. Please wait a moment and try again.".into(),
            ErrorKind::Storage => "Unable to save data locally.".into(),
            ErrorKind::Serialization | ErrorKind::Deserialization => {
                "A data error occurred. Please contact support if this persists.".into()
            }
            ErrorKind::Configuration | ErrorKind::InvalidState => {
                "The app is misconfigured. Please restart the app.".into()
            }
            ErrorKind::Internal | ErrorKind::Unknown => {
                "An unexpected error occurred. Please try again or contact support.".into()
            }
        }
    }

    #[must_use]
    pub fn from_http_status(status: u16, body: Option<&[u8]>) -> Self {
        let kind = match status {
            400 => ErrorKind::Validation,
            401 => ErrorKind::Authentication,
            403 => ErrorKind::Authorization,
            404 => ErrorKind::NotFound,
            408 => ErrorKind::Timeout,
            409 => ErrorKind::Conflict,
            429 => ErrorKind::RateLimited,
            500..=599 => ErrorKind::Internal,
            _ => ErrorKind::Unknown,
        };

        let message = body
            .and_then(|b| serde_json::from_slice::<ApiErrorResponse>(b).ok())
            .map(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP error: {status}"));

        Self::new(kind, message).with_internal(format!("status {status}"))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " (internal: {internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    message: String,
}

pub type AppResult<T> = Result<T, AppError>;

impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::new(ErrorKind::Configuration, e.to_string())
    }
}

impl From<capabilities::CapabilityError> for AppError {
    fn from(e: capabilities::CapabilityError) -> Self {
        let kind = match &e {
            capabilities::CapabilityError::Http(capabilities::HttpError::InvalidHeader { .. }) => {
                ErrorKind::Authentication
            }
            capabilities::CapabilityError::Http(capabilities::HttpError::BodyTooLarge { .. }) => {
                ErrorKind::Validation
            }
            capabilities::CapabilityError::Kv(_) => ErrorKind::Storage,
        };
        AppError::new(kind, e.to_string())
    }
}

impl From<capabilities::KvError> for AppError {
    fn from(e: capabilities::KvError) -> Self {
        AppError::new(ErrorKind::Storage, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod error_tests {
        use super::*;

        #[test]
        fn http_status_maps_to_kind() {
            assert_eq!(AppError::from_http_status(401, None).kind, ErrorKind::Authentication);
            assert_eq!(AppError::from_http_status(503, None).kind, ErrorKind::Internal);
            assert_eq!(AppError::from_http_status(418, None).kind, ErrorKind::Unknown);
        }

        #[test]
        fn http_status_prefers_body_message() {
            let err = AppError::from_http_status(400, Some(br#"{"message":"zip invalid"}"#));
            assert_eq!(err.message, "zip invalid");
            assert_eq!(err.user_facing_message(), "zip invalid");
            assert_eq!(err.internal_message.as_deref(), Some("status 400"));
        }

        #[test]
        fn display_includes_code_and_internal() {
            let err = AppError::new(ErrorKind::Network, "Request failed").with_internal("dns");
            assert_eq!(err.to_string(), "[NETWORK_ERROR] Request failed (internal: dns)");
        }

        #[test]
        fn config_errors_ask_for_a_restart() {
            let err: AppError = config::ConfigError::ZeroNotificationWindow.into();
            assert_eq!(err.kind, ErrorKind::Configuration);
            assert_eq!(
                err.user_facing_message(),
                "The app is misconfigured. Please restart the app."
            );
        }

        #[test]
        fn rejected_token_header_is_an_auth_error() {
            let err: AppError = capabilities::CapabilityError::from(
                capabilities::HttpError::InvalidHeader {
                    name: "Authorization".into(),
                    reason: "token cannot be empty".into(),
                },
            )
            .into();
            assert_eq!(err.kind, ErrorKind::Authentication);
            assert_eq!(
                err.user_facing_message(),
                "Your session has expired. Please sign in again."
            );
        }

        #[test]
        fn storage_errors_map_to_storage_kind() {
            let err: AppError = capabilities::KvError::Storage {
                message: "disk full".into(),
            }
            .into();
            assert_eq!(err.kind, ErrorKind::Storage);
            assert_eq!(err.code(), "STORAGE_ERROR");
        }
    }
}
