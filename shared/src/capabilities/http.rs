use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::Event;
use crate::graphql::{decode_response, GraphQlOperation, MutationFailure};
use crate::{AppError, ErrorKind};

use super::AppHttp;

pub const MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024;
pub const MAX_HEADER_VALUE_LENGTH: usize = 8192;

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum HttpError {
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("request body too large: {size} bytes (max: {max})")]
    BodyTooLarge { size: usize, max: usize },
}

/// Builds the `Authorization` value for a session token.
pub fn bearer_header(token: &str) -> Result<String, HttpError> {
    let invalid = |reason: &str| HttpError::InvalidHeader {
        name: "Authorization".to_string(),
        reason: reason.to_string(),
    };

    let token = token.trim();
    if token.is_empty() {
        return Err(invalid("token cannot be empty"));
    }
    if token.len() > MAX_HEADER_VALUE_LENGTH {
        return Err(invalid("token is too long"));
    }
    if token.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err(invalid("token contains whitespace or control characters"));
    }

    Ok(format!("Bearer {token}"))
}

/// Sends one GraphQL request and maps its outcome to an event.
///
/// The request is only dispatched when the header and body pass validation;
/// otherwise nothing is sent and the error is returned to the caller.
pub fn post_graphql<T, F>(
    http: &AppHttp,
    endpoint: &str,
    token: Option<&str>,
    operation: GraphQlOperation,
    body: Vec<u8>,
    make_event: F,
) -> Result<(), HttpError>
where
    T: DeserializeOwned,
    F: FnOnce(Result<T, MutationFailure>) -> Event + Send + 'static,
{
    if body.len() > MAX_REQUEST_BODY_SIZE {
        return Err(HttpError::BodyTooLarge {
            size: body.len(),
            max: MAX_REQUEST_BODY_SIZE,
        });
    }

    let authorization = token.map(bearer_header).transpose()?;

    let mut builder = http
        .post(endpoint)
        .header("Content-Type", "application/json")
        .header("Accept", "application/json");
    if let Some(value) = authorization {
        builder = builder.header("Authorization", value.as_str());
    }

    tracing::debug!(
        operation = operation.name(),
        bytes = body.len(),
        "dispatching graphql request"
    );

    builder
        .body(body)
        .send(move |result| make_event(decode_http(operation, result)));

    Ok(())
}

/// Reduces a transport result to the typed payload or a user-facing failure.
pub fn decode_http<T: DeserializeOwned>(
    operation: GraphQlOperation,
    result: crux_http::Result<crux_http::Response<Vec<u8>>>,
) -> Result<T, MutationFailure> {
    match result {
        Ok(response) => {
            let status = u16::from(response.status());
            let body = response.body().map(Vec::as_slice).unwrap_or_default();
            decode_response(operation, status, body)
        }
        Err(e) => {
            tracing::warn!(operation = operation.name(), error = %e, "transport failure");
            Err(AppError::new(ErrorKind::Network, "Request failed")
                .with_internal(e.to_string())
                .into())
        }
    }
}
