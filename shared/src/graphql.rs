//! GraphQL documents, request bodies and response decoding for the account API.
//!
//! Transport lives in `capabilities::http`; this module only turns typed
//! variables into JSON and JSON back into `Result<T, MutationFailure>`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::profile::UserProfile;
use crate::{AppError, ErrorKind};

pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

const USER_FIELDS: &str = "id email firstName lastName role \
     phone { prefix number } address { place city zip country }";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphQlOperation {
    UpdateUserInfo,
    UpdateUserPassword,
    DeleteUser,
    GetCountryCodes,
}

impl GraphQlOperation {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UpdateUserInfo => "UpdateUserInfo",
            Self::UpdateUserPassword => "UpdateUserPassword",
            Self::DeleteUser => "DeleteUser",
            Self::GetCountryCodes => "GetCountryCodes",
        }
    }

    /// Field under `data` holding the operation's result.
    #[must_use]
    pub const fn root_field(self) -> &'static str {
        match self {
            Self::UpdateUserInfo => "updateUserInfo",
            Self::UpdateUserPassword => "updateUserPassword",
            Self::DeleteUser => "deleteUser",
            Self::GetCountryCodes => "getCountryCode",
        }
    }

    #[must_use]
    pub fn document(self) -> String {
        match self {
            Self::UpdateUserInfo => format!(
                "mutation UpdateUserInfo($user: UserInput!) {{ updateUserInfo(user: $user) {{ {USER_FIELDS} }} }}"
            ),
            Self::UpdateUserPassword => format!(
                "mutation UpdateUserPassword($id: ID!, $password: PasswordInput!) {{ updateUserPassword(id: $id, password: $password) {{ {USER_FIELDS} }} }}"
            ),
            Self::DeleteUser => {
                "mutation DeleteUser($id: ID!, $password: String!) { deleteUser(id: $id, password: $password) }"
                    .to_string()
            }
            Self::GetCountryCodes => {
                "query GetCountryCodes { getCountryCode { prefix country } }".to_string()
            }
        }
    }
}

/// A failed remote call, reduced to the single message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct MutationFailure {
    pub message: String,
}

impl MutationFailure {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<AppError> for MutationFailure {
    fn from(e: AppError) -> Self {
        Self::new(e.user_facing_message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCode {
    pub prefix: String,
    pub country: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRequest<'a, V> {
    operation_name: &'static str,
    query: &'a str,
    variables: V,
}

#[derive(Serialize)]
struct UpdateUserInfoVariables<'a> {
    user: &'a UserProfile,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordInput<'a> {
    old_password: &'a str,
    new_password: &'a str,
}

#[derive(Serialize)]
struct UpdateUserPasswordVariables<'a> {
    id: &'a str,
    password: PasswordInput<'a>,
}

#[derive(Serialize)]
struct DeleteUserVariables<'a> {
    id: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct NoVariables {}

fn encode<V: Serialize>(operation: GraphQlOperation, variables: V) -> Result<Vec<u8>, AppError> {
    let document = operation.document();
    let request = GraphQlRequest {
        operation_name: operation.name(),
        query: &document,
        variables,
    };
    serde_json::to_vec(&request).map_err(|e| {
        AppError::new(ErrorKind::Serialization, "Could not encode request")
            .with_internal(format!("{}: {e}", operation.name()))
    })
}

pub fn update_user_info_body(user: &UserProfile) -> Result<Vec<u8>, AppError> {
    encode(GraphQlOperation::UpdateUserInfo, UpdateUserInfoVariables { user })
}

pub fn update_user_password_body(
    id: &str,
    old_password: &str,
    new_password: &str,
) -> Result<Vec<u8>, AppError> {
    encode(
        GraphQlOperation::UpdateUserPassword,
        UpdateUserPasswordVariables {
            id,
            password: PasswordInput {
                old_password,
                new_password,
            },
        },
    )
}

pub fn delete_user_body(id: &str, password: &str) -> Result<Vec<u8>, AppError> {
    encode(GraphQlOperation::DeleteUser, DeleteUserVariables { id, password })
}

pub fn get_country_codes_body() -> Result<Vec<u8>, AppError> {
    encode(GraphQlOperation::GetCountryCodes, NoVariables {})
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ErrorExtensions {
    #[serde(default)]
    info: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct GraphQlError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    extensions: Option<ErrorExtensions>,
}

impl GraphQlError {
    fn user_message(&self) -> String {
        self.extensions
            .as_ref()
            .and_then(|ext| ext.info.as_deref())
            .filter(|info| !info.trim().is_empty())
            .or_else(|| Some(self.message.as_str()).filter(|m| !m.trim().is_empty()))
            .unwrap_or(GENERIC_FAILURE_MESSAGE)
            .to_string()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

/// Decodes a response body. The first reported GraphQL error wins over any
/// partial data.
pub fn decode_response<T: DeserializeOwned>(
    operation: GraphQlOperation,
    status: u16,
    body: &[u8],
) -> Result<T, MutationFailure> {
    let envelope: GraphQlResponse = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            return Err(AppError::from_http_status(status, Some(body))
                .with_internal(e.to_string())
                .into());
        }
    };

    if let Some(first) = envelope.errors.first() {
        return Err(MutationFailure::new(first.user_message()));
    }

    let root = operation.root_field();
    let value = envelope
        .data
        .and_then(|mut data| data.get_mut(root).map(serde_json::Value::take))
        .ok_or_else(|| {
            AppError::new(ErrorKind::Deserialization, format!("missing `{root}` in response"))
        })?;

    serde_json::from_value(value).map_err(|e| {
        MutationFailure::from(
            AppError::new(ErrorKind::Deserialization, e.to_string())
                .with_internal(operation.name()),
        )
    })
}
