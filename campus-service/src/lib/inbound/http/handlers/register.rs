use auth::Role;
use auth::RoleParseError;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::DisplayNameError;
use crate::account::errors::EmailError;
use crate::account::models::Account;
use crate::account::models::DisplayName;
use crate::account::models::EmailAddress;
use crate::account::models::RegisterCommand;
use crate::account::models::Session;
use crate::account::ports::AuthServicePort;
use crate::account::ports::CredentialStore;
use crate::inbound::http::router::AppState;

pub async fn register<CS: CredentialStore>(
    State(state): State<AppState<CS>>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref session| ApiSuccess::new(StatusCode::CREATED, session.into()))
}

/// HTTP request body for registration (raw JSON).
///
/// Every field is optional at the wire level so that missing and empty
/// fields both produce the same 400, before any store access.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    role: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("{0}")]
    Role(#[from] RoleParseError),

    #[error("Invalid name: {0}")]
    Name(#[from] DisplayNameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

fn require(
    value: Option<String>,
    field: &'static str,
) -> Result<String, ParseRegisterRequestError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ParseRegisterRequestError::MissingField(field)),
    }
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ParseRegisterRequestError> {
        let name = DisplayName::new(require(self.name, "name")?)?;
        let email = EmailAddress::new(require(self.email, "email")?)?;
        let password = require(self.password, "password")?;
        let role: Role = require(self.role, "role")?.parse()?;
        Ok(RegisterCommand {
            role,
            name,
            email,
            password,
        })
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub user: AccountData,
    pub token: String,
    pub role: Role,
}

impl From<&Session> for RegisterResponseData {
    fn from(session: &Session) -> Self {
        Self {
            user: (&session.account).into(),
            token: session.token.clone(),
            role: session.role,
        }
    }
}

/// Outward account view; the password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountData {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            name: account.name.as_str().to_string(),
            email: account.email.as_str().to_string(),
            created_at: account.created_at,
        }
    }
}
