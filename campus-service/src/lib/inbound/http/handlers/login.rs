use auth::Role;
use auth::RoleParseError;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::register::AccountData;
use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::EmailError;
use crate::account::models::EmailAddress;
use crate::account::models::LoginCommand;
use crate::account::models::Session;
use crate::account::ports::AuthServicePort;
use crate::account::ports::CredentialStore;
use crate::inbound::http::router::AppState;

pub async fn login<CS: CredentialStore>(
    State(state): State<AppState<CS>>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    state
        .auth_service
        .login(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref session| ApiSuccess::new(StatusCode::OK, session.into()))
}

/// HTTP request body for login (raw JSON).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
    role: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseLoginRequestError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("{0}")]
    Role(#[from] RoleParseError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

fn require(value: Option<String>, field: &'static str) -> Result<String, ParseLoginRequestError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ParseLoginRequestError::MissingField(field)),
    }
}

impl LoginRequest {
    fn try_into_command(self) -> Result<LoginCommand, ParseLoginRequestError> {
        let email = EmailAddress::new(require(self.email, "email")?)?;
        let password = require(self.password, "password")?;
        let role: Role = require(self.role, "role")?.parse()?;
        Ok(LoginCommand {
            role,
            email,
            password,
        })
    }
}

impl From<ParseLoginRequestError> for ApiError {
    fn from(err: ParseLoginRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub user: AccountData,
    pub token: String,
    pub role: Role,
}

impl From<&Session> for LoginResponseData {
    fn from(session: &Session) -> Self {
        Self {
            user: (&session.account).into(),
            token: session.token.clone(),
            role: session.role,
        }
    }
}
