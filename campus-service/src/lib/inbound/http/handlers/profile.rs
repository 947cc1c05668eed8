use auth::Role;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::register::AccountData;
use super::ApiError;
use super::ApiSuccess;
use crate::account::ports::AuthServicePort;
use crate::account::ports::CredentialStore;
use crate::inbound::http::middleware::AuthenticatedAccount;
use crate::inbound::http::router::AppState;

/// Protected: requires the bearer middleware to have verified the token and
/// attached the caller's identity to the request.
pub async fn profile<CS: CredentialStore>(
    State(state): State<AppState<CS>>,
    Extension(current): Extension<AuthenticatedAccount>,
) -> Result<ApiSuccess<ProfileResponseData>, ApiError> {
    state
        .auth_service
        .profile(current.role, &current.account_id)
        .await
        .map_err(ApiError::from)
        .map(|ref account| {
            ApiSuccess::new(
                StatusCode::OK,
                ProfileResponseData {
                    user: account.into(),
                    role: current.role,
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileResponseData {
    pub user: AccountData,
    pub role: Role,
}
