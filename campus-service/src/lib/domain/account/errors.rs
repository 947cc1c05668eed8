use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

/// Error for AccountId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for DisplayName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DisplayNameError {
    #[error("Name must not be empty")]
    Empty,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Failures surfaced by the credential store adapter.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A storage-level uniqueness constraint fired. During registration this
    /// is authoritative and maps to `EmailTaken`, even when the engine's own
    /// pre-check passed.
    #[error("Storage constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Top-level error for all credential lifecycle operations.
///
/// `InvalidCredentials` is a single variant on purpose: an unknown email and
/// a wrong password must be indistinguishable to the caller.
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid account ID: {0}")]
    InvalidAccountId(#[from] AccountIdError),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] DisplayNameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    // Domain-level errors
    #[error("Email is already in use")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account not found: {0}")]
    NotFound(String),

    // Infrastructure errors
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            // Outside of registration a constraint violation is an
            // infrastructure surprise, not a business outcome.
            StoreError::ConstraintViolation(detail) => AccountError::StoreUnavailable(detail),
            StoreError::Unavailable(detail) => AccountError::StoreUnavailable(detail),
        }
    }
}
