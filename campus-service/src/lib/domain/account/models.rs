use std::fmt;
use std::str::FromStr;

use auth::Role;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::account::errors::AccountIdError;
use crate::account::errors::DisplayNameError;
use crate::account::errors::EmailError;

/// Credential record for one registered user.
///
/// The same type backs both role namespaces; the role itself is never
/// stored on the record and is always carried alongside it by the engine.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name value type
///
/// Any non-empty string; whitespace-only names are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new valid display name.
    ///
    /// # Errors
    /// * `Empty` - Name is empty or contains only whitespace
    pub fn new(name: String) -> Result<Self, DisplayNameError> {
        if name.trim().is_empty() {
            Err(DisplayNameError::Empty)
        } else {
            Ok(Self(name))
        }
    }

    /// Get name as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. Uniqueness is a
/// store concern and only holds within a single role namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Fields the store needs to create a record; id and creation time are
/// assigned by the store itself.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password_hash: String,
}

/// Command to register a new account in one role namespace.
#[derive(Debug)]
pub struct RegisterCommand {
    pub role: Role,
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password: String,
}

/// Command to log an existing account in.
#[derive(Debug)]
pub struct LoginCommand {
    pub role: Role,
    pub email: EmailAddress,
    pub password: String,
}

/// Outcome of a successful registration or login: the account, the role it
/// authenticated under, and a freshly issued access token.
#[derive(Debug, Clone)]
pub struct Session {
    pub account: Account,
    pub role: Role,
    pub token: String,
}
