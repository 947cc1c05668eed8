use async_trait::async_trait;
use auth::Role;

use crate::account::errors::AccountError;
use crate::account::errors::StoreError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::LoginCommand;
use crate::account::models::NewAccount;
use crate::account::models::RegisterCommand;
use crate::account::models::Session;

/// Port for the authentication engine.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account in the given role namespace.
    ///
    /// # Errors
    /// * `EmailTaken` - Email already registered under this role
    /// * `StoreUnavailable` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Session, AccountError>;

    /// Authenticate an existing account and issue a token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password, uniformly
    /// * `StoreUnavailable` - Store operation failed
    async fn login(&self, command: LoginCommand) -> Result<Session, AccountError>;

    /// Fetch the account behind previously verified claims.
    ///
    /// # Errors
    /// * `NotFound` - Record deleted after the token was issued
    /// * `StoreUnavailable` - Store operation failed
    async fn profile(&self, role: Role, id: &AccountId) -> Result<Account, AccountError>;
}

/// Persistence contract over the two role namespaces.
///
/// Implementations dispatch on `role` to the correct physical namespace and
/// must enforce email uniqueness per namespace at the storage layer; the
/// engine's check-then-create sequence is racy without it.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Look up an account by email within one role namespace.
    ///
    /// # Errors
    /// * `Unavailable` - Store operation failed
    async fn find_by_email(&self, role: Role, email: &str)
        -> Result<Option<Account>, StoreError>;

    /// Look up an account by id within one role namespace.
    ///
    /// # Errors
    /// * `Unavailable` - Store operation failed
    async fn find_by_id(&self, role: Role, id: &AccountId)
        -> Result<Option<Account>, StoreError>;

    /// Persist a new account, assigning its id and creation time.
    ///
    /// # Errors
    /// * `ConstraintViolation` - Email already present in this namespace
    /// * `Unavailable` - Store operation failed
    async fn create(&self, role: Role, account: NewAccount) -> Result<Account, StoreError>;
}
