use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::Role;
use auth::TokenService;

use crate::account::errors::AccountError;
use crate::account::errors::StoreError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::LoginCommand;
use crate::account::models::NewAccount;
use crate::account::models::RegisterCommand;
use crate::account::models::Session;
use crate::account::ports::AuthServicePort;
use crate::account::ports::CredentialStore;

/// The authentication engine.
///
/// Orchestrates registration, login, and profile retrieval over a
/// credential store, owning all validation and error-mapping policy.
pub struct AuthService<CS>
where
    CS: CredentialStore,
{
    store: Arc<CS>,
    password_hasher: PasswordHasher,
    tokens: Arc<TokenService>,
}

impl<CS> AuthService<CS>
where
    CS: CredentialStore,
{
    /// Create a new authentication engine with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `tokens` - Token issuance/verification service
    pub fn new(store: Arc<CS>, tokens: Arc<TokenService>) -> Self {
        Self {
            store,
            password_hasher: PasswordHasher::new(),
            tokens,
        }
    }
}

#[async_trait]
impl<CS> AuthServicePort for AuthService<CS>
where
    CS: CredentialStore,
{
    async fn register(&self, command: RegisterCommand) -> Result<Session, AccountError> {
        let existing = self
            .store
            .find_by_email(command.role, command.email.as_str())
            .await?;
        if existing.is_some() {
            return Err(AccountError::EmailTaken);
        }

        let password_hash = self.password_hasher.hash(&command.password)?;

        let account = self
            .store
            .create(
                command.role,
                NewAccount {
                    name: command.name,
                    email: command.email,
                    password_hash,
                },
            )
            .await
            .map_err(|e| match e {
                // A race lost against a concurrent registration; the store's
                // uniqueness constraint is authoritative.
                StoreError::ConstraintViolation(detail) => {
                    tracing::warn!(%detail, "Registration pre-check passed but insert hit a constraint");
                    AccountError::EmailTaken
                }
                StoreError::Unavailable(detail) => AccountError::StoreUnavailable(detail),
            })?;

        let token = self
            .tokens
            .issue(account.id, account.email.as_str(), command.role)?;

        Ok(Session {
            account,
            role: command.role,
            token,
        })
    }

    async fn login(&self, command: LoginCommand) -> Result<Session, AccountError> {
        let account = self
            .store
            .find_by_email(command.role, command.email.as_str())
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !self
            .password_hasher
            .verify(&command.password, &account.password_hash)
        {
            return Err(AccountError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(account.id, account.email.as_str(), command.role)?;

        Ok(Session {
            account,
            role: command.role,
            token,
        })
    }

    async fn profile(&self, role: Role, id: &AccountId) -> Result<Account, AccountError> {
        self.store
            .find_by_id(role, id)
            .await?
            .ok_or(AccountError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::account::models::DisplayName;
    use crate::account::models::EmailAddress;

    mock! {
        pub TestCredentialStore {}

        #[async_trait]
        impl CredentialStore for TestCredentialStore {
            async fn find_by_email(&self, role: Role, email: &str) -> Result<Option<Account>, StoreError>;
            async fn find_by_id(&self, role: Role, id: &AccountId) -> Result<Option<Account>, StoreError>;
            async fn create(&self, role: Role, account: NewAccount) -> Result<Account, StoreError>;
        }
    }

    const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

    fn service(store: MockTestCredentialStore) -> AuthService<MockTestCredentialStore> {
        AuthService::new(Arc::new(store), Arc::new(TokenService::new(TEST_SECRET, 24)))
    }

    fn stored_account(email: &str, password: &str) -> Account {
        Account {
            id: AccountId::new(),
            name: DisplayName::new("Ana".to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: PasswordHasher::new().hash(password).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn register_command(role: Role, email: &str) -> RegisterCommand {
        RegisterCommand {
            role,
            name: DisplayName::new("Ana".to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password: "s3cret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_find_by_email()
            .withf(|role, email| *role == Role::Learner && email == "ana@x.com")
            .times(1)
            .returning(|_, _| Ok(None));

        store
            .expect_create()
            .withf(|role, account| {
                *role == Role::Learner
                    && account.email.as_str() == "ana@x.com"
                    && account.password_hash.starts_with("$argon2")
                    && account.password_hash != "s3cret"
            })
            .times(1)
            .returning(|_, new| {
                Ok(Account {
                    id: AccountId::new(),
                    name: new.name,
                    email: new.email,
                    password_hash: new.password_hash,
                    created_at: Utc::now(),
                })
            });

        let service = service(store);
        let session = service
            .register(register_command(Role::Learner, "ana@x.com"))
            .await
            .expect("Registration failed");

        assert_eq!(session.role, Role::Learner);
        assert!(PasswordHasher::new().verify("s3cret", &session.account.password_hash));

        // Token binds the freshly created record's id.
        let claims = TokenService::new(TEST_SECRET, 24)
            .verify(&session.token)
            .expect("Token verification failed");
        assert_eq!(claims.sub, session.account.id.to_string());
        assert_eq!(claims.role, Role::Learner);
    }

    #[tokio::test]
    async fn test_register_email_taken() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_find_by_email()
            .times(1)
            .returning(|_, _| Ok(Some(stored_account("ana@x.com", "whatever"))));
        store.expect_create().times(0);

        let service = service(store);
        let result = service
            .register(register_command(Role::Learner, "ana@x.com"))
            .await;

        assert!(matches!(result, Err(AccountError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_register_race_maps_constraint_to_email_taken() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_find_by_email()
            .times(1)
            .returning(|_, _| Ok(None));
        store.expect_create().times(1).returning(|_, _| {
            Err(StoreError::ConstraintViolation(
                "learners_email_key".to_string(),
            ))
        });

        let service = service(store);
        let result = service
            .register(register_command(Role::Learner, "ana@x.com"))
            .await;

        assert!(matches!(result, Err(AccountError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_login_success_token_subject_matches() {
        let account = stored_account("ana@x.com", "s3cret");
        let account_id = account.id;

        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_by_email()
            .withf(|role, email| *role == Role::Instructor && email == "ana@x.com")
            .times(1)
            .returning(move |_, _| Ok(Some(account.clone())));

        let service = service(store);
        let session = service
            .login(LoginCommand {
                role: Role::Instructor,
                email: EmailAddress::new("ana@x.com".to_string()).unwrap(),
                password: "s3cret".to_string(),
            })
            .await
            .expect("Login failed");

        let claims = TokenService::new(TEST_SECRET, 24)
            .verify(&session.token)
            .expect("Token verification failed");
        assert_eq!(claims.sub, account_id.to_string());
        assert_eq!(claims.role, Role::Instructor);
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_email_are_indistinguishable() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_by_email()
            .withf(|_, email| email == "ana@x.com")
            .returning(|_, _| Ok(Some(stored_account("ana@x.com", "s3cret"))));
        store
            .expect_find_by_email()
            .withf(|_, email| email == "ghost@x.com")
            .returning(|_, _| Ok(None));

        let service = service(store);

        let wrong_password = service
            .login(LoginCommand {
                role: Role::Learner,
                email: EmailAddress::new("ana@x.com".to_string()).unwrap(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();
        let unknown_email = service
            .login(LoginCommand {
                role: Role::Learner,
                email: EmailAddress::new("ghost@x.com".to_string()).unwrap(),
                password: "s3cret".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AccountError::InvalidCredentials));
        assert!(matches!(unknown_email, AccountError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_profile_success() {
        let account = stored_account("ana@x.com", "s3cret");
        let account_id = account.id;

        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_by_id()
            .withf(move |role, id| *role == Role::Learner && *id == account_id)
            .times(1)
            .returning(move |_, _| Ok(Some(account.clone())));

        let service = service(store);
        let found = service.profile(Role::Learner, &account_id).await.unwrap();
        assert_eq!(found.id, account_id);
    }

    #[tokio::test]
    async fn test_profile_not_found_after_deletion() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_by_id()
            .times(1)
            .returning(|_, _| Ok(None));

        let service = service(store);
        let result = service.profile(Role::Learner, &AccountId::new()).await;
        assert!(matches!(result, Err(AccountError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_unavailable() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_by_email()
            .times(1)
            .returning(|_, _| Err(StoreError::Unavailable("connection refused".to_string())));

        let service = service(store);
        let result = service
            .register(register_command(Role::Instructor, "ana@x.com"))
            .await;
        assert!(matches!(result, Err(AccountError::StoreUnavailable(_))));
    }
}
