use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Role;
use auth::TokenService;
use campus_service::account::errors::StoreError;
use campus_service::account::models::Account;
use campus_service::account::models::AccountId;
use campus_service::account::models::NewAccount;
use campus_service::account::ports::CredentialStore;
use campus_service::account::service::AuthService;
use campus_service::inbound::http::router::create_router;
use chrono::Utc;

pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// In-memory credential store keyed by `(role, email)`, mirroring the
/// per-namespace uniqueness the Postgres schema enforces.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    accounts: Mutex<HashMap<(Role, String), Account>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test hook: drop an account, simulating deletion after token issuance.
    pub fn remove(&self, role: Role, email: &str) {
        self.accounts
            .lock()
            .unwrap()
            .remove(&(role, email.to_string()));
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(
        &self,
        role: Role,
        email: &str,
    ) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.get(&(role, email.to_string())).cloned())
    }

    async fn find_by_id(&self, role: Role, id: &AccountId) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .iter()
            .find(|((r, _), account)| *r == role && account.id == *id)
            .map(|(_, account)| account.clone()))
    }

    async fn create(&self, role: Role, account: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        let key = (role, account.email.as_str().to_string());
        if accounts.contains_key(&key) {
            return Err(StoreError::ConstraintViolation(format!(
                "{}_email_key",
                role
            )));
        }

        let created = Account {
            id: AccountId::new(),
            name: account.name,
            email: account.email,
            password_hash: account.password_hash,
            created_at: Utc::now(),
        };
        accounts.insert(key, created.clone());
        Ok(created)
    }
}

/// Test application that spawns the real router on a random port.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub store: Arc<InMemoryCredentialStore>,
    pub token_service: TokenService,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(InMemoryCredentialStore::new());
        let token_service = Arc::new(TokenService::new(TEST_JWT_SECRET, 24));
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&store),
            Arc::clone(&token_service),
        ));

        let router = create_router(auth_service, token_service);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            store,
            token_service: TokenService::new(TEST_JWT_SECRET, 24),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register an account and return `(user id, token)`.
    pub async fn register(&self, name: &str, email: &str, password: &str, role: &str) -> (String, String) {
        let response = self
            .post("/auth/register")
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
                "role": role,
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        (
            body["user"]["id"].as_str().unwrap().to_string(),
            body["token"].as_str().unwrap().to_string(),
        )
    }
}
