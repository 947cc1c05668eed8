use async_trait::async_trait;
use auth::Role;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::account::errors::StoreError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::DisplayName;
use crate::account::models::EmailAddress;
use crate::account::models::NewAccount;
use crate::account::ports::CredentialStore;

/// Postgres-backed credential store.
///
/// Each role owns a physical table; the `UNIQUE` constraint on email in
/// each table is what makes registration safe under concurrency.
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Physical namespace for a role. Fixed strings only; role never comes
    /// from user input unvalidated.
    fn table(role: Role) -> &'static str {
        match role {
            Role::Instructor => "instructors",
            Role::Learner => "learners",
        }
    }

    fn row_to_account(row: &PgRow) -> Result<Account, StoreError> {
        let corrupt = |detail: String| StoreError::Unavailable(detail);

        Ok(Account {
            id: AccountId(row.try_get("id").map_err(|e| corrupt(e.to_string()))?),
            name: DisplayName::new(row.try_get("name").map_err(|e| corrupt(e.to_string()))?)
                .map_err(|e| corrupt(e.to_string()))?,
            email: EmailAddress::new(row.try_get("email").map_err(|e| corrupt(e.to_string()))?)
                .map_err(|e| corrupt(e.to_string()))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| corrupt(e.to_string()))?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| corrupt(e.to_string()))?,
        })
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn find_by_email(
        &self,
        role: Role,
        email: &str,
    ) -> Result<Option<Account>, StoreError> {
        let query = format!(
            "SELECT id, name, email, password_hash, created_at FROM {} WHERE email = $1",
            Self::table(role)
        );

        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    async fn find_by_id(&self, role: Role, id: &AccountId) -> Result<Option<Account>, StoreError> {
        let query = format!(
            "SELECT id, name, email, password_hash, created_at FROM {} WHERE id = $1",
            Self::table(role)
        );

        let row = sqlx::query(&query)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    async fn create(&self, role: Role, account: NewAccount) -> Result<Account, StoreError> {
        let created = Account {
            id: AccountId::new(),
            name: account.name,
            email: account.email,
            password_hash: account.password_hash,
            created_at: Utc::now(),
        };

        let query = format!(
            "INSERT INTO {} (id, name, email, password_hash, created_at) VALUES ($1, $2, $3, $4, $5)",
            Self::table(role)
        );

        sqlx::query(&query)
            .bind(created.id.0)
            .bind(created.name.as_str())
            .bind(created.email.as_str())
            .bind(&created.password_hash)
            .bind(created.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return StoreError::ConstraintViolation(
                            db_err.constraint().unwrap_or("email").to_string(),
                        );
                    }
                }
                StoreError::Unavailable(e.to_string())
            })?;

        Ok(created)
    }
}
