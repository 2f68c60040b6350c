//! PostgreSQL Credential Store
//!
//! SQLx-backed [`CredentialStore`] implementation. Writes are optimistic:
//! every `UPDATE` is conditioned on the version the caller read and bumps it,
//! so a lost race surfaces as [`StoreError::VersionConflict`] instead of a
//! silently overwritten lockout counter or reset token.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use std::time::Duration;
use uuid::Uuid;

use crate::models::{Account, Role};
use crate::store::{CredentialStore, StoreError};

/// Connection pool configuration for the Postgres store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/account_service".to_string(),
            max_connections: 20,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(3600),
        }
    }
}

impl StoreConfig {
    /// Create store configuration from environment variables
    pub fn from_env() -> Result<Self, std::env::VarError> {
        let url = std::env::var("DATABASE_URL")?;

        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(20);

        let min_connections = std::env::var("DB_MIN_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);

        let connect_timeout_secs = std::env::var("DB_CONNECT_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        let idle_timeout_secs = std::env::var("DB_IDLE_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(600);

        let max_lifetime_secs = std::env::var("DB_MAX_LIFETIME")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3600);

        Ok(Self {
            url,
            max_connections,
            min_connections,
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            idle_timeout: Duration::from_secs(idle_timeout_secs),
            max_lifetime: Duration::from_secs(max_lifetime_secs),
        })
    }

    /// Create a connection pool from this configuration
    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .connect(&self.url)
            .await
    }
}

/// Row shape of the `accounts` table
#[derive(Debug, FromRow)]
struct AccountRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    email_verified: bool,
    email_verification_token: Option<String>,
    reset_token: Option<String>,
    reset_expiry: Option<DateTime<Utc>>,
    login_attempts: i32,
    lock_until: Option<DateTime<Utc>>,
    last_login: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i64,
}

impl TryFrom<AccountRow> for Account {
    type Error = StoreError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e: String| StoreError::Backend(sqlx::Error::Decode(e.into())))?;
        Ok(Account {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            email_verified: row.email_verified,
            email_verification_token: row.email_verification_token,
            reset_token: row.reset_token,
            reset_expiry: row.reset_expiry,
            login_attempts: row.login_attempts.max(0) as u32,
            lock_until: row.lock_until,
            last_login: row.last_login,
            created_at: row.created_at,
            updated_at: row.updated_at,
            version: row.version,
        })
    }
}

const ACCOUNT_COLUMNS: &str = "id, name, email, password_hash, role, email_verified, \
     email_verification_token, reset_token, reset_expiry, login_attempts, lock_until, \
     last_login, created_at, updated_at, version";

/// Credential store backed by PostgreSQL
#[derive(Clone)]
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    /// Create a store over an existing connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the embedded schema migrations
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    async fn fetch_optional(
        &self,
        sql: &str,
        bind: &str,
    ) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(sql)
            .bind(bind)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Account::try_from).transpose()
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn insert(&self, account: Account) -> Result<Account, StoreError> {
        let sql = format!(
            "INSERT INTO accounts ({ACCOUNT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(account.id)
            .bind(&account.name)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(account.role.as_str())
            .bind(account.email_verified)
            .bind(&account.email_verification_token)
            .bind(&account.reset_token)
            .bind(account.reset_expiry)
            .bind(account.login_attempts as i32)
            .bind(account.lock_until)
            .bind(account.last_login)
            .bind(account.created_at)
            .bind(account.updated_at)
            .bind(account.version)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e.as_database_error() {
                Some(db_err) if db_err.is_unique_violation() => StoreError::DuplicateEmail,
                _ => StoreError::Backend(e),
            })?;
        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1");
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Account::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1");
        self.fetch_optional(&sql, email).await
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<Account>, StoreError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE reset_token = $1");
        self.fetch_optional(&sql, token).await
    }

    async fn find_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<Account>, StoreError> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email_verification_token = $1"
        );
        self.fetch_optional(&sql, token).await
    }

    async fn update(&self, account: &Account) -> Result<Account, StoreError> {
        let sql = format!(
            "UPDATE accounts SET \
                name = $3, email = $4, password_hash = $5, role = $6, \
                email_verified = $7, email_verification_token = $8, \
                reset_token = $9, reset_expiry = $10, login_attempts = $11, \
                lock_until = $12, last_login = $13, updated_at = $14, \
                version = version + 1 \
             WHERE id = $1 AND version = $2 \
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(account.id)
            .bind(account.version)
            .bind(&account.name)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(account.role.as_str())
            .bind(account.email_verified)
            .bind(&account.email_verification_token)
            .bind(&account.reset_token)
            .bind(account.reset_expiry)
            .bind(account.login_attempts as i32)
            .bind(account.lock_until)
            .bind(account.last_login)
            .bind(account.updated_at)
            .fetch_optional(&self.pool)
            .await?;

        // No row matched: either the version moved or the account is gone.
        // Both invalidate the caller's read, so report a conflict.
        match row {
            Some(row) => row.try_into(),
            None => Err(StoreError::VersionConflict(account.id)),
        }
    }
}
