//! Credential Store
//!
//! Narrow persistence seam for account records. The authentication services
//! only ever touch accounts through [`CredentialStore`], and every mutation
//! is a conditional update keyed on `(id, version)` so concurrent
//! read-modify-write sequences cannot race into an inconsistent state.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::Account;

pub use memory::InMemoryCredentialStore;
pub use postgres::{PostgresCredentialStore, StoreConfig};

/// Errors produced by credential store implementations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Insert violated the unique email index
    #[error("Email already registered")]
    DuplicateEmail,

    /// Conditional update lost a race with a concurrent writer
    #[error("Concurrent modification of account {0}")]
    VersionConflict(Uuid),

    /// Update targeted an account that no longer exists
    #[error("Account {0} not found")]
    NotFound(Uuid),

    /// Underlying storage engine failure
    #[error("Storage backend error: {0}")]
    Backend(#[from] sqlx::Error),
}

/// Persistence contract for account records.
///
/// Lookups return `None` rather than an error when nothing matches; callers
/// decide how much to reveal. `update` succeeds only if the stored version
/// still matches the version the caller read, and bumps it on success.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persist a brand-new account; fails on a duplicate email
    async fn insert(&self, account: Account) -> Result<Account, StoreError>;

    /// Look up an account by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// Look up an account by normalized email
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Look up the account holding the given password-reset token
    async fn find_by_reset_token(&self, token: &str) -> Result<Option<Account>, StoreError>;

    /// Look up the account holding the given email-verification token
    async fn find_by_verification_token(&self, token: &str)
        -> Result<Option<Account>, StoreError>;

    /// Conditionally update an account, keyed on `(id, version)`.
    ///
    /// Returns the stored record with its bumped version, or
    /// [`StoreError::VersionConflict`] if someone else committed first.
    async fn update(&self, account: &Account) -> Result<Account, StoreError>;
}
