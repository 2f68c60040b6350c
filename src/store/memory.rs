//! In-Memory Credential Store
//!
//! HashMap-backed [`CredentialStore`] with the same conditional-update
//! semantics as the Postgres implementation. Used by the test suite and
//! handy for embedding the service without a database.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::models::Account;
use crate::store::{CredentialStore, StoreError};

/// Thread-safe in-memory account store
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    accounts: Mutex<HashMap<Uuid, Account>>,
}

impl InMemoryCredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub fn len(&self) -> usize {
        self.accounts.lock().expect("store mutex poisoned").len()
    }

    /// Whether the store holds no accounts
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Account>> {
        self.accounts.lock().expect("store mutex poisoned")
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn insert(&self, account: Account) -> Result<Account, StoreError> {
        let mut accounts = self.lock();
        if accounts.values().any(|a| a.email == account.email) {
            return Err(StoreError::DuplicateEmail);
        }
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.lock().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.lock().values().find(|a| a.email == email).cloned())
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .lock()
            .values()
            .find(|a| a.reset_token.as_deref() == Some(token))
            .cloned())
    }

    async fn find_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<Account>, StoreError> {
        Ok(self
            .lock()
            .values()
            .find(|a| a.email_verification_token.as_deref() == Some(token))
            .cloned())
    }

    async fn update(&self, account: &Account) -> Result<Account, StoreError> {
        let mut accounts = self.lock();
        let stored = accounts
            .get_mut(&account.id)
            .ok_or(StoreError::NotFound(account.id))?;
        if stored.version != account.version {
            return Err(StoreError::VersionConflict(account.id));
        }
        let mut updated = account.clone();
        updated.version += 1;
        *stored = updated.clone();
        Ok(updated)
    }
}
