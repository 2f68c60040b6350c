//! Recovery Token Managers
//!
//! Single-use token lifecycles for password reset and email verification.
//! Reset tokens expire; verification tokens deliberately do not. Consumption
//! commits through the store's conditional update, which is what makes each
//! token strictly single-use even under concurrent attempts.

use chrono::Duration;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use uuid::Uuid;

use crate::models::Account;
use crate::service::bounded;
use crate::store::CredentialStore;
use crate::utils::clock::Clock;
use crate::utils::error::{AuthError, AuthResult};
use crate::utils::security::{generate_secure_token, SECURITY_TOKEN_LENGTH};

/// Issues and consumes single-use, expiring password-reset tokens.
///
/// At most one reset token is active per account; issuing a new one
/// overwrites any outstanding token.
pub struct ResetTokenManager {
    store: Arc<dyn CredentialStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    store_timeout: StdDuration,
}

impl ResetTokenManager {
    /// Create a manager with the given token lifetime
    pub fn new(
        store: Arc<dyn CredentialStore>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
        store_timeout: StdDuration,
    ) -> Self {
        Self {
            store,
            clock,
            ttl,
            store_timeout,
        }
    }

    /// Issue a fresh reset token for an account, replacing any prior one.
    ///
    /// Delivery of the token to the user is the caller's concern.
    pub async fn issue(&self, account_id: Uuid) -> AuthResult<String> {
        let mut account = bounded(self.store_timeout, self.store.find_by_id(account_id))
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let now = self.clock.now();
        let token = generate_secure_token(SECURITY_TOKEN_LENGTH);
        account.reset_token = Some(token.clone());
        account.reset_expiry = Some(now + self.ttl);
        account.updated_at = now;

        bounded(self.store_timeout, self.store.update(&account)).await?;
        log::info!("issued password reset token for account {}", account_id);
        Ok(token)
    }

    /// Consume a reset token, installing the new password hash.
    ///
    /// Unknown, already-consumed, and expired tokens all fail with the same
    /// [`AuthError::InvalidResetToken`]; the caller learns nothing about
    /// which case occurred. On success the token and its expiry are cleared
    /// together with the password write, in one conditional update.
    pub async fn consume(&self, token: &str, new_password_hash: String) -> AuthResult<()> {
        let mut account = bounded(self.store_timeout, self.store.find_by_reset_token(token))
            .await?
            .ok_or(AuthError::InvalidResetToken)?;

        let now = self.clock.now();
        match account.reset_expiry {
            Some(expiry) if now < expiry => {}
            _ => {
                log::debug!("rejected expired reset token for account {}", account.id);
                return Err(AuthError::InvalidResetToken);
            }
        }

        account.password_hash = new_password_hash;
        account.reset_token = None;
        account.reset_expiry = None;
        account.updated_at = now;

        bounded(self.store_timeout, self.store.update(&account)).await?;
        log::info!("password reset completed for account {}", account.id);
        Ok(())
    }
}

/// Issues and consumes single-use email-verification tokens.
///
/// Verification tokens carry no expiry; the link stays valid until used.
pub struct VerificationTokenManager {
    store: Arc<dyn CredentialStore>,
    clock: Arc<dyn Clock>,
    store_timeout: StdDuration,
}

impl VerificationTokenManager {
    /// Create a manager over the given store
    pub fn new(
        store: Arc<dyn CredentialStore>,
        clock: Arc<dyn Clock>,
        store_timeout: StdDuration,
    ) -> Self {
        Self {
            store,
            clock,
            store_timeout,
        }
    }

    /// Stamp a fresh verification token on a not-yet-persisted account.
    ///
    /// Called during registration, before the first persist, so the token
    /// lands in the same write that creates the account.
    pub fn issue(&self, account: &mut Account) -> String {
        let token = generate_secure_token(SECURITY_TOKEN_LENGTH);
        account.email_verification_token = Some(token.clone());
        token
    }

    /// Consume a verification token, marking the email as verified.
    ///
    /// The verified flag and the token clear in one conditional update, so
    /// the token cannot be consumed twice.
    pub async fn consume(&self, token: &str) -> AuthResult<()> {
        let mut account = bounded(
            self.store_timeout,
            self.store.find_by_verification_token(token),
        )
        .await?
        .ok_or(AuthError::InvalidVerificationToken)?;

        account.email_verified = true;
        account.email_verification_token = None;
        account.updated_at = self.clock.now();

        bounded(self.store_timeout, self.store.update(&account)).await?;
        log::info!("email verified for account {}", account.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::store::InMemoryCredentialStore;
    use crate::utils::clock::ManualClock;
    use chrono::Utc;

    const TIMEOUT: StdDuration = StdDuration::from_secs(5);

    struct Fixture {
        store: Arc<InMemoryCredentialStore>,
        clock: Arc<ManualClock>,
        account_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryCredentialStore::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let account = Account::new(
            "Alice",
            "alice@example.com",
            "old-hash".to_string(),
            Role::Student,
            clock.now(),
        );
        let account = store.insert(account).await.unwrap();
        Fixture {
            store,
            clock,
            account_id: account.id,
        }
    }

    fn reset_manager(fx: &Fixture) -> ResetTokenManager {
        ResetTokenManager::new(
            fx.store.clone(),
            fx.clock.clone(),
            Duration::hours(1),
            TIMEOUT,
        )
    }

    #[tokio::test]
    async fn test_reset_token_is_single_use() {
        let fx = fixture().await;
        let manager = reset_manager(&fx);

        let token = manager.issue(fx.account_id).await.unwrap();
        manager
            .consume(&token, "new-hash".to_string())
            .await
            .unwrap();

        let account = fx.store.find_by_id(fx.account_id).await.unwrap().unwrap();
        assert_eq!(account.password_hash, "new-hash");
        assert!(account.reset_token.is_none());
        assert!(account.reset_expiry.is_none());

        // Replaying the consumed token fails
        let err = manager
            .consume(&token, "another-hash".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidResetToken));
    }

    #[tokio::test]
    async fn test_reset_token_expires() {
        let fx = fixture().await;
        let manager = reset_manager(&fx);

        let token = manager.issue(fx.account_id).await.unwrap();
        fx.clock.advance(Duration::hours(1));

        let err = manager
            .consume(&token, "new-hash".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidResetToken));

        // Password unchanged
        let account = fx.store.find_by_id(fx.account_id).await.unwrap().unwrap();
        assert_eq!(account.password_hash, "old-hash");
    }

    #[tokio::test]
    async fn test_reissue_overwrites_prior_token() {
        let fx = fixture().await;
        let manager = reset_manager(&fx);

        let first = manager.issue(fx.account_id).await.unwrap();
        let second = manager.issue(fx.account_id).await.unwrap();
        assert_ne!(first, second);

        // Only the latest token is honored
        assert!(matches!(
            manager
                .consume(&first, "new-hash".to_string())
                .await
                .unwrap_err(),
            AuthError::InvalidResetToken
        ));
        manager
            .consume(&second, "new-hash".to_string())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unknown_reset_token_rejected() {
        let fx = fixture().await;
        let manager = reset_manager(&fx);

        let err = manager
            .consume("no-such-token", "new-hash".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidResetToken));
    }

    #[tokio::test]
    async fn test_reset_issue_for_unknown_account() {
        let fx = fixture().await;
        let manager = reset_manager(&fx);

        let err = manager.issue(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn test_verification_token_is_single_use() {
        let fx = fixture().await;
        let manager =
            VerificationTokenManager::new(fx.store.clone(), fx.clock.clone(), TIMEOUT);

        // Stamp a token the way registration does, then persist it
        let mut account = fx.store.find_by_id(fx.account_id).await.unwrap().unwrap();
        let token = manager.issue(&mut account);
        fx.store.update(&account).await.unwrap();

        manager.consume(&token).await.unwrap();

        let account = fx.store.find_by_id(fx.account_id).await.unwrap().unwrap();
        assert!(account.email_verified);
        assert!(account.email_verification_token.is_none());

        let err = manager.consume(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidVerificationToken));
    }

    #[tokio::test]
    async fn test_verification_token_has_no_expiry() {
        let fx = fixture().await;
        let manager =
            VerificationTokenManager::new(fx.store.clone(), fx.clock.clone(), TIMEOUT);

        let mut account = fx.store.find_by_id(fx.account_id).await.unwrap().unwrap();
        let token = manager.issue(&mut account);
        fx.store.update(&account).await.unwrap();

        // A year later the link still works
        fx.clock.advance(Duration::days(365));
        manager.consume(&token).await.unwrap();
    }
}
