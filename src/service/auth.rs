//! Authentication Service
//!
//! Orchestrator for the account-security core. Composes the password hasher,
//! token issuer, lockout guard, and recovery-token managers against the
//! credential store. All collaborators are injected at construction; there
//! is no global state.
//!
//! Every account mutation commits through the store's conditional update
//! before any result (or token) becomes observable, so concurrent attempts
//! against the same account cannot under-count lockouts or replay consumed
//! tokens.

use std::sync::Arc;
use std::time::Duration as StdDuration;
use uuid::Uuid;
use validator::Validate;

use crate::config::{AuthConfig, PasswordPolicy};
use crate::models::{
    AccessTokenClaims, Account, AccountSummary, AuthResponse, LoginRequest, RefreshTokenRequest,
    RegisterRequest, ResetPasswordRequest, ResetRequestAck, Role, TokenPair,
};
use crate::service::jwt::{TokenError, TokenIssuer};
use crate::service::lockout::{LockState, LoginAttemptGuard, LoginEvent};
use crate::service::recovery::{ResetTokenManager, VerificationTokenManager};
use crate::service::bounded;
use crate::store::CredentialStore;
use crate::utils::clock::Clock;
use crate::utils::error::{AuthError, AuthResult};
use crate::utils::security::PasswordHasher;
use crate::utils::validation::{normalize_email, validate_email};

/// Authentication orchestrator exposing the register/login/refresh/reset/
/// verify operations
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    clock: Arc<dyn Clock>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
    guard: LoginAttemptGuard,
    reset_tokens: ResetTokenManager,
    verification_tokens: VerificationTokenManager,
    password_policy: PasswordPolicy,
    store_timeout: StdDuration,
}

impl AuthService {
    /// Build the service from its collaborators and configuration
    pub fn new(
        store: Arc<dyn CredentialStore>,
        clock: Arc<dyn Clock>,
        config: AuthConfig,
    ) -> Self {
        let tokens = TokenIssuer::new(
            &config.jwt_secret,
            config.access_token_ttl,
            config.refresh_token_ttl,
        );
        let guard = LoginAttemptGuard::new(config.max_login_attempts, config.lockout_duration);
        let reset_tokens = ResetTokenManager::new(
            store.clone(),
            clock.clone(),
            config.reset_token_ttl,
            config.store_timeout,
        );
        let verification_tokens =
            VerificationTokenManager::new(store.clone(), clock.clone(), config.store_timeout);

        Self {
            store,
            clock,
            hasher: PasswordHasher::new(config.bcrypt_cost),
            tokens,
            guard,
            reset_tokens,
            verification_tokens,
            password_policy: config.password_policy,
            store_timeout: config.store_timeout,
        }
    }

    /// Register a new account.
    ///
    /// Hashes the password, stamps a verification token, persists the
    /// account, and returns a token pair with the account summary. The
    /// verification token reaches the user through an external delivery
    /// collaborator, never through this response.
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<AuthResponse> {
        request
            .validate()
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        self.password_policy
            .validate(&request.password)
            .map_err(AuthError::Validation)?;

        let email = normalize_email(&request.email);
        if bounded(self.store_timeout, self.store.find_by_email(&email))
            .await?
            .is_some()
        {
            return Err(AuthError::UserExists);
        }

        let password_hash = self.hash_password(request.password).await?;
        let now = self.clock.now();
        let mut account = Account::new(
            request.name,
            email,
            password_hash,
            request.role.unwrap_or(Role::Student),
            now,
        );
        let _verification_token = self.verification_tokens.issue(&mut account);

        // The unique email index closes the window left by the pre-check
        let account = bounded(self.store_timeout, self.store.insert(account)).await?;
        log::info!("registered account {} ({})", account.id, account.role);

        let tokens = self
            .tokens
            .issue_pair(&account, now)
            .map_err(|e| AuthError::internal("token signing failure", e))?;
        Ok(AuthResponse {
            tokens,
            account: (&account).into(),
        })
    }

    /// Authenticate with email and password.
    ///
    /// The stored lock state is evaluated before the password: an actively
    /// locked account rejects even correct credentials with
    /// [`AuthError::AccountLocked`]. The resulting guard transition commits
    /// to the store before any decision is returned.
    pub async fn login(&self, request: LoginRequest) -> AuthResult<AuthResponse> {
        request
            .validate()
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let email = normalize_email(&request.email);
        let mut account = bounded(self.store_timeout, self.store.find_by_email(&email))
            .await?
            // Unknown email is indistinguishable from a wrong password
            .ok_or(AuthError::InvalidCredentials)?;

        let now = self.clock.now();
        let state = LockState::of(&account);
        if let Some(until) = self.guard.active_lock(state, now) {
            log::debug!("rejected login for locked account {}", account.id);
            return Err(AuthError::AccountLocked { until });
        }

        let password_ok = self
            .check_password(request.password, account.password_hash.clone())
            .await?;
        let event = if password_ok {
            LoginEvent::Succeeded
        } else {
            LoginEvent::Failed
        };

        let new_state = self.guard.apply(state, event, now);
        new_state.apply_to(&mut account);
        if password_ok {
            account.last_login = Some(now);
        }
        account.updated_at = now;

        // Commit the transition before revealing the outcome
        let account = bounded(self.store_timeout, self.store.update(&account)).await?;

        if !password_ok {
            if let LockState::Locked { until, .. } = new_state {
                log::warn!("account {} locked until {}", account.id, until);
            }
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self
            .tokens
            .issue_pair(&account, now)
            .map_err(|e| AuthError::internal("token signing failure", e))?;
        log::info!("account {} logged in", account.id);
        Ok(AuthResponse {
            tokens,
            account: (&account).into(),
        })
    }

    /// Exchange a refresh token for a fresh token pair.
    ///
    /// Expired and tampered refresh tokens are rejected alike with
    /// [`AuthError::InvalidRefreshToken`].
    pub async fn refresh(&self, request: RefreshTokenRequest) -> AuthResult<TokenPair> {
        request
            .validate()
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let now = self.clock.now();
        let claims = self
            .tokens
            .verify_refresh(&request.refresh_token, now)
            .map_err(|_| AuthError::InvalidRefreshToken)?;
        let account_id =
            Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidRefreshToken)?;

        let account = bounded(self.store_timeout, self.store.find_by_id(account_id))
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.tokens
            .issue_pair(&account, now)
            .map_err(|e| AuthError::internal("token signing failure", e))
    }

    /// Request a password reset for an email address.
    ///
    /// Always acknowledges with the identical payload whether or not the
    /// email matches an account, to prevent enumeration. When it does match,
    /// a reset token is issued for external delivery.
    pub async fn request_password_reset(&self, email: &str) -> AuthResult<ResetRequestAck> {
        let email = normalize_email(email);
        if !validate_email(&email) {
            return Ok(ResetRequestAck::new());
        }

        if let Some(account) = bounded(self.store_timeout, self.store.find_by_email(&email)).await?
        {
            match self.reset_tokens.issue(account.id).await {
                Ok(_token) => {} // handed to the delivery collaborator, never returned
                // The account vanished between lookup and issue; still uniform
                Err(AuthError::UserNotFound) => {}
                Err(e) => return Err(e),
            }
        }

        Ok(ResetRequestAck::new())
    }

    /// Consume a reset token and install a new password
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> AuthResult<()> {
        request
            .validate()
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        self.password_policy
            .validate(&request.new_password)
            .map_err(AuthError::Validation)?;

        let password_hash = self.hash_password(request.new_password).await?;
        self.reset_tokens.consume(&request.token, password_hash).await
    }

    /// Consume an email-verification token
    pub async fn verify_email(&self, token: &str) -> AuthResult<()> {
        self.verification_tokens.consume(token).await
    }

    /// Load the account summary for a verified access-token subject
    pub async fn current_user(&self, account_id: Uuid) -> AuthResult<AccountSummary> {
        let account = bounded(self.store_timeout, self.store.find_by_id(account_id))
            .await?
            .ok_or(AuthError::UserNotFound)?;
        Ok((&account).into())
    }

    /// Verify an access token on behalf of the transport layer.
    ///
    /// Unlike the refresh path, expiry and tampering are reported
    /// separately here.
    pub fn verify_access_token(&self, token: &str) -> AuthResult<AccessTokenClaims> {
        self.tokens
            .verify_access(token, self.clock.now())
            .map_err(|e| match e {
                TokenError::Expired => AuthError::TokenExpired,
                TokenError::Invalid => AuthError::InvalidToken,
            })
    }

    /// Hash a password on the blocking pool; bcrypt is CPU-bound by design
    async fn hash_password(&self, password: String) -> AuthResult<String> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::internal("hashing task failed", e))?
            .map_err(AuthError::from)
    }

    /// Verify a password on the blocking pool
    async fn check_password(&self, password: String, password_hash: String) -> AuthResult<bool> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &password_hash))
            .await
            .map_err(|e| AuthError::internal("hashing task failed", e))
    }
}
