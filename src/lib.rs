//! Account Service Library
//!
//! Authentication and account-security core for a user-account backend:
//! credential verification, access/refresh token issuance, brute-force
//! lockout, and single-use password-reset and email-verification tokens.
//! HTTP transport, email delivery, and admin CRUD live outside this crate;
//! it exposes transport-agnostic operations over a narrow store seam.
//!
//! # Features
//!
//! - **Credential Security**: bcrypt hashing with configurable cost
//! - **Stateless Tokens**: JWT access/refresh pairs, TTL-only invalidation
//! - **Brute-Force Lockout**: per-account state machine with pure,
//!   clock-injected transitions
//! - **Recovery Tokens**: single-use reset (expiring) and verification
//!   (non-expiring) token lifecycles
//! - **Race Safety**: every account mutation is one optimistic conditional
//!   update keyed on `(id, version)`
//! - **Deterministic Tests**: injectable [`Clock`](utils::clock::Clock) so
//!   no test waits on real time
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use account_service::{
//!     config::AuthConfig,
//!     models::{LoginRequest, RegisterRequest},
//!     service::AuthService,
//!     store::{PostgresCredentialStore, StoreConfig},
//!     utils::clock::SystemClock,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = StoreConfig::from_env()?.create_pool().await?;
//!     let store = PostgresCredentialStore::new(pool);
//!     store.run_migrations().await?;
//!
//!     let auth = AuthService::new(
//!         Arc::new(store),
//!         Arc::new(SystemClock),
//!         AuthConfig::from_env()?,
//!     );
//!
//!     let response = auth
//!         .register(RegisterRequest {
//!             name: "Alice Smith".to_string(),
//!             email: "alice@example.com".to_string(),
//!             password: "Str0ng!Pass".to_string(),
//!             role: None,
//!         })
//!         .await?;
//!     println!("registered {} ({})", response.account.email, response.account.id);
//!
//!     let response = auth
//!         .login(LoginRequest {
//!             email: "alice@example.com".to_string(),
//!             password: "Str0ng!Pass".to_string(),
//!         })
//!         .await?;
//!     println!("access token: {}", response.tokens.access_token);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **Service Layer**: [`AuthService`] orchestrates the
//!   [`TokenIssuer`](service::TokenIssuer),
//!   [`LoginAttemptGuard`](service::LoginAttemptGuard), and the recovery
//!   token managers
//! - **Store**: the [`CredentialStore`](store::CredentialStore) trait with
//!   Postgres and in-memory implementations
//! - **Models**: account records, claims, and request/response types
//! - **Utils**: hashing, validation, clock, and the error taxonomy
//!
//! # Security Posture
//!
//! Failure responses are deliberately uninformative: invalid credentials
//! never reveal whether the account exists, and reset/verification token
//! failures never reveal whether the token was unknown or expired. The one
//! intentional exception is [`AuthError::AccountLocked`], which carries the
//! unlock time.

/// Configuration for token lifetimes, password policy, and lockout
pub mod config;

/// Account records, claims, and request/response structures
pub mod models;

/// Business logic: tokens, lockout, recovery, and the auth orchestrator
pub mod service;

/// Credential persistence seam and its implementations
pub mod store;

/// Shared utilities for security, validation, time, and error handling
pub mod utils;

// Re-export commonly used types for convenient access
pub use config::{AuthConfig, PasswordPolicy};
pub use models::{
    AccessTokenClaims, Account, AccountSummary, AuthResponse, LoginRequest, RefreshTokenClaims,
    RefreshTokenRequest, RegisterRequest, ResetPasswordRequest, ResetRequestAck, Role, TokenPair,
};
pub use service::{
    AuthService, LockState, LoginAttemptGuard, LoginEvent, ResetTokenManager, TokenError,
    TokenIssuer, VerificationTokenManager,
};
pub use store::{
    CredentialStore, InMemoryCredentialStore, PostgresCredentialStore, StoreConfig, StoreError,
};
pub use utils::clock::{Clock, ManualClock, SystemClock};
pub use utils::error::{AuthError, AuthResult};
pub use utils::security::PasswordHasher;

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
