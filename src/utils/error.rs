//! Error Handling
//!
//! The authentication error taxonomy shared by every service.
//!
//! Credential and token failures are intentionally uninformative:
//! [`AuthError::InvalidCredentials`] never says whether the account exists,
//! and the reset/verification variants never say whether a token was unknown
//! or merely expired. [`AuthError::AccountLocked`] is the one deliberate
//! exception and carries the unlock time. Store and hashing failures are
//! logged with full detail but displayed as a generic internal error.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by the authentication and account-security services
#[derive(Error, Debug)]
pub enum AuthError {
    /// Wrong password or unknown email; the two are indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Account temporarily locked after repeated failed logins
    #[error("Account is locked")]
    AccountLocked { until: DateTime<Utc> },

    /// Access token past its expiry
    #[error("Token has expired")]
    TokenExpired,

    /// Access token failed signature or structural checks
    #[error("Invalid token")]
    InvalidToken,

    /// Refresh token rejected; expiry and tampering are not distinguished
    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    /// Registration attempted with an email that is already taken
    #[error("User already exists")]
    UserExists,

    /// No account for the requested identifier
    #[error("User not found")]
    UserNotFound,

    /// Reset token unknown, already consumed, or expired
    #[error("Invalid or expired reset token")]
    InvalidResetToken,

    /// Verification token unknown or already consumed
    #[error("Invalid verification token")]
    InvalidVerificationToken,

    /// Malformed input rejected before any store access
    #[error("Validation error: {0}")]
    Validation(String),

    /// Store or hashing failure; detail is logged, never displayed
    #[error("Internal server error")]
    Internal(String),
}

impl AuthError {
    /// Build an [`AuthError::Internal`], logging the full detail first
    pub fn internal(context: &str, detail: impl std::fmt::Display) -> Self {
        log::error!("{}: {}", context, detail);
        AuthError::Internal(context.to_string())
    }

    /// Stable machine-readable code for transport layers
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::AccountLocked { .. } => "ACCOUNT_LOCKED",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            AuthError::UserExists => "USER_EXISTS",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::InvalidResetToken => "INVALID_RESET_TOKEN",
            AuthError::InvalidVerificationToken => "INVALID_VERIFICATION_TOKEN",
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AuthError::UserExists,
            StoreError::VersionConflict(id) => {
                log::warn!("concurrent modification of account {}", id);
                AuthError::Internal("concurrent account update".to_string())
            }
            StoreError::NotFound(id) => {
                log::error!("account {} vanished mid-operation", id);
                AuthError::Internal("account disappeared during update".to_string())
            }
            StoreError::Backend(e) => AuthError::internal("store backend failure", e),
        }
    }
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AuthError::internal("password hashing failure", err)
    }
}

/// Result type alias for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
