//! Service Layer
//!
//! Business logic for the authentication core: token issuance, the lockout
//! state machine, recovery-token lifecycles, and the orchestrating
//! authentication service.

pub mod auth;
pub mod jwt;
pub mod lockout;
pub mod recovery;

// Re-export services
pub use auth::AuthService;
pub use jwt::{TokenError, TokenIssuer};
pub use lockout::{LockState, LoginAttemptGuard, LoginEvent};
pub use recovery::{ResetTokenManager, VerificationTokenManager};

use std::future::Future;
use std::time::Duration;

use crate::store::StoreError;
use crate::utils::error::{AuthError, AuthResult};

/// Run a store operation under the configured timeout.
///
/// Store calls may block on a slow backend; a timeout surfaces as a
/// retryable internal error rather than hanging the operation.
pub(crate) async fn bounded<T>(
    limit: Duration,
    operation: impl Future<Output = Result<T, StoreError>>,
) -> AuthResult<T> {
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result.map_err(AuthError::from),
        Err(_) => {
            log::error!("store operation timed out after {:?}", limit);
            Err(AuthError::Internal("store operation timed out".to_string()))
        }
    }
}
