//! Authentication Models
//!
//! Token pairs, JWT claims, and response payloads for the authentication
//! operations. Tokens are stateless; claims carry their own expiry and no
//! server-side session backs them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::account::{AccountSummary, Role};

/// JWT token pair produced per successful authentication event.
///
/// Ephemeral, never persisted. Each token embeds its own expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token for API authentication
    pub access_token: String,

    /// Long-lived refresh token for obtaining new token pairs
    pub refresh_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,
}

impl TokenPair {
    /// Create a new token pair
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

/// Claims signed into access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject - account ID
    pub sub: String,

    /// Account role
    pub role: Role,

    /// Account email
    pub email: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Token type (always "access")
    #[serde(rename = "type")]
    pub token_type: String,
}

impl AccessTokenClaims {
    /// Create access token claims for an account
    pub fn new(
        account_id: Uuid,
        role: Role,
        email: &str,
        expires_at: DateTime<Utc>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: account_id.to_string(),
            role,
            email: email.to_string(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
            token_type: "access".to_string(),
        }
    }
}

/// Claims signed into refresh tokens; carries only the account identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    /// Subject - account ID
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Token type (always "refresh")
    #[serde(rename = "type")]
    pub token_type: String,
}

impl RefreshTokenClaims {
    /// Create refresh token claims for an account
    pub fn new(account_id: Uuid, expires_at: DateTime<Utc>, issued_at: DateTime<Utc>) -> Self {
        Self {
            sub: account_id.to_string(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
            token_type: "refresh".to_string(),
        }
    }
}

/// Successful registration or login payload
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    /// Freshly issued token pair
    pub tokens: TokenPair,

    /// The authenticated account, without its password hash
    pub account: AccountSummary,
}

/// Uniform acknowledgment for password-reset requests.
///
/// Identical whether or not the email matched an account, to prevent
/// account enumeration.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResetRequestAck {
    /// Generic, enumeration-safe message
    pub message: String,
}

impl ResetRequestAck {
    const MESSAGE: &'static str = "If an account exists, a reset link will be sent.";

    /// The one and only acknowledgment payload
    pub fn new() -> Self {
        Self {
            message: Self::MESSAGE.to_string(),
        }
    }
}

impl Default for ResetRequestAck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_pair_creation() {
        let pair = TokenPair::new("access".to_string(), "refresh".to_string(), 900);
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 900);
    }

    #[test]
    fn test_access_claims_carry_identity() {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let exp = now + chrono::Duration::minutes(15);
        let claims = AccessTokenClaims::new(id, Role::Admin, "a@example.com", exp, now);

        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.token_type, "access");
        assert_eq!(claims.exp, exp.timestamp());
    }

    #[test]
    fn test_claims_type_field_serializes_as_type() {
        let claims = RefreshTokenClaims::new(Uuid::new_v4(), Utc::now(), Utc::now());
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["type"], "refresh");
    }

    #[test]
    fn test_reset_ack_is_uniform() {
        assert_eq!(ResetRequestAck::new(), ResetRequestAck::default());
    }
}
