//! Token Issuer
//!
//! Stateless signing and verification of access and refresh tokens. Every
//! token carries its own expiry; there is no server-side session or
//! revocation list, invalidation is purely TTL-based.
//!
//! Expiry is checked against a caller-supplied `now` rather than the system
//! clock, so token lifetimes are testable without waiting.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AccessTokenClaims, Account, RefreshTokenClaims, Role, TokenPair};

/// Token verification failures
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    /// Token is structurally valid and correctly signed, but past its expiry
    #[error("Token has expired")]
    Expired,

    /// Signature, structure, or token-type check failed
    #[error("Invalid token")]
    Invalid,
}

/// Stateless issuer and verifier for access/refresh token pairs
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    /// Create an issuer over a shared HMAC secret
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Access token lifetime
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Sign a short-lived access token carrying identity, role, and email
    pub fn issue_access(
        &self,
        account_id: Uuid,
        role: Role,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = AccessTokenClaims::new(account_id, role, email, now + self.access_ttl, now);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Sign a long-lived refresh token carrying only the account id
    pub fn issue_refresh(
        &self,
        account_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = RefreshTokenClaims::new(account_id, now + self.refresh_ttl, now);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Issue a fresh access/refresh pair for an account
    pub fn issue_pair(
        &self,
        account: &Account,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        let access = self.issue_access(account.id, account.role, &account.email, now)?;
        let refresh = self.issue_refresh(account.id, now)?;
        Ok(TokenPair::new(access, refresh, self.access_ttl.num_seconds()))
    }

    /// Verify an access token and return its claims
    pub fn verify_access(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessTokenClaims, TokenError> {
        let claims: AccessTokenClaims = self.decode_claims(token)?;
        if claims.token_type != "access" {
            return Err(TokenError::Invalid);
        }
        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    /// Verify a refresh token and return its claims
    pub fn verify_refresh(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<RefreshTokenClaims, TokenError> {
        let claims: RefreshTokenClaims = self.decode_claims(token)?;
        if claims.token_type != "refresh" {
            return Err(TokenError::Invalid);
        }
        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    fn decode_claims<C: DeserializeOwned>(&self, token: &str) -> Result<C, TokenError> {
        // Expiry is compared against the injected clock, not the system time
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<C>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret", Duration::minutes(15), Duration::days(7))
    }

    #[test]
    fn test_access_token_round_trip() {
        let issuer = issuer();
        let id = Uuid::new_v4();
        let now = Utc::now();

        let token = issuer
            .issue_access(id, Role::Instructor, "t@example.com", now)
            .unwrap();
        let claims = issuer.verify_access(&token, now).unwrap();

        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.role, Role::Instructor);
        assert_eq!(claims.email, "t@example.com");
        assert_eq!(claims.exp, (now + Duration::minutes(15)).timestamp());
        assert_eq!(claims.iat, now.timestamp());
    }

    #[test]
    fn test_access_token_expires() {
        let issuer = issuer();
        let now = Utc::now();
        let token = issuer
            .issue_access(Uuid::new_v4(), Role::Student, "t@example.com", now)
            .unwrap();

        // Still valid one second before expiry
        let just_before = now + Duration::minutes(15) - Duration::seconds(1);
        assert!(issuer.verify_access(&token, just_before).is_ok());

        // Expired exactly at the boundary
        let at_expiry = now + Duration::minutes(15);
        assert_eq!(
            issuer.verify_access(&token, at_expiry).unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn test_refresh_token_round_trip_and_expiry() {
        let issuer = issuer();
        let id = Uuid::new_v4();
        let now = Utc::now();
        let token = issuer.issue_refresh(id, now).unwrap();

        let claims = issuer.verify_refresh(&token, now).unwrap();
        assert_eq!(claims.sub, id.to_string());

        let after_ttl = now + Duration::days(7);
        assert_eq!(
            issuer.verify_refresh(&token, after_ttl).unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let issuer = issuer();
        let now = Utc::now();
        let token = issuer
            .issue_access(Uuid::new_v4(), Role::Student, "t@example.com", now)
            .unwrap();

        let mut tampered = token.clone();
        tampered.push('x');
        assert_eq!(
            issuer.verify_access(&tampered, now).unwrap_err(),
            TokenError::Invalid
        );
        assert_eq!(
            issuer.verify_access("garbage", now).unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let issuer = issuer();
        let other = TokenIssuer::new("other-secret", Duration::minutes(15), Duration::days(7));
        let now = Utc::now();

        let token = issuer
            .issue_access(Uuid::new_v4(), Role::Student, "t@example.com", now)
            .unwrap();
        assert_eq!(
            other.verify_access(&token, now).unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn test_token_types_do_not_cross() {
        let issuer = issuer();
        let id = Uuid::new_v4();
        let now = Utc::now();

        let access = issuer
            .issue_access(id, Role::Student, "t@example.com", now)
            .unwrap();
        let refresh = issuer.issue_refresh(id, now).unwrap();

        // An access token is not a refresh token and vice versa
        assert_eq!(
            issuer.verify_refresh(&access, now).unwrap_err(),
            TokenError::Invalid
        );
        assert_eq!(
            issuer.verify_access(&refresh, now).unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn test_issue_pair() {
        let issuer = issuer();
        let now = Utc::now();
        let account = Account::new(
            "Alice",
            "alice@example.com",
            "hash".to_string(),
            Role::Student,
            now,
        );

        let pair = issuer.issue_pair(&account, now).unwrap();
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, Duration::minutes(15).num_seconds());
        assert!(issuer.verify_access(&pair.access_token, now).is_ok());
        assert!(issuer.verify_refresh(&pair.refresh_token, now).is_ok());
    }
}
