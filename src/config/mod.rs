//! Configuration Module
//!
//! Centralized configuration for the authentication core: token signing and
//! lifetimes, password policy, lockout thresholds, and reset-token expiry.

use chrono::Duration;
use thiserror::Error;

use crate::utils::security::DEFAULT_BCRYPT_COST;

/// Environment variable helpers
pub mod env {
    use std::env;

    /// Get environment variable as string with default
    pub fn get_string(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }

    /// Get environment variable as boolean with default
    pub fn get_bool(key: &str, default: bool) -> bool {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as u32 with default
    pub fn get_u32(key: &str, default: u32) -> u32 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as u64 with default
    pub fn get_u64(key: &str, default: u64) -> u64 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as i64 with default
    pub fn get_i64(key: &str, default: i64) -> i64 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Check if environment variable is set
    pub fn is_set(key: &str) -> bool {
        env::var(key).is_ok()
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required environment variable was not set
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
}

/// Password strength requirements enforced at registration and reset
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// Minimum password length in characters
    pub min_length: usize,

    /// Require at least one ASCII uppercase letter
    pub require_uppercase: bool,

    /// Require at least one ASCII digit
    pub require_numbers: bool,

    /// Require at least one non-alphanumeric character
    pub require_special: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_uppercase: true,
            require_numbers: true,
            require_special: true,
        }
    }
}

impl PasswordPolicy {
    /// Check a candidate password against this policy
    pub fn validate(&self, candidate: &str) -> Result<(), String> {
        if candidate.chars().count() < self.min_length {
            return Err(format!(
                "Password must be at least {} characters long",
                self.min_length
            ));
        }
        if self.require_uppercase && !candidate.chars().any(|c| c.is_ascii_uppercase()) {
            return Err("Password must contain an uppercase letter".to_string());
        }
        if self.require_numbers && !candidate.chars().any(|c| c.is_ascii_digit()) {
            return Err("Password must contain a number".to_string());
        }
        if self.require_special && candidate.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err("Password must contain a special character".to_string());
        }
        Ok(())
    }
}

/// Configuration consumed by the authentication core.
///
/// Defaults mirror the production values: 15-minute access tokens, 7-day
/// refresh tokens, 5 failed logins before a 15-minute lockout, 1-hour reset
/// tokens.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared secret for signing access and refresh tokens
    pub jwt_secret: String,

    /// Access token lifetime
    pub access_token_ttl: Duration,

    /// Refresh token lifetime
    pub refresh_token_ttl: Duration,

    /// Password strength requirements
    pub password_policy: PasswordPolicy,

    /// Failed logins tolerated before the account locks
    pub max_login_attempts: u32,

    /// How long a lockout lasts once triggered
    pub lockout_duration: Duration,

    /// Password-reset token lifetime
    pub reset_token_ttl: Duration,

    /// bcrypt cost factor for password hashing
    pub bcrypt_cost: u32,

    /// Upper bound on any single store operation
    pub store_timeout: std::time::Duration,
}

impl AuthConfig {
    /// Create a configuration with production defaults and the given secret
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            access_token_ttl: Duration::minutes(15),
            refresh_token_ttl: Duration::days(7),
            password_policy: PasswordPolicy::default(),
            max_login_attempts: 5,
            lockout_duration: Duration::minutes(15),
            reset_token_ttl: Duration::hours(1),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            store_timeout: std::time::Duration::from_secs(5),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `JWT_SECRET` is required; everything else falls back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !env::is_set("JWT_SECRET") {
            return Err(ConfigError::MissingVar("JWT_SECRET"));
        }

        let mut config = Self::new(env::get_string("JWT_SECRET", ""));
        config.access_token_ttl =
            Duration::minutes(env::get_i64("ACCESS_TOKEN_TTL_MINUTES", 15));
        config.refresh_token_ttl = Duration::days(env::get_i64("REFRESH_TOKEN_TTL_DAYS", 7));
        config.max_login_attempts = env::get_u32("MAX_LOGIN_ATTEMPTS", 5);
        config.lockout_duration =
            Duration::minutes(env::get_i64("LOCKOUT_DURATION_MINUTES", 15));
        config.reset_token_ttl = Duration::minutes(env::get_i64("RESET_TOKEN_TTL_MINUTES", 60));
        config.bcrypt_cost = env::get_u32("BCRYPT_COST", DEFAULT_BCRYPT_COST);
        config.store_timeout =
            std::time::Duration::from_secs(env::get_u64("STORE_TIMEOUT_SECONDS", 5));
        config.password_policy.min_length =
            env::get_u64("PASSWORD_MIN_LENGTH", 8) as usize;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = AuthConfig::new("secret");
        assert_eq!(config.access_token_ttl, Duration::minutes(15));
        assert_eq!(config.refresh_token_ttl, Duration::days(7));
        assert_eq!(config.max_login_attempts, 5);
        assert_eq!(config.lockout_duration, Duration::minutes(15));
        assert_eq!(config.reset_token_ttl, Duration::hours(1));
    }

    #[test]
    fn test_password_policy_accepts_strong_password() {
        let policy = PasswordPolicy::default();
        assert!(policy.validate("Str0ng!Pass").is_ok());
    }

    #[test]
    fn test_password_policy_rejects_weak_passwords() {
        let policy = PasswordPolicy::default();

        assert!(policy.validate("Sh0rt!").is_err()); // too short
        assert!(policy.validate("n0upper!case").is_err()); // no uppercase
        assert!(policy.validate("NoNumbers!").is_err()); // no digit
        assert!(policy.validate("N0specials").is_err()); // no special char
    }

    #[test]
    fn test_password_policy_relaxed() {
        let policy = PasswordPolicy {
            min_length: 4,
            require_uppercase: false,
            require_numbers: false,
            require_special: false,
        };
        assert!(policy.validate("abcd").is_ok());
        assert!(policy.validate("abc").is_err());
    }
}
