//! Request Models
//!
//! Typed inputs for the authentication operations, with structural
//! validation. Password strength is checked separately against the
//! configured [`PasswordPolicy`](crate::config::PasswordPolicy).

use serde::Deserialize;
use validator::Validate;

use crate::models::account::Role;

/// Input for account registration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Email address; normalized before storage
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    /// Plaintext password, checked against the configured policy
    #[validate(length(min = 1, max = 128, message = "Password is required"))]
    pub password: String,

    /// Requested role, defaults to student
    pub role: Option<Role>,
}

/// Input for credential login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    /// Plaintext password
    #[validate(length(min = 1, max = 128, message = "Password is required"))]
    pub password: String,
}

/// Input for exchanging a refresh token for a fresh token pair
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    /// The refresh token to verify
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Input for consuming a password-reset token
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    /// The single-use reset token
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub token: String,

    /// Replacement password, checked against the configured policy
    #[validate(length(min = 1, max = 128, message = "Password is required"))]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let request = RegisterRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "Str0ng!Pass".to_string(),
            role: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let request = RegisterRequest {
            name: "Alice".to_string(),
            email: "not-an-email".to_string(),
            password: "Str0ng!Pass".to_string(),
            role: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_login_request_rejects_empty_password() {
        let request = LoginRequest {
            email: "alice@example.com".to_string(),
            password: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_refresh_request_rejects_empty_token() {
        let request = RefreshTokenRequest {
            refresh_token: String::new(),
        };
        assert!(request.validate().is_err());
    }
}
