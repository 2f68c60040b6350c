//! Data Models Module
//!
//! Account records, token claims, and request/response structures used
//! throughout the account service.

pub mod account;
pub mod auth;
pub mod requests;

// Re-export commonly used types
pub use account::{Account, AccountSummary, Role};
pub use auth::{
    AccessTokenClaims, AuthResponse, RefreshTokenClaims, ResetRequestAck, TokenPair,
};
pub use requests::{LoginRequest, RefreshTokenRequest, RegisterRequest, ResetPasswordRequest};
