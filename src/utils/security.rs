//! Security Utilities
//!
//! Password hashing and secure random token generation.

use bcrypt::{hash, verify, DEFAULT_COST};
use rand::{distributions::Alphanumeric, Rng};

/// Default bcrypt cost for password hashing
pub const DEFAULT_BCRYPT_COST: u32 = DEFAULT_COST;

/// Length of reset and verification tokens in characters
pub const SECURITY_TOKEN_LENGTH: usize = 64;

/// Generate a cryptographically secure random string
pub fn generate_secure_token(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// One-way password hashing with a configurable bcrypt cost factor.
///
/// Hashing is deliberately slow; the cost is the security property. Results
/// are never cached and verification always runs the full bcrypt comparison.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher with the given bcrypt cost factor
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password
    pub fn hash(&self, plaintext: &str) -> Result<String, bcrypt::BcryptError> {
        hash(plaintext, self.cost)
    }

    /// Verify a plaintext password against a stored hash.
    ///
    /// A malformed or truncated hash verifies as `false` rather than
    /// surfacing an error, so a corrupted record behaves like a wrong
    /// password instead of leaking storage details.
    pub fn verify(&self, plaintext: &str, password_hash: &str) -> bool {
        verify(plaintext, password_hash).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}
