//! Validation Utilities
//!
//! Input normalization and format checks shared across the service layer.

use regex::Regex;
use std::sync::OnceLock;

/// Validates email address format
pub fn validate_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    regex.is_match(email)
}

/// Normalizes an email address to lowercase and trims surrounding whitespace.
///
/// Every lookup and insert goes through this, which is what makes the unique
/// email index effectively case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
