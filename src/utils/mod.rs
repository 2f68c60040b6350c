//! Utilities Module
//!
//! Shared utilities for error handling, security, validation, and time,
//! used throughout the account service.

pub mod clock;
pub mod error;
pub mod security;
pub mod validation;

// Re-export commonly used utilities
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AuthError, AuthResult};
pub use security::*;
pub use validation::*;
