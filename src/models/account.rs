//! Account Model
//!
//! The persisted account record and its outward-facing projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role assigned to an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Instructor,
    Librarian,
    Admin,
}

impl Role {
    /// String form as persisted in the store
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Librarian => "librarian",
            Role::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "instructor" => Ok(Role::Instructor),
            "librarian" => Ok(Role::Librarian),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted account record with credentials and security state.
///
/// Owned by the credential store; services load it, apply a transition, and
/// write it back in one conditional update. Never serialized to callers,
/// that is what [`AccountSummary`] is for.
///
/// Field invariants: `reset_token` and `reset_expiry` are both present or
/// both absent; `email_verification_token` is cleared exactly when
/// `email_verified` flips to true; `lock_until` is only set while
/// `login_attempts` has reached the configured threshold.
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique identifier
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address, unique and normalized to lowercase
    pub email: String,

    /// bcrypt password hash, never empty after creation
    pub password_hash: String,

    /// Assigned role
    pub role: Role,

    /// Whether the email address has been verified
    pub email_verified: bool,

    /// Outstanding email-verification token, if any
    pub email_verification_token: Option<String>,

    /// Outstanding password-reset token, if any
    pub reset_token: Option<String>,

    /// Expiry of the outstanding reset token
    pub reset_expiry: Option<DateTime<Utc>>,

    /// Consecutive failed login attempts
    pub login_attempts: u32,

    /// End of the active lockout window, if locked
    pub lock_until: Option<DateTime<Utc>>,

    /// Time of the last successful login
    pub last_login: Option<DateTime<Utc>>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,

    /// Optimistic-concurrency stamp, bumped by the store on every update
    pub version: i64,
}

impl Account {
    /// Build a fresh, unverified account ready for its first persist.
    ///
    /// The password must already be hashed; the record never holds plaintext.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: String,
        role: Role,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash,
            role,
            email_verified: false,
            email_verification_token: None,
            reset_token: None,
            reset_expiry: None,
            login_attempts: 0,
            lock_until: None,
            last_login: None,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }
}

/// Account projection for API responses, without the password hash
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountSummary {
    /// Unique identifier
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Assigned role
    pub role: Role,

    /// Whether the email address has been verified
    pub email_verified: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role,
            email_verified: account.email_verified,
            created_at: account.created_at,
        }
    }
}

impl From<Account> for AccountSummary {
    fn from(account: Account) -> Self {
        (&account).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_defaults() {
        let now = Utc::now();
        let account = Account::new(
            "Alice",
            "alice@example.com",
            "hashed".to_string(),
            Role::Student,
            now,
        );

        assert!(!account.email_verified);
        assert_eq!(account.login_attempts, 0);
        assert!(account.lock_until.is_none());
        assert!(account.reset_token.is_none());
        assert!(account.reset_expiry.is_none());
        assert_eq!(account.created_at, now);
        assert_eq!(account.version, 0);
    }

    #[test]
    fn test_summary_strips_password_hash() {
        let account = Account::new(
            "Alice",
            "alice@example.com",
            "hashed".to_string(),
            Role::Instructor,
            Utc::now(),
        );
        let summary: AccountSummary = (&account).into();

        assert_eq!(summary.id, account.id);
        assert_eq!(summary.email, "alice@example.com");
        assert_eq!(summary.role, Role::Instructor);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("hashed"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Student, Role::Instructor, Role::Librarian, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"librarian\"").unwrap();
        assert_eq!(role, Role::Librarian);
    }
}
