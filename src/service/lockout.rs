//! Login Attempt Guard
//!
//! Per-account brute-force lockout state machine, expressed as pure
//! functions over `(state, event, now)` so every transition is unit-testable
//! without a store or a real clock. The orchestrator projects the state out
//! of an account record, applies a transition, and writes it back in one
//! conditional update.

use chrono::{DateTime, Duration, Utc};

use crate::models::Account;

/// Lockout state projected from an account record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// Accepting attempts; `attempts` consecutive failures so far
    Unlocked { attempts: u32 },

    /// Rejecting logins until `until`; `attempts` is the count that
    /// triggered the lock, kept so the persisted record stays consistent
    Locked { attempts: u32, until: DateTime<Utc> },
}

impl LockState {
    /// Project the lockout state out of an account record
    pub fn of(account: &Account) -> Self {
        match account.lock_until {
            Some(until) => LockState::Locked {
                attempts: account.login_attempts,
                until,
            },
            None => LockState::Unlocked {
                attempts: account.login_attempts,
            },
        }
    }

    /// Write this state back onto an account record
    pub fn apply_to(self, account: &mut Account) {
        match self {
            LockState::Unlocked { attempts } => {
                account.login_attempts = attempts;
                account.lock_until = None;
            }
            LockState::Locked { attempts, until } => {
                account.login_attempts = attempts;
                account.lock_until = Some(until);
            }
        }
    }
}

/// Outcome of the credential check being fed into the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginEvent {
    /// Password verified successfully
    Succeeded,

    /// Password verification failed
    Failed,
}

/// Lockout policy: how many failures are tolerated and for how long the
/// account locks once the threshold is reached
#[derive(Debug, Clone, Copy)]
pub struct LoginAttemptGuard {
    max_attempts: u32,
    lockout_duration: Duration,
}

impl LoginAttemptGuard {
    /// Create a guard with the given threshold and lockout duration
    pub fn new(max_attempts: u32, lockout_duration: Duration) -> Self {
        Self {
            max_attempts,
            lockout_duration,
        }
    }

    /// Return the unlock time if the state holds an active lock at `now`.
    ///
    /// Evaluated before the password is checked; an actively locked account
    /// rejects even correct credentials.
    pub fn active_lock(&self, state: LockState, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match state {
            LockState::Locked { until, .. } if now < until => Some(until),
            _ => None,
        }
    }

    /// Apply a login outcome to the current state.
    ///
    /// Transitions:
    /// - success anywhere (no active lock) resets to `Unlocked(0)`
    /// - failure after a lock has expired counts fresh: `Unlocked(1)`
    /// - failure at `Unlocked(n)` locks when `n + 1` reaches the threshold,
    ///   otherwise increments the counter
    /// - an active lock is left untouched; callers reject via
    ///   [`active_lock`](Self::active_lock) before applying events
    pub fn apply(&self, state: LockState, event: LoginEvent, now: DateTime<Utc>) -> LockState {
        if self.active_lock(state, now).is_some() {
            return state;
        }

        match event {
            LoginEvent::Succeeded => LockState::Unlocked { attempts: 0 },
            LoginEvent::Failed => match state {
                // Expired lock: the stale count is discarded
                LockState::Locked { .. } => LockState::Unlocked { attempts: 1 },
                LockState::Unlocked { attempts } => {
                    let attempts = attempts + 1;
                    if attempts >= self.max_attempts {
                        LockState::Locked {
                            attempts,
                            until: now + self.lockout_duration,
                        }
                    } else {
                        LockState::Unlocked { attempts }
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn guard() -> LoginAttemptGuard {
        LoginAttemptGuard::new(5, Duration::minutes(15))
    }

    #[test]
    fn test_failures_count_up_to_threshold() {
        let guard = guard();
        let now = Utc::now();

        let mut state = LockState::Unlocked { attempts: 0 };
        for expected in 1..5 {
            state = guard.apply(state, LoginEvent::Failed, now);
            if expected < 5 {
                assert_eq!(state, LockState::Unlocked { attempts: expected });
            }
        }

        // Fifth failure locks
        state = guard.apply(state, LoginEvent::Failed, now);
        assert_eq!(
            state,
            LockState::Locked {
                attempts: 5,
                until: now + Duration::minutes(15)
            }
        );
    }

    #[test]
    fn test_active_lock_rejects_until_expiry() {
        let guard = guard();
        let now = Utc::now();
        let until = now + Duration::minutes(15);
        let state = LockState::Locked { attempts: 5, until };

        assert_eq!(guard.active_lock(state, now), Some(until));
        assert_eq!(
            guard.active_lock(state, until - Duration::seconds(1)),
            Some(until)
        );
        // Boundary: the lock is gone exactly at `until`
        assert_eq!(guard.active_lock(state, until), None);
    }

    #[test]
    fn test_failure_after_expired_lock_counts_fresh() {
        let guard = guard();
        let now = Utc::now();
        let state = LockState::Locked {
            attempts: 5,
            until: now - Duration::seconds(1),
        };

        // Counter restarts at 1, not at the stale 5
        assert_eq!(
            guard.apply(state, LoginEvent::Failed, now),
            LockState::Unlocked { attempts: 1 }
        );
    }

    #[test]
    fn test_success_resets_counter() {
        let guard = guard();
        let now = Utc::now();

        assert_eq!(
            guard.apply(LockState::Unlocked { attempts: 4 }, LoginEvent::Succeeded, now),
            LockState::Unlocked { attempts: 0 }
        );

        // Success after an expired lock also resets
        let expired = LockState::Locked {
            attempts: 5,
            until: now - Duration::minutes(1),
        };
        assert_eq!(
            guard.apply(expired, LoginEvent::Succeeded, now),
            LockState::Unlocked { attempts: 0 }
        );
    }

    #[test]
    fn test_active_lock_state_is_left_untouched() {
        let guard = guard();
        let now = Utc::now();
        let state = LockState::Locked {
            attempts: 5,
            until: now + Duration::minutes(10),
        };

        assert_eq!(guard.apply(state, LoginEvent::Failed, now), state);
        assert_eq!(guard.apply(state, LoginEvent::Succeeded, now), state);
    }

    #[test]
    fn test_state_projection_round_trip() {
        let now = Utc::now();
        let mut account = Account::new(
            "Alice",
            "alice@example.com",
            "hash".to_string(),
            Role::Student,
            now,
        );

        assert_eq!(LockState::of(&account), LockState::Unlocked { attempts: 0 });

        let until = now + Duration::minutes(15);
        LockState::Locked { attempts: 5, until }.apply_to(&mut account);
        assert_eq!(account.login_attempts, 5);
        assert_eq!(account.lock_until, Some(until));
        assert_eq!(
            LockState::of(&account),
            LockState::Locked { attempts: 5, until }
        );

        LockState::Unlocked { attempts: 0 }.apply_to(&mut account);
        assert_eq!(account.login_attempts, 0);
        assert!(account.lock_until.is_none());
    }
}
