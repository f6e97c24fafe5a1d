//! In-flight submit tracking.
//!
//! A login or signup for an email cannot start while another one for the
//! same email is still waiting on the commerce platform. The permit is
//! released when the handler drops it, whatever the outcome.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use emporium_core::Email;

/// Which form the submit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmitKind {
    Login,
    Signup,
}

impl fmt::Display for SubmitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => f.write_str("login"),
            Self::Signup => f.write_str("signup"),
        }
    }
}

type SubmitKey = (SubmitKind, String);

/// Registry of submits currently in flight.
#[derive(Clone, Default)]
pub struct SubmitGuard {
    pending: Arc<Mutex<HashSet<SubmitKey>>>,
}

impl SubmitGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for (`kind`, `email`).
    ///
    /// Returns `None` while another submit holds the same slot. Emails are
    /// compared case-insensitively.
    #[must_use]
    pub fn try_acquire(&self, kind: SubmitKind, email: &Email) -> Option<SubmitPermit> {
        let key = (kind, email.normalized());
        let inserted = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone());

        inserted.then(|| SubmitPermit {
            pending: Arc::clone(&self.pending),
            key,
        })
    }

    /// Number of submits currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Held for the duration of one submit.
#[must_use = "the slot is released as soon as the permit is dropped"]
pub struct SubmitPermit {
    pending: Arc<Mutex<HashSet<SubmitKey>>>,
    key: SubmitKey,
}

impl fmt::Debug for SubmitPermit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmitPermit")
            .field("kind", &self.key.0)
            .finish_non_exhaustive()
    }
}

impl Drop for SubmitPermit {
    fn drop(&mut self) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn email(raw: &str) -> Email {
        Email::parse(raw).unwrap()
    }

    #[test]
    fn test_second_submit_rejected_until_first_settles() {
        let guard = SubmitGuard::new();

        let permit = guard.try_acquire(SubmitKind::Login, &email("jane@example.com"));
        assert!(permit.is_some());
        assert!(
            guard
                .try_acquire(SubmitKind::Login, &email("Jane@Example.com"))
                .is_none()
        );

        drop(permit);

        assert!(
            guard
                .try_acquire(SubmitKind::Login, &email("jane@example.com"))
                .is_some()
        );
    }

    #[test]
    fn test_slots_are_per_kind_and_email() {
        let guard = SubmitGuard::new();

        let _login = guard
            .try_acquire(SubmitKind::Login, &email("jane@example.com"))
            .unwrap();
        let _signup = guard
            .try_acquire(SubmitKind::Signup, &email("jane@example.com"))
            .unwrap();
        let _other = guard
            .try_acquire(SubmitKind::Login, &email("sam@example.com"))
            .unwrap();

        assert_eq!(guard.in_flight(), 3);
    }

    #[test]
    fn test_clones_share_registry() {
        let guard = SubmitGuard::new();
        let clone = guard.clone();

        let _permit = guard
            .try_acquire(SubmitKind::Signup, &email("jane@example.com"))
            .unwrap();

        assert!(
            clone
                .try_acquire(SubmitKind::Signup, &email("jane@example.com"))
                .is_none()
        );
    }
}
