//! # Enrollment Status Machine
//!
//! | From | Allowed next states |
//! |------|---------------------|
//! | Draft | Submitted |
//! | Submitted | Approved, Denied |
//! | Approved | Expired |
//! | Denied | (terminal) |
//! | Expired | (terminal) |
//!
//! Approved -> Expired is driven by an external scheduler through
//! [`crate::EntityStore::expire_due`]; the store never expires anything
//! on its own.

use crate::{EnrollmentStatus, StoreError};

impl EnrollmentStatus {
    /// States reachable in one step from this one.
    #[must_use]
    pub const fn allowed_next(self) -> &'static [EnrollmentStatus] {
        match self {
            EnrollmentStatus::Draft => &[EnrollmentStatus::Submitted],
            EnrollmentStatus::Submitted => &[EnrollmentStatus::Approved, EnrollmentStatus::Denied],
            EnrollmentStatus::Approved => &[EnrollmentStatus::Expired],
            EnrollmentStatus::Denied | EnrollmentStatus::Expired => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: EnrollmentStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    /// Denied and Expired accept no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }

    /// Check a status change. Keeping the same status is not a transition.
    pub fn check_transition(self, next: EnrollmentStatus) -> Result<(), StoreError> {
        if self == next || self.can_transition_to(next) {
            Ok(())
        } else {
            Err(StoreError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
