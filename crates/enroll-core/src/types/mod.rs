//! # Core Type Definitions
//!
//! This module contains all core types for the credentialing store:
//! - Record identifiers (`ProviderId`, `PayerId`, `LocationId`, `EnrollmentId`)
//! - Entity records, creation drafts and update patches (see [`records`])
//! - Status enums (`ProviderStatus`, `EnrollmentStatus`)
//! - Filterable field values (`FieldValue`) and the `Record` trait
//! - The authenticated identity handed over by the auth layer (`CurrentUser`)
//! - Error types (`StoreError`)
//!
//! ## Determinism Guarantees
//!
//! Identifiers are plain `u64` counters and implement `Ord`, so every
//! collection keyed by them iterates in insertion order.

mod records;

pub use records::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// ENTITY KINDS
// =============================================================================

/// The four collections owned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Provider,
    Payer,
    Location,
    Enrollment,
}

impl EntityKind {
    /// Display prefix used for identifiers of this kind (`P1`, `Y1`, ...).
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            EntityKind::Provider => 'P',
            EntityKind::Payer => 'Y',
            EntityKind::Location => 'L',
            EntityKind::Enrollment => 'E',
        }
    }

    /// Lowercase name, as used on the command line and in JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EntityKind::Provider => "provider",
            EntityKind::Payer => "payer",
            EntityKind::Location => "location",
            EntityKind::Enrollment => "enrollment",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Provider => "Provider",
            EntityKind::Payer => "Payer",
            EntityKind::Location => "Location",
            EntityKind::Enrollment => "Enrollment",
        };
        f.write_str(name)
    }
}

// =============================================================================
// RECORD IDENTIFIERS
// =============================================================================

/// Common behavior of the per-collection identifier newtypes.
pub trait RecordId: Copy + Ord + fmt::Debug + fmt::Display {
    /// The collection this identifier belongs to.
    const KIND: EntityKind;

    /// The raw counter value.
    fn raw(self) -> u64;
}

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl RecordId for $name {
            const KIND: EntityKind = $kind;

            fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", Self::KIND.prefix(), self.0)
            }
        }

        impl FromStr for $name {
            type Err = StoreError;

            /// Accepts both the prefixed form (`P12`, `p12`) and a bare number.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                let digits = trimmed
                    .strip_prefix(Self::KIND.prefix())
                    .or_else(|| trimmed.strip_prefix(Self::KIND.prefix().to_ascii_lowercase()))
                    .unwrap_or(trimmed);
                digits.parse::<u64>().map(Self).map_err(|_| {
                    StoreError::validation("id", format!("'{}' is not a {} id", s, Self::KIND.as_str()))
                })
            }
        }
    };
}

record_id!(
    /// Identifier of a [`Provider`].
    ProviderId,
    EntityKind::Provider
);
record_id!(
    /// Identifier of a [`Payer`].
    PayerId,
    EntityKind::Payer
);
record_id!(
    /// Identifier of a [`Location`].
    LocationId,
    EntityKind::Location
);
record_id!(
    /// Identifier of an [`Enrollment`].
    EnrollmentId,
    EntityKind::Enrollment
);

// =============================================================================
// STATUS ENUMS
// =============================================================================

/// Credentialing status of a provider.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum ProviderStatus {
    #[default]
    Pending,
    Active,
    Suspended,
    Terminated,
}

impl ProviderStatus {
    pub const ALL: [ProviderStatus; 4] = [
        ProviderStatus::Pending,
        ProviderStatus::Active,
        ProviderStatus::Suspended,
        ProviderStatus::Terminated,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ProviderStatus::Pending => "Pending",
            ProviderStatus::Active => "Active",
            ProviderStatus::Suspended => "Suspended",
            ProviderStatus::Terminated => "Terminated",
        }
    }
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StoreError::validation("status", format!("unknown provider status '{}'", s)))
    }
}

/// Status of a provider's enrollment with a payer.
///
/// Allowed transitions live in [`crate::lifecycle`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum EnrollmentStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
    Denied,
    Expired,
}

impl EnrollmentStatus {
    pub const ALL: [EnrollmentStatus; 5] = [
        EnrollmentStatus::Draft,
        EnrollmentStatus::Submitted,
        EnrollmentStatus::Approved,
        EnrollmentStatus::Denied,
        EnrollmentStatus::Expired,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EnrollmentStatus::Draft => "Draft",
            EnrollmentStatus::Submitted => "Submitted",
            EnrollmentStatus::Approved => "Approved",
            EnrollmentStatus::Denied => "Denied",
            EnrollmentStatus::Expired => "Expired",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                StoreError::validation("status", format!("unknown enrollment status '{}'", s))
            })
    }
}

// =============================================================================
// FIELD VALUES
// =============================================================================

/// A single field value as seen by list filters and sort keys.
///
/// Status fields are exposed as `Text` holding the status name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Id(u64),
    Date(NaiveDate),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Compare two values of the same variant. Values of different
    /// variants are incomparable.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => Some(a.cmp(b)),
            (FieldValue::Id(a), FieldValue::Id(b)) => Some(a.cmp(b)),
            (FieldValue::Date(a), FieldValue::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Id(id) => write!(f, "{}", id),
            FieldValue::Date(d) => write!(f, "{}", d),
        }
    }
}

/// A record stored in one of the store's collections.
pub trait Record {
    type Id: RecordId;

    /// Names accepted by [`Record::field`], in display order.
    const FIELDS: &'static [&'static str];

    fn id(&self) -> Self::Id;

    /// Value of the named field, or `None` when the field is unset
    /// or not one of [`Record::FIELDS`].
    fn field(&self, name: &str) -> Option<FieldValue>;
}

// =============================================================================
// CURRENT USER
// =============================================================================

/// Role attached to the authenticated identity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Coordinator,
    Viewer,
}

impl FromStr for Role {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "coordinator" => Ok(Role::Coordinator),
            "viewer" => Ok(Role::Viewer),
            _ => Err(StoreError::validation("role", format!("unknown role '{}'", s))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "admin",
            Role::Coordinator => "coordinator",
            Role::Viewer => "viewer",
        };
        f.write_str(name)
    }
}

/// Identity supplied by the external authentication layer after login.
///
/// The store never checks credentials; it only records who is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub role: Role,
}

impl CurrentUser {
    #[must_use]
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the credentialing store.
///
/// - No silent failures
/// - A failed call never leaves a partial mutation behind
/// - The store never panics; `Integrity` marks a broken internal invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A field is missing, malformed or out of range.
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// The operation referenced an id absent from its collection.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: u64 },

    /// The enrollment status change is not allowed.
    #[error("Invalid enrollment transition: {from} -> {to}")]
    InvalidTransition {
        from: EnrollmentStatus,
        to: EnrollmentStatus,
    },

    /// An internal invariant was found broken (orphan reference, index drift).
    #[error("Integrity violation: {0}")]
    Integrity(String),

    /// A snapshot could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Another thread panicked while holding the store lock.
    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found<I: RecordId>(id: I) -> Self {
        Self::NotFound {
            kind: I::KIND,
            id: id.raw(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_with_prefix() {
        assert_eq!(ProviderId(1).to_string(), "P1");
        assert_eq!(PayerId(7).to_string(), "Y7");
        assert_eq!(LocationId(3).to_string(), "L3");
        assert_eq!(EnrollmentId(12).to_string(), "E12");
    }

    #[test]
    fn ids_parse_prefixed_and_bare() {
        assert_eq!("P4".parse::<ProviderId>(), Ok(ProviderId(4)));
        assert_eq!("p4".parse::<ProviderId>(), Ok(ProviderId(4)));
        assert_eq!("4".parse::<ProviderId>(), Ok(ProviderId(4)));
        assert!("Y4".parse::<ProviderId>().is_err());
        assert!("".parse::<EnrollmentId>().is_err());
    }

    #[test]
    fn statuses_parse_case_insensitively() {
        assert_eq!(
            "submitted".parse::<EnrollmentStatus>(),
            Ok(EnrollmentStatus::Submitted)
        );
        assert_eq!("ACTIVE".parse::<ProviderStatus>(), Ok(ProviderStatus::Active));
        assert!("archived".parse::<EnrollmentStatus>().is_err());
    }

    #[test]
    fn field_values_compare_within_variant_only() {
        let a = FieldValue::text("Alpha");
        let b = FieldValue::text("Beta");
        assert_eq!(a.compare(&b), Some(Ordering::Less));
        assert_eq!(a.compare(&FieldValue::Id(1)), None);
    }

    #[test]
    fn not_found_carries_kind() {
        let err = StoreError::not_found(PayerId(9));
        assert_eq!(
            err,
            StoreError::NotFound {
                kind: EntityKind::Payer,
                id: 9
            }
        );
        assert_eq!(err.to_string(), "Payer not found: 9");
    }

    #[test]
    fn role_roundtrip() {
        for role in [Role::Admin, Role::Coordinator, Role::Viewer] {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
    }
}
