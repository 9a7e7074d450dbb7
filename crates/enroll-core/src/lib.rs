//! # enroll-core
//!
//! In-memory entity store for healthcare provider credentialing.
//!
//! The store owns four collections (providers, payers, practice locations
//! and enrollments) and guarantees:
//! - Referential integrity: every enrollment points at an existing provider
//!   and payer, every location lists only existing providers
//! - Cascading deletes: removing a provider or payer removes or detaches
//!   everything that references it, atomically
//! - O(matches) reference queries through incrementally maintained indexes
//! - An enforced enrollment status machine
//! - Change notifications after every committed mutation
//!
//! ## Architectural Constraints
//!
//! - Pure and synchronous: no async, no network, no file I/O
//! - Deterministic: `BTreeMap` collections, insertion-ordered iteration
//! - Never panics; every failure is a [`StoreError`]
//!
//! Persistence, authentication and scheduling are collaborators outside this
//! crate; see [`formats`], [`Session`] and [`EntityStore::expire_due`].

// =============================================================================
// MODULES
// =============================================================================

pub mod events;
pub mod formats;
pub mod index;
pub mod lifecycle;
pub mod primitives;
pub mod query;
pub mod session;
pub mod shared;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    CurrentUser, Enrollment, EnrollmentId, EnrollmentPatch, EnrollmentStatus, EntityKind,
    FieldValue, Location, LocationId, LocationPatch, NewEnrollment, NewLocation, NewPayer,
    NewProvider, Payer, PayerId, PayerPatch, Provider, ProviderId, ProviderPatch, ProviderStatus,
    Record, RecordId, Role, StoreError,
};

// =============================================================================
// RE-EXPORTS: Store Engine
// =============================================================================

pub use events::{ChangeEvent, Listener, Notifier, Operation, SubscriptionId};
pub use index::Indexes;
pub use lifecycle::StoreMetrics;
pub use query::{EnrollmentQuery, Filter, Listing, ListingIter, Predicate, SortKey};
pub use session::Session;
pub use shared::SharedStore;
pub use store::{EntityStore, IdSequence, Snapshot};
pub use validation::Validator;

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

#[cfg(feature = "crypto-hash")]
pub use formats::snapshot_crypto_hash;
pub use formats::{
    SnapshotHeader, snapshot_checksum, snapshot_from_bytes, snapshot_to_bytes, store_from_bytes,
    store_to_bytes,
};
