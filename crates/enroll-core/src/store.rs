//! # Entity Store
//!
//! The single source of truth for providers, payers, locations and
//! enrollments.
//!
//! All collections use `BTreeMap` keyed by monotonic ids, so iteration
//! order is insertion order. Every mutation follows the same shape:
//!
//! 1. Build the candidate record and run every check against it.
//! 2. Commit primary data and secondary indexes together.
//! 3. Notify subscribers.
//!
//! Step 2 cannot fail, so an error never leaves a partial mutation behind,
//! and subscribers never observe a half-applied cascade.

use crate::events::{ChangeEvent, Notifier, SubscriptionId};
use crate::index::Indexes;
use crate::query::{EnrollmentQuery, Filter, Listing};
use crate::validation::Validator;
use crate::{
    Enrollment, EnrollmentId, EnrollmentPatch, EnrollmentStatus, Location, LocationId,
    LocationPatch, NewEnrollment, NewLocation, NewPayer, NewProvider, Payer, PayerId, PayerPatch,
    Provider, ProviderId, ProviderPatch, RecordId, StoreError,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

// =============================================================================
// ID SEQUENCE
// =============================================================================

/// Last id issued per collection. Ids are never reused, even after delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSequence {
    pub provider: u64,
    pub payer: u64,
    pub location: u64,
    pub enrollment: u64,
}

fn next_id(last: u64) -> Result<u64, StoreError> {
    last.checked_add(1)
        .ok_or_else(|| integrity("id space exhausted".to_string()))
}

fn integrity(message: String) -> StoreError {
    warn!(%message, "integrity violation");
    StoreError::Integrity(message)
}

// =============================================================================
// ENTITY STORE
// =============================================================================

/// In-memory store with referential integrity and secondary indexes.
#[derive(Debug, Default)]
pub struct EntityStore {
    providers: BTreeMap<ProviderId, Provider>,
    payers: BTreeMap<PayerId, Payer>,
    locations: BTreeMap<LocationId, Location>,
    enrollments: BTreeMap<EnrollmentId, Enrollment>,
    indexes: Indexes,
    sequence: IdSequence,
    notifier: Notifier,
}

impl EntityStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // NOTIFICATIONS
    // =========================================================================

    /// Register a callback invoked after each successful mutation.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&ChangeEvent) + Send + 'static,
    {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    fn emit(&mut self, events: Vec<ChangeEvent>) {
        if !events.is_empty() {
            self.notifier.notify(&events);
        }
    }

    // =========================================================================
    // PROVIDERS
    // =========================================================================

    pub fn create_provider(&mut self, draft: NewProvider) -> Result<ProviderId, StoreError> {
        let id = ProviderId(next_id(self.sequence.provider)?);
        let provider = draft.into_record(id);
        Validator::provider(&provider)?;

        self.sequence.provider = id.0;
        self.providers.insert(id, provider);
        debug!(provider = %id, "provider created");
        self.emit(vec![ChangeEvent::created(id)]);
        Ok(id)
    }

    pub fn provider(&self, id: ProviderId) -> Result<&Provider, StoreError> {
        self.providers
            .get(&id)
            .ok_or_else(|| StoreError::not_found(id))
    }

    pub fn update_provider(
        &mut self,
        id: ProviderId,
        patch: ProviderPatch,
    ) -> Result<Provider, StoreError> {
        let current = self.provider(id)?;
        let mut candidate = current.clone();
        patch.apply(&mut candidate);
        if candidate == *current {
            return Ok(candidate);
        }
        Validator::provider(&candidate)?;
        self.check_provider_dependents(id)?;

        self.providers.insert(id, candidate.clone());
        debug!(provider = %id, status = %candidate.status, "provider updated");
        self.emit(vec![ChangeEvent::updated(id)]);
        Ok(candidate)
    }

    /// Delete a provider, its enrollments, and its place on every location.
    pub fn delete_provider(&mut self, id: ProviderId) -> Result<Provider, StoreError> {
        let removed = self
            .providers
            .remove(&id)
            .ok_or_else(|| StoreError::not_found(id))?;

        let mut events = Vec::new();
        let dependents: Vec<EnrollmentId> = self
            .indexes
            .enrollments_for_provider(id)
            .into_iter()
            .flatten()
            .copied()
            .collect();
        for enrollment_id in dependents {
            if let Some(enrollment) = self.enrollments.remove(&enrollment_id) {
                self.indexes.remove_enrollment(&enrollment);
                events.push(ChangeEvent::deleted(enrollment_id));
            }
        }
        let cascaded_enrollments = events.len();

        for location_id in self.indexes.forget_provider_locations(id) {
            if let Some(location) = self.locations.get_mut(&location_id) {
                location.provider_ids.remove(&id);
                events.push(ChangeEvent::updated(location_id));
            }
        }

        debug!(
            provider = %id,
            enrollments = cascaded_enrollments,
            locations = events.len() - cascaded_enrollments,
            "provider deleted"
        );
        events.push(ChangeEvent::deleted(id));
        self.emit(events);
        Ok(removed)
    }

    pub fn list_providers(&self, filter: Filter) -> Result<Listing<'_, Provider>, StoreError> {
        Listing::new(&self.providers, filter)
    }

    /// All providers in insertion order.
    pub fn providers(&self) -> impl Iterator<Item = &Provider> {
        self.providers.values()
    }

    #[must_use]
    pub fn contains_provider(&self, id: ProviderId) -> bool {
        self.providers.contains_key(&id)
    }

    // =========================================================================
    // PAYERS
    // =========================================================================

    pub fn create_payer(&mut self, draft: NewPayer) -> Result<PayerId, StoreError> {
        let id = PayerId(next_id(self.sequence.payer)?);
        let payer = draft.into_record(id);
        Validator::payer(&payer)?;

        self.sequence.payer = id.0;
        self.payers.insert(id, payer);
        debug!(payer = %id, "payer created");
        self.emit(vec![ChangeEvent::created(id)]);
        Ok(id)
    }

    pub fn payer(&self, id: PayerId) -> Result<&Payer, StoreError> {
        self.payers.get(&id).ok_or_else(|| StoreError::not_found(id))
    }

    pub fn update_payer(&mut self, id: PayerId, patch: PayerPatch) -> Result<Payer, StoreError> {
        let current = self.payer(id)?;
        let mut candidate = current.clone();
        patch.apply(&mut candidate);
        if candidate == *current {
            return Ok(candidate);
        }
        Validator::payer(&candidate)?;
        self.check_payer_dependents(id)?;

        self.payers.insert(id, candidate.clone());
        debug!(payer = %id, "payer updated");
        self.emit(vec![ChangeEvent::updated(id)]);
        Ok(candidate)
    }

    /// Delete a payer and every enrollment with it.
    pub fn delete_payer(&mut self, id: PayerId) -> Result<Payer, StoreError> {
        let removed = self
            .payers
            .remove(&id)
            .ok_or_else(|| StoreError::not_found(id))?;

        let dependents: Vec<EnrollmentId> = self
            .indexes
            .enrollments_for_payer(id)
            .into_iter()
            .flatten()
            .copied()
            .collect();
        let mut events = Vec::with_capacity(dependents.len() + 1);
        for enrollment_id in dependents {
            if let Some(enrollment) = self.enrollments.remove(&enrollment_id) {
                self.indexes.remove_enrollment(&enrollment);
                events.push(ChangeEvent::deleted(enrollment_id));
            }
        }

        debug!(payer = %id, enrollments = events.len(), "payer deleted");
        events.push(ChangeEvent::deleted(id));
        self.emit(events);
        Ok(removed)
    }

    pub fn list_payers(&self, filter: Filter) -> Result<Listing<'_, Payer>, StoreError> {
        Listing::new(&self.payers, filter)
    }

    /// All payers in insertion order.
    pub fn payers(&self) -> impl Iterator<Item = &Payer> {
        self.payers.values()
    }

    #[must_use]
    pub fn contains_payer(&self, id: PayerId) -> bool {
        self.payers.contains_key(&id)
    }

    // =========================================================================
    // LOCATIONS
    // =========================================================================

    pub fn create_location(&mut self, draft: NewLocation) -> Result<LocationId, StoreError> {
        let id = LocationId(next_id(self.sequence.location)?);
        let location = draft.into_record(id);
        Validator::location(&location)?;
        self.check_location_providers(&location)?;

        self.sequence.location = id.0;
        self.indexes.insert_location(&location);
        self.locations.insert(id, location);
        debug!(location = %id, "location created");
        self.emit(vec![ChangeEvent::created(id)]);
        Ok(id)
    }

    pub fn location(&self, id: LocationId) -> Result<&Location, StoreError> {
        self.locations
            .get(&id)
            .ok_or_else(|| StoreError::not_found(id))
    }

    pub fn update_location(
        &mut self,
        id: LocationId,
        patch: LocationPatch,
    ) -> Result<Location, StoreError> {
        let current = self.location(id)?.clone();
        let mut candidate = current.clone();
        patch.apply(&mut candidate);
        if candidate == current {
            return Ok(candidate);
        }
        Validator::location(&candidate)?;
        self.check_location_providers(&candidate)?;

        self.indexes.remove_location(&current);
        self.indexes.insert_location(&candidate);
        self.locations.insert(id, candidate.clone());
        debug!(location = %id, "location updated");
        self.emit(vec![ChangeEvent::updated(id)]);
        Ok(candidate)
    }

    pub fn delete_location(&mut self, id: LocationId) -> Result<Location, StoreError> {
        let removed = self
            .locations
            .remove(&id)
            .ok_or_else(|| StoreError::not_found(id))?;
        self.indexes.remove_location(&removed);
        debug!(location = %id, "location deleted");
        self.emit(vec![ChangeEvent::deleted(id)]);
        Ok(removed)
    }

    pub fn list_locations(&self, filter: Filter) -> Result<Listing<'_, Location>, StoreError> {
        Listing::new(&self.locations, filter)
    }

    /// All locations in insertion order.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    /// Locations listing the provider, served from the provider index.
    pub fn locations_for_provider(&self, id: ProviderId) -> impl Iterator<Item = &Location> {
        self.indexes
            .locations_for_provider(id)
            .into_iter()
            .flatten()
            .filter_map(|location_id| self.locations.get(location_id))
    }

    fn check_location_providers(&self, location: &Location) -> Result<(), StoreError> {
        for provider in &location.provider_ids {
            self.provider(*provider)?;
        }
        Ok(())
    }

    // =========================================================================
    // ENROLLMENTS
    // =========================================================================

    /// Create an enrollment. New enrollments always start as `Draft`.
    pub fn create_enrollment(&mut self, draft: NewEnrollment) -> Result<EnrollmentId, StoreError> {
        if draft.status != EnrollmentStatus::Draft {
            return Err(StoreError::validation(
                "status",
                format!("new enrollments start as Draft, not {}", draft.status),
            ));
        }
        let id = EnrollmentId(next_id(self.sequence.enrollment)?);
        let enrollment = draft.into_record(id);
        Validator::enrollment(&enrollment)?;
        self.provider(enrollment.provider_id)?;
        self.payer(enrollment.payer_id)?;

        self.sequence.enrollment = id.0;
        self.indexes.insert_enrollment(&enrollment);
        debug!(
            enrollment = %id,
            provider = %enrollment.provider_id,
            payer = %enrollment.payer_id,
            "enrollment created"
        );
        self.enrollments.insert(id, enrollment);
        self.emit(vec![ChangeEvent::created(id)]);
        Ok(id)
    }

    pub fn enrollment(&self, id: EnrollmentId) -> Result<&Enrollment, StoreError> {
        self.enrollments
            .get(&id)
            .ok_or_else(|| StoreError::not_found(id))
    }

    /// Update an enrollment.
    ///
    /// Status changes must follow the enrollment status machine. A reassigned
    /// provider or payer must exist. A patch that changes nothing commits
    /// nothing and notifies nobody.
    pub fn update_enrollment(
        &mut self,
        id: EnrollmentId,
        patch: EnrollmentPatch,
    ) -> Result<Enrollment, StoreError> {
        let current = self.enrollment(id)?.clone();
        let mut candidate = current.clone();
        patch.apply(&mut candidate);
        if candidate == current {
            return Ok(candidate);
        }
        Validator::enrollment(&candidate)?;
        current.status.check_transition(candidate.status)?;

        if candidate.provider_id != current.provider_id {
            self.provider(candidate.provider_id)?;
        }
        if candidate.payer_id != current.payer_id {
            self.payer(candidate.payer_id)?;
        }

        self.indexes.remove_enrollment(&current);
        self.indexes.insert_enrollment(&candidate);
        self.enrollments.insert(id, candidate.clone());
        debug!(
            enrollment = %id,
            from = %current.status,
            to = %candidate.status,
            "enrollment updated"
        );
        self.emit(vec![ChangeEvent::updated(id)]);
        Ok(candidate)
    }

    /// Move an enrollment to a new status.
    pub fn transition_enrollment(
        &mut self,
        id: EnrollmentId,
        status: EnrollmentStatus,
    ) -> Result<Enrollment, StoreError> {
        self.update_enrollment(id, EnrollmentPatch::status(status))
    }

    pub fn delete_enrollment(&mut self, id: EnrollmentId) -> Result<Enrollment, StoreError> {
        let removed = self
            .enrollments
            .remove(&id)
            .ok_or_else(|| StoreError::not_found(id))?;
        self.indexes.remove_enrollment(&removed);
        debug!(enrollment = %id, "enrollment deleted");
        self.emit(vec![ChangeEvent::deleted(id)]);
        Ok(removed)
    }

    pub fn list_enrollments(&self, filter: Filter) -> Result<Listing<'_, Enrollment>, StoreError> {
        Listing::new(&self.enrollments, filter)
    }

    /// All enrollments in insertion order.
    pub fn enrollments(&self) -> impl Iterator<Item = &Enrollment> {
        self.enrollments.values()
    }

    /// Enrollments by provider, payer or status, served from secondary
    /// indexes. An id with no enrollments yields nothing.
    pub fn query_enrollments(&self, query: EnrollmentQuery) -> impl Iterator<Item = &Enrollment> {
        let ids = match query {
            EnrollmentQuery::ByProvider(provider) => self.indexes.enrollments_for_provider(provider),
            EnrollmentQuery::ByPayer(payer) => self.indexes.enrollments_for_payer(payer),
            EnrollmentQuery::ByStatus(status) => self.indexes.enrollments_with_status(status),
        };
        ids.into_iter()
            .flatten()
            .filter_map(|id| self.enrollments.get(id))
    }

    /// Expire every Approved enrollment whose expiry date is before `as_of`.
    ///
    /// Entry point for the external scheduler. Returns the expired ids.
    pub fn expire_due(&mut self, as_of: NaiveDate) -> Vec<EnrollmentId> {
        let due: Vec<EnrollmentId> = self
            .indexes
            .enrollments_with_status(EnrollmentStatus::Approved)
            .into_iter()
            .flatten()
            .copied()
            .filter(|id| {
                self.enrollments
                    .get(id)
                    .and_then(|e| e.expiry_date)
                    .is_some_and(|expiry| expiry < as_of)
            })
            .collect();

        let mut events = Vec::with_capacity(due.len());
        for id in &due {
            if let Some(enrollment) = self.enrollments.get_mut(id) {
                self.indexes.remove_enrollment(enrollment);
                enrollment.status = EnrollmentStatus::Expired;
                self.indexes.insert_enrollment(enrollment);
                events.push(ChangeEvent::updated(*id));
            }
        }

        debug!(%as_of, expired = due.len(), "expiry sweep");
        self.emit(events);
        due
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Remove every record and reset id counters. Subscribers are kept and
    /// receive a `Delete` for every removed record.
    pub fn clear(&mut self) {
        let events = self.removal_events();
        self.providers.clear();
        self.payers.clear();
        self.locations.clear();
        self.enrollments.clear();
        self.indexes.clear();
        self.sequence = IdSequence::default();
        debug!(removed = events.len(), "store cleared");
        self.emit(events);
    }

    fn removal_events(&self) -> Vec<ChangeEvent> {
        let enrollments = self.enrollments.keys().map(|id| ChangeEvent::deleted(*id));
        let locations = self.locations.keys().map(|id| ChangeEvent::deleted(*id));
        let payers = self.payers.keys().map(|id| ChangeEvent::deleted(*id));
        let providers = self.providers.keys().map(|id| ChangeEvent::deleted(*id));
        enrollments
            .chain(locations)
            .chain(payers)
            .chain(providers)
            .collect()
    }

    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    #[must_use]
    pub fn payer_count(&self) -> usize {
        self.payers.len()
    }

    #[must_use]
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn enrollment_count(&self) -> usize {
        self.enrollments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
            && self.payers.is_empty()
            && self.locations.is_empty()
            && self.enrollments.is_empty()
    }

    #[must_use]
    pub fn sequence(&self) -> IdSequence {
        self.sequence
    }

    // =========================================================================
    // INTEGRITY
    // =========================================================================

    fn check_provider_dependents(&self, id: ProviderId) -> Result<(), StoreError> {
        for enrollment_id in self.indexes.enrollments_for_provider(id).into_iter().flatten() {
            match self.enrollments.get(enrollment_id) {
                Some(enrollment) if enrollment.provider_id == id => {}
                _ => {
                    return Err(integrity(format!(
                        "index lists {} under {} but it does not reference it",
                        enrollment_id, id
                    )));
                }
            }
        }
        for location_id in self.indexes.locations_for_provider(id).into_iter().flatten() {
            let listed = self
                .locations
                .get(location_id)
                .is_some_and(|location| location.provider_ids.contains(&id));
            if !listed {
                return Err(integrity(format!(
                    "index lists {} under {} but it does not list it",
                    location_id, id
                )));
            }
        }
        Ok(())
    }

    fn check_payer_dependents(&self, id: PayerId) -> Result<(), StoreError> {
        for enrollment_id in self.indexes.enrollments_for_payer(id).into_iter().flatten() {
            match self.enrollments.get(enrollment_id) {
                Some(enrollment) if enrollment.payer_id == id => {}
                _ => {
                    return Err(integrity(format!(
                        "index lists {} under {} but it does not reference it",
                        enrollment_id, id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Exhaustive consistency check: every reference resolves, every key
    /// matches its record, ids are within the sequence, and the secondary
    /// indexes equal a rebuild from primary data.
    pub fn verify_integrity(&self) -> Result<(), StoreError> {
        check_keys(&self.providers, |p| p.id, self.sequence.provider)?;
        check_keys(&self.payers, |p| p.id, self.sequence.payer)?;
        check_keys(&self.locations, |l| l.id, self.sequence.location)?;
        check_keys(&self.enrollments, |e| e.id, self.sequence.enrollment)?;

        for enrollment in self.enrollments.values() {
            if !self.providers.contains_key(&enrollment.provider_id) {
                return Err(integrity(format!(
                    "{} references missing {}",
                    enrollment.id, enrollment.provider_id
                )));
            }
            if !self.payers.contains_key(&enrollment.payer_id) {
                return Err(integrity(format!(
                    "{} references missing {}",
                    enrollment.id, enrollment.payer_id
                )));
            }
            Validator::enrollment(enrollment)
                .map_err(|e| integrity(format!("{}: {}", enrollment.id, e)))?;
        }

        for location in self.locations.values() {
            if let Some(missing) = location
                .provider_ids
                .iter()
                .find(|id| !self.providers.contains_key(id))
            {
                return Err(integrity(format!(
                    "{} references missing {}",
                    location.id, missing
                )));
            }
        }

        let rebuilt = Indexes::build(self.enrollments.values(), self.locations.values());
        if rebuilt != self.indexes {
            return Err(integrity(
                "secondary indexes drifted from primary data".to_string(),
            ));
        }
        Ok(())
    }

    // =========================================================================
    // SNAPSHOTS
    // =========================================================================

    /// Copy of the current collections and id counters.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(self)
    }

    /// Build a store from a snapshot. Every record is validated, indexes are
    /// rebuilt, and the result must pass [`EntityStore::verify_integrity`].
    ///
    /// Enrollment statuses are taken as recorded; the status machine only
    /// governs live updates.
    pub fn restore(snapshot: Snapshot) -> Result<Self, StoreError> {
        let mut store = Self {
            sequence: snapshot.sequence,
            ..Self::default()
        };

        for provider in snapshot.providers {
            Validator::provider(&provider)?;
            insert_unique(&mut store.providers, provider.id, provider)?;
        }
        for payer in snapshot.payers {
            Validator::payer(&payer)?;
            insert_unique(&mut store.payers, payer.id, payer)?;
        }
        for location in snapshot.locations {
            Validator::location(&location)?;
            insert_unique(&mut store.locations, location.id, location)?;
        }
        for enrollment in snapshot.enrollments {
            insert_unique(&mut store.enrollments, enrollment.id, enrollment)?;
        }

        store.indexes = Indexes::build(store.enrollments.values(), store.locations.values());
        store.verify_integrity()?;
        Ok(store)
    }

    /// Replace the whole contents with a snapshot, keeping subscribers.
    ///
    /// On error the store is left untouched. On success subscribers see a
    /// `Delete` for every old record followed by a `Create` for every new one.
    pub fn populate(&mut self, snapshot: Snapshot) -> Result<(), StoreError> {
        let Self {
            providers,
            payers,
            locations,
            enrollments,
            indexes,
            sequence,
            notifier: _,
        } = Self::restore(snapshot)?;

        let mut events = self.removal_events();
        events.extend(providers.keys().map(|id| ChangeEvent::created(*id)));
        events.extend(payers.keys().map(|id| ChangeEvent::created(*id)));
        events.extend(locations.keys().map(|id| ChangeEvent::created(*id)));
        events.extend(enrollments.keys().map(|id| ChangeEvent::created(*id)));

        self.providers = providers;
        self.payers = payers;
        self.locations = locations;
        self.enrollments = enrollments;
        self.indexes = indexes;
        self.sequence = sequence;

        debug!(
            providers = self.providers.len(),
            payers = self.payers.len(),
            locations = self.locations.len(),
            enrollments = self.enrollments.len(),
            "store populated"
        );
        self.emit(events);
        Ok(())
    }
}

fn check_keys<I: RecordId, R>(
    map: &BTreeMap<I, R>,
    id_of: impl Fn(&R) -> I,
    last_issued: u64,
) -> Result<(), StoreError> {
    for (key, record) in map {
        if id_of(record) != *key {
            return Err(integrity(format!(
                "{} stored under key {}",
                id_of(record),
                key
            )));
        }
    }
    if let Some(highest) = map.keys().next_back() {
        if highest.raw() > last_issued {
            return Err(integrity(format!(
                "{} is beyond the last issued id {}",
                highest, last_issued
            )));
        }
    }
    Ok(())
}

fn insert_unique<I: RecordId, R>(
    map: &mut BTreeMap<I, R>,
    id: I,
    record: R,
) -> Result<(), StoreError> {
    if map.insert(id, record).is_some() {
        return Err(integrity(format!("duplicate id {}", id)));
    }
    Ok(())
}

// =============================================================================
// SERIALIZATION SUPPORT
// =============================================================================

/// Serializable representation of the store, used by the persistence
/// collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub sequence: IdSequence,
    pub providers: Vec<Provider>,
    pub payers: Vec<Payer>,
    pub locations: Vec<Location>,
    pub enrollments: Vec<Enrollment>,
}

impl Snapshot {
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.providers.len() + self.payers.len() + self.locations.len() + self.enrollments.len()
    }
}

impl From<&EntityStore> for Snapshot {
    fn from(store: &EntityStore) -> Self {
        Self {
            sequence: store.sequence,
            providers: store.providers.values().cloned().collect(),
            payers: store.payers.values().cloned().collect(),
            locations: store.locations.values().cloned().collect(),
            enrollments: store.enrollments.values().cloned().collect(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
