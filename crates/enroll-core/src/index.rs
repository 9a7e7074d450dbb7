//! # Secondary Indexes
//!
//! Reverse lookups maintained incrementally by the store on every
//! create/update/delete, so reference queries and cascades cost
//! O(matches) instead of O(total).
//!
//! Empty sets are pruned, which lets a freshly rebuilt index be compared
//! for equality against the incrementally maintained one.

use crate::{Enrollment, EnrollmentId, EnrollmentStatus, Location, LocationId, PayerId, ProviderId};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Indexes {
    /// provider -> enrollments referencing it
    by_provider: BTreeMap<ProviderId, BTreeSet<EnrollmentId>>,
    /// payer -> enrollments referencing it
    by_payer: BTreeMap<PayerId, BTreeSet<EnrollmentId>>,
    /// status -> enrollments currently in it
    by_status: BTreeMap<EnrollmentStatus, BTreeSet<EnrollmentId>>,
    /// provider -> locations listing it
    locations_by_provider: BTreeMap<ProviderId, BTreeSet<LocationId>>,
}

impl Indexes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build indexes from scratch out of primary data.
    pub fn build<'a>(
        enrollments: impl IntoIterator<Item = &'a Enrollment>,
        locations: impl IntoIterator<Item = &'a Location>,
    ) -> Self {
        let mut indexes = Self::new();
        for enrollment in enrollments {
            indexes.insert_enrollment(enrollment);
        }
        for location in locations {
            indexes.insert_location(location);
        }
        indexes
    }

    pub fn insert_enrollment(&mut self, enrollment: &Enrollment) {
        self.by_provider
            .entry(enrollment.provider_id)
            .or_default()
            .insert(enrollment.id);
        self.by_payer
            .entry(enrollment.payer_id)
            .or_default()
            .insert(enrollment.id);
        self.by_status
            .entry(enrollment.status)
            .or_default()
            .insert(enrollment.id);
    }

    pub fn remove_enrollment(&mut self, enrollment: &Enrollment) {
        remove_from(&mut self.by_provider, &enrollment.provider_id, &enrollment.id);
        remove_from(&mut self.by_payer, &enrollment.payer_id, &enrollment.id);
        remove_from(&mut self.by_status, &enrollment.status, &enrollment.id);
    }

    pub fn insert_location(&mut self, location: &Location) {
        for provider in &location.provider_ids {
            self.locations_by_provider
                .entry(*provider)
                .or_default()
                .insert(location.id);
        }
    }

    pub fn remove_location(&mut self, location: &Location) {
        for provider in &location.provider_ids {
            remove_from(&mut self.locations_by_provider, provider, &location.id);
        }
    }

    /// Drop every location entry of a provider (used by provider cascade).
    pub fn forget_provider_locations(&mut self, provider: ProviderId) -> BTreeSet<LocationId> {
        self.locations_by_provider
            .remove(&provider)
            .unwrap_or_default()
    }

    pub fn enrollments_for_provider(&self, provider: ProviderId) -> Option<&BTreeSet<EnrollmentId>> {
        self.by_provider.get(&provider)
    }

    pub fn enrollments_for_payer(&self, payer: PayerId) -> Option<&BTreeSet<EnrollmentId>> {
        self.by_payer.get(&payer)
    }

    pub fn enrollments_with_status(
        &self,
        status: EnrollmentStatus,
    ) -> Option<&BTreeSet<EnrollmentId>> {
        self.by_status.get(&status)
    }

    pub fn locations_for_provider(&self, provider: ProviderId) -> Option<&BTreeSet<LocationId>> {
        self.locations_by_provider.get(&provider)
    }

    pub fn clear(&mut self) {
        self.by_provider.clear();
        self.by_payer.clear();
        self.by_status.clear();
        self.locations_by_provider.clear();
    }
}

fn remove_from<K: Ord, V: Ord>(map: &mut BTreeMap<K, BTreeSet<V>>, key: &K, value: &V) {
    if let Some(set) = map.get_mut(key) {
        set.remove(value);
        if set.is_empty() {
            map.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrollment(id: u64, provider: u64, payer: u64) -> Enrollment {
        Enrollment {
            id: EnrollmentId(id),
            provider_id: ProviderId(provider),
            payer_id: PayerId(payer),
            status: EnrollmentStatus::Draft,
            effective_date: None,
            expiry_date: None,
        }
    }

    #[test]
    fn removal_prunes_empty_sets() {
        let e = enrollment(1, 1, 1);
        let mut indexes = Indexes::new();
        indexes.insert_enrollment(&e);
        indexes.remove_enrollment(&e);
        assert_eq!(indexes, Indexes::new());
    }

    #[test]
    fn build_matches_incremental() {
        let records = [enrollment(1, 1, 1), enrollment(2, 1, 2), enrollment(3, 2, 2)];

        let mut incremental = Indexes::new();
        for e in &records {
            incremental.insert_enrollment(e);
        }
        let built = Indexes::build(&records, std::iter::empty());

        assert_eq!(incremental, built);
        assert_eq!(
            built.enrollments_for_provider(ProviderId(1)).map(BTreeSet::len),
            Some(2)
        );
        assert_eq!(
            built.enrollments_for_payer(PayerId(2)).map(BTreeSet::len),
            Some(2)
        );
    }
}
