//! Store-wide counts, computed on demand from the entity store.

use crate::query::EnrollmentQuery;
use crate::{EnrollmentStatus, EntityStore, ProviderStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreMetrics {
    pub provider_count: usize,
    pub payer_count: usize,
    pub location_count: usize,
    pub enrollment_count: usize,
    /// Providers per credentialing status. Statuses with no providers are omitted.
    pub providers_by_status: BTreeMap<ProviderStatus, usize>,
    /// Enrollments per status, served from the status index.
    pub enrollments_by_status: BTreeMap<EnrollmentStatus, usize>,
    /// Approved share of decided enrollments (Approved, Expired, Denied), in
    /// whole percent. Zero when nothing has been decided.
    pub approval_percent: u64,
}

impl StoreMetrics {
    #[must_use]
    pub fn from_store(store: &EntityStore) -> Self {
        let mut providers_by_status = BTreeMap::new();
        for provider in store.providers() {
            *providers_by_status.entry(provider.status).or_insert(0) += 1;
        }

        let enrollments_by_status: BTreeMap<EnrollmentStatus, usize> = EnrollmentStatus::ALL
            .into_iter()
            .map(|status| {
                let count = store
                    .query_enrollments(EnrollmentQuery::ByStatus(status))
                    .count();
                (status, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect();

        let count = |status: EnrollmentStatus| enrollments_by_status.get(&status).copied().unwrap_or(0) as u64;
        // Expired enrollments were approved before they lapsed.
        let approved = count(EnrollmentStatus::Approved) + count(EnrollmentStatus::Expired);
        let decided = approved + count(EnrollmentStatus::Denied);
        let approval_percent = if decided > 0 {
            approved.saturating_mul(100) / decided
        } else {
            0
        };

        Self {
            provider_count: store.provider_count(),
            payer_count: store.payer_count(),
            location_count: store.location_count(),
            enrollment_count: store.enrollment_count(),
            providers_by_status,
            enrollments_by_status,
            approval_percent,
        }
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.provider_count + self.payer_count + self.location_count + self.enrollment_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewEnrollment, NewPayer, NewProvider};

    #[test]
    fn empty_store_metrics() {
        let metrics = StoreMetrics::from_store(&EntityStore::new());
        assert_eq!(metrics, StoreMetrics::default());
        assert_eq!(metrics.record_count(), 0);
    }

    #[test]
    fn approval_percent_uses_integer_math() {
        let mut store = EntityStore::new();
        let provider = store.create_provider(NewProvider::new("Dr. A")).expect("provider");
        let payer = store.create_payer(NewPayer::new("Acme")).expect("payer");

        let outcomes = [
            EnrollmentStatus::Approved,
            EnrollmentStatus::Approved,
            EnrollmentStatus::Denied,
        ];
        for outcome in outcomes {
            let id = store
                .create_enrollment(NewEnrollment::new(provider, payer))
                .expect("enrollment");
            store
                .transition_enrollment(id, EnrollmentStatus::Submitted)
                .expect("submit");
            store.transition_enrollment(id, outcome).expect("decide");
        }
        store
            .create_enrollment(NewEnrollment::new(provider, payer))
            .expect("draft");

        let metrics = StoreMetrics::from_store(&store);
        assert_eq!(metrics.enrollment_count, 4);
        assert_eq!(metrics.approval_percent, 66);
        assert_eq!(
            metrics.enrollments_by_status.get(&EnrollmentStatus::Draft),
            Some(&1)
        );
        assert_eq!(
            metrics.providers_by_status.get(&ProviderStatus::Pending),
            Some(&1)
        );
        assert_eq!(metrics.record_count(), 6);
    }
}
