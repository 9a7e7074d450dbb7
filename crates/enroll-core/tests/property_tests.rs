//! # Property-Based Tests
//!
//! Random operation sequences against the entity store. After every step the
//! secondary indexes must agree with a full scan and no reference may dangle.

use chrono::NaiveDate;
use enroll_core::{
    EnrollmentId, EnrollmentPatch, EnrollmentQuery, EnrollmentStatus, EntityStore, LocationId,
    LocationPatch, NewEnrollment, NewLocation, NewPayer, NewProvider, PayerId, ProviderId,
    ProviderPatch, ProviderStatus, store_from_bytes, store_to_bytes,
};
use std::collections::BTreeSet;
use proptest::collection::vec;
use proptest::prelude::*;

// =============================================================================
// OPERATION MODEL
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    AddProvider,
    AddPayer,
    AddLocation(Vec<usize>),
    AddEnrollment(usize, usize),
    Transition(usize, usize),
    ReassignEnrollment(usize, usize, usize),
    RescheduleEnrollment(usize, u32, u32),
    UpdateLocationProviders(usize, Vec<usize>),
    TerminateProvider(usize),
    DeleteProvider(usize),
    DeletePayer(usize),
    DeleteLocation(usize),
    DeleteEnrollment(usize),
    Expire(u32),
    Clear,
    Repopulate,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::AddProvider),
        2 => Just(Op::AddPayer),
        2 => vec(any::<usize>(), 0..4).prop_map(Op::AddLocation),
        4 => (any::<usize>(), any::<usize>()).prop_map(|(p, y)| Op::AddEnrollment(p, y)),
        4 => (any::<usize>(), 0usize..5).prop_map(|(e, s)| Op::Transition(e, s)),
        3 => (any::<usize>(), any::<usize>(), any::<usize>())
            .prop_map(|(e, p, y)| Op::ReassignEnrollment(e, p, y)),
        2 => (any::<usize>(), 0u32..400, 0u32..400)
            .prop_map(|(e, start, len)| Op::RescheduleEnrollment(e, start, len)),
        2 => (any::<usize>(), vec(any::<usize>(), 0..4))
            .prop_map(|(l, picks)| Op::UpdateLocationProviders(l, picks)),
        1 => any::<usize>().prop_map(Op::TerminateProvider),
        1 => any::<usize>().prop_map(Op::DeleteProvider),
        1 => any::<usize>().prop_map(Op::DeletePayer),
        1 => any::<usize>().prop_map(Op::DeleteLocation),
        1 => any::<usize>().prop_map(Op::DeleteEnrollment),
        1 => (0u32..730).prop_map(Op::Expire),
        1 => Just(Op::Clear),
        1 => Just(Op::Repopulate),
    ]
}

/// Pick an existing id by index, if the collection is not empty.
fn pick<T: Copy>(ids: &[T], index: usize) -> Option<T> {
    if ids.is_empty() {
        None
    } else {
        ids.get(index % ids.len()).copied()
    }
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date")
}

/// Apply one operation. Rejected operations are fine; they must simply leave
/// the store consistent.
fn apply(store: &mut EntityStore, op: &Op) {
    let providers: Vec<ProviderId> = store.providers().map(|p| p.id).collect();
    let payers: Vec<PayerId> = store.payers().map(|p| p.id).collect();
    let locations: Vec<LocationId> = store.locations().map(|l| l.id).collect();
    let enrollments: Vec<EnrollmentId> = store.enrollments().map(|e| e.id).collect();

    match op {
        Op::AddProvider => {
            let _ = store.create_provider(NewProvider::new("Dr. Prop"));
        }
        Op::AddPayer => {
            let _ = store.create_payer(NewPayer::new("Prop Health"));
        }
        Op::AddLocation(picks) => {
            let mut draft = NewLocation::new("1 Main St", "Springfield", "IL", "62701");
            for index in picks {
                if let Some(provider) = pick(&providers, *index) {
                    draft = draft.with_provider(provider);
                }
            }
            let _ = store.create_location(draft);
        }
        Op::AddEnrollment(p, y) => {
            if let (Some(provider), Some(payer)) = (pick(&providers, *p), pick(&payers, *y)) {
                let expiry = base_date() + chrono::Days::new((*p % 365) as u64);
                let draft = NewEnrollment::new(provider, payer).with_dates(None, Some(expiry));
                let _ = store.create_enrollment(draft);
            }
        }
        Op::Transition(e, s) => {
            if let Some(id) = pick(&enrollments, *e) {
                let _ = store.transition_enrollment(id, EnrollmentStatus::ALL[*s % 5]);
            }
        }
        Op::ReassignEnrollment(e, p, y) => {
            if let Some(id) = pick(&enrollments, *e) {
                let patch = EnrollmentPatch {
                    provider_id: pick(&providers, *p),
                    payer_id: pick(&payers, *y),
                    ..EnrollmentPatch::default()
                };
                let _ = store.update_enrollment(id, patch);
            }
        }
        Op::RescheduleEnrollment(e, start, len) => {
            if let Some(id) = pick(&enrollments, *e) {
                let effective = base_date() + chrono::Days::new(u64::from(*start));
                let expiry = effective + chrono::Days::new(u64::from(*len));
                let patch = EnrollmentPatch {
                    effective_date: Some(Some(effective)),
                    expiry_date: Some(Some(expiry)),
                    ..EnrollmentPatch::default()
                };
                let _ = store.update_enrollment(id, patch);
            }
        }
        Op::UpdateLocationProviders(l, picks) => {
            if let Some(id) = pick(&locations, *l) {
                let provider_ids: BTreeSet<ProviderId> = picks
                    .iter()
                    .filter_map(|index| pick(&providers, *index))
                    .collect();
                let patch = LocationPatch {
                    provider_ids: Some(provider_ids),
                    ..LocationPatch::default()
                };
                let _ = store.update_location(id, patch);
            }
        }
        Op::TerminateProvider(p) => {
            if let Some(id) = pick(&providers, *p) {
                let patch = ProviderPatch {
                    status: Some(ProviderStatus::Terminated),
                    ..ProviderPatch::default()
                };
                let _ = store.update_provider(id, patch);
            }
        }
        Op::DeleteProvider(p) => {
            if let Some(id) = pick(&providers, *p) {
                store.delete_provider(id).expect("delete existing provider");
            }
        }
        Op::DeletePayer(y) => {
            if let Some(id) = pick(&payers, *y) {
                store.delete_payer(id).expect("delete existing payer");
            }
        }
        Op::DeleteLocation(l) => {
            if let Some(id) = pick(&locations, *l) {
                store.delete_location(id).expect("delete existing location");
            }
        }
        Op::DeleteEnrollment(e) => {
            if let Some(id) = pick(&enrollments, *e) {
                store.delete_enrollment(id).expect("delete existing enrollment");
            }
        }
        Op::Expire(days) => {
            store.expire_due(base_date() + chrono::Days::new(u64::from(*days)));
        }
        Op::Clear => store.clear(),
        Op::Repopulate => {
            let snapshot = store.snapshot();
            store.populate(snapshot).expect("populate from own snapshot");
        }
    }
}

fn scan_ids(store: &EntityStore, keep: impl Fn(&enroll_core::Enrollment) -> bool) -> Vec<EnrollmentId> {
    store.enrollments().filter(|e| keep(e)).map(|e| e.id).collect()
}

fn query_ids(store: &EntityStore, query: EnrollmentQuery) -> Vec<EnrollmentId> {
    store.query_enrollments(query).map(|e| e.id).collect()
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Index-backed queries always equal a full scan.
    #[test]
    fn indexes_match_full_scan(ops in vec(op_strategy(), 1..80)) {
        let mut store = EntityStore::new();
        let mut highest_provider = 0;
        let mut highest_payer = 0;
        for op in &ops {
            apply(&mut store, op);
            prop_assert!(store.verify_integrity().is_ok(), "integrity broken after {:?}", op);
            highest_provider = highest_provider.max(store.sequence().provider);
            highest_payer = highest_payer.max(store.sequence().payer);
        }

        // Every id ever issued, deleted or not, plus one never issued.
        for provider in (1..=highest_provider + 1).map(ProviderId) {
            prop_assert_eq!(
                query_ids(&store, EnrollmentQuery::ByProvider(provider)),
                scan_ids(&store, |e| e.provider_id == provider)
            );
            let listed: Vec<LocationId> = store
                .locations()
                .filter(|l| l.provider_ids.contains(&provider))
                .map(|l| l.id)
                .collect();
            prop_assert_eq!(
                store.locations_for_provider(provider).map(|l| l.id).collect::<Vec<_>>(),
                listed
            );
        }
        for payer in (1..=highest_payer + 1).map(PayerId) {
            prop_assert_eq!(
                query_ids(&store, EnrollmentQuery::ByPayer(payer)),
                scan_ids(&store, |e| e.payer_id == payer)
            );
        }
        for status in EnrollmentStatus::ALL {
            prop_assert_eq!(
                query_ids(&store, EnrollmentQuery::ByStatus(status)),
                scan_ids(&store, |e| e.status == status)
            );
        }
    }

    /// Deleting a provider leaves nothing that references it.
    #[test]
    fn provider_cascade_leaves_no_orphans(
        ops in vec(op_strategy(), 1..60),
        victim in any::<usize>()
    ) {
        let mut store = EntityStore::new();
        for op in &ops {
            apply(&mut store, op);
        }
        let providers: Vec<ProviderId> = store.providers().map(|p| p.id).collect();
        if let Some(provider) = pick(&providers, victim) {
            store.delete_provider(provider).expect("delete");

            prop_assert!(store.enrollments().all(|e| e.provider_id != provider));
            prop_assert!(store.locations().all(|l| !l.provider_ids.contains(&provider)));
            prop_assert_eq!(store.locations_for_provider(provider).count(), 0);
            prop_assert!(store.verify_integrity().is_ok());
        }
    }

    /// Ids are strictly increasing in every collection.
    #[test]
    fn ids_strictly_increase(ops in vec(op_strategy(), 1..60)) {
        let mut store = EntityStore::new();
        for op in &ops {
            apply(&mut store, op);
        }
        let ids: Vec<u64> = store.providers().map(|p| p.id.0).collect();
        prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(ids.last().is_none_or(|last| *last <= store.sequence().provider));
    }

    /// Save -> load -> save is bit-exact for any reachable store.
    #[test]
    fn snapshot_roundtrip_bit_exact(ops in vec(op_strategy(), 1..60)) {
        let mut store = EntityStore::new();
        for op in &ops {
            apply(&mut store, op);
        }
        let first = store_to_bytes(&store).expect("encode");
        let restored = store_from_bytes(&first).expect("decode");
        prop_assert_eq!(store_to_bytes(&restored).expect("encode"), first);
    }
}
