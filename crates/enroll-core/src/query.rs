//! # Query Module
//!
//! Structured query types for store reads.
//!
//! - [`Filter`]: predicate map (field -> equals / range) plus optional sort key,
//!   evaluated by the `list_*` operations
//! - [`Listing`]: finite, restartable view over matching records
//! - [`EnrollmentQuery`]: index-backed enrollment lookups

use crate::primitives::MAX_FILTER_PREDICATES;
use crate::{EnrollmentStatus, FieldValue, PayerId, ProviderId, Record, StoreError};
use std::cmp::Ordering;
use std::collections::{BTreeMap, btree_map};

// =============================================================================
// PREDICATES & FILTERS
// =============================================================================

/// Condition on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Field is set and equal to the value.
    Equals(FieldValue),
    /// Field is set and within the inclusive bounds. Missing bounds are open.
    Range {
        min: Option<FieldValue>,
        max: Option<FieldValue>,
    },
}

impl Predicate {
    #[must_use]
    pub fn matches(&self, value: Option<&FieldValue>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match self {
            Predicate::Equals(expected) => value == expected,
            Predicate::Range { min, max } => {
                let above = min
                    .as_ref()
                    .is_none_or(|m| matches!(value.compare(m), Some(Ordering::Greater | Ordering::Equal)));
                let below = max
                    .as_ref()
                    .is_none_or(|m| matches!(value.compare(m), Some(Ordering::Less | Ordering::Equal)));
                above && below
            }
        }
    }
}

/// Sort order for a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

/// Predicate map plus optional sort key.
///
/// All predicates must match. Without a sort key, listings follow insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    predicates: BTreeMap<String, Predicate>,
    sort: Option<SortKey>,
}

impl Filter {
    /// A filter that matches everything, in insertion order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: FieldValue) -> Self {
        self.predicates
            .insert(field.into(), Predicate::Equals(value));
        self
    }

    #[must_use]
    pub fn range(
        mut self,
        field: impl Into<String>,
        min: Option<FieldValue>,
        max: Option<FieldValue>,
    ) -> Self {
        self.predicates
            .insert(field.into(), Predicate::Range { min, max });
        self
    }

    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(SortKey {
            field: field.into(),
            descending: false,
        });
        self
    }

    #[must_use]
    pub fn sort_by_desc(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(SortKey {
            field: field.into(),
            descending: true,
        });
        self
    }

    pub fn predicates(&self) -> impl Iterator<Item = (&str, &Predicate)> {
        self.predicates.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn sort_key(&self) -> Option<&SortKey> {
        self.sort.as_ref()
    }

    /// Check field names against `R` and reject inverted ranges.
    pub fn validate<R: Record>(&self) -> Result<(), StoreError> {
        if self.predicates.len() > MAX_FILTER_PREDICATES {
            return Err(StoreError::validation(
                "filter",
                format!("at most {} predicates", MAX_FILTER_PREDICATES),
            ));
        }
        let sort_field = self.sort.as_ref().map(|s| s.field.as_str());
        for field in self.predicates.keys().map(String::as_str).chain(sort_field) {
            if !R::FIELDS.contains(&field) {
                return Err(StoreError::validation(
                    "filter",
                    format!("unknown field '{}'", field),
                ));
            }
        }
        for (field, predicate) in &self.predicates {
            if let Predicate::Range {
                min: Some(min),
                max: Some(max),
            } = predicate
            {
                match min.compare(max) {
                    Some(Ordering::Greater) => {
                        return Err(StoreError::validation(
                            field.as_str(),
                            format!("range minimum {} is above maximum {}", min, max),
                        ));
                    }
                    None => {
                        return Err(StoreError::validation(
                            field.as_str(),
                            "range bounds have different types",
                        ));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.predicates
            .iter()
            .all(|(field, predicate)| predicate.matches(record.field(field).as_ref()))
    }
}

// =============================================================================
// LISTING
// =============================================================================

/// Finite, restartable view over the records matching a [`Filter`].
///
/// Unsorted listings are evaluated lazily on every [`Listing::iter`] call.
/// Sorted listings fix their order when created; ties keep insertion order.
#[derive(Debug)]
pub struct Listing<'a, R: Record> {
    records: &'a BTreeMap<R::Id, R>,
    filter: Filter,
    order: Option<Vec<R::Id>>,
}

impl<'a, R: Record> Listing<'a, R> {
    pub(crate) fn new(records: &'a BTreeMap<R::Id, R>, filter: Filter) -> Result<Self, StoreError> {
        filter.validate::<R>()?;

        let order = filter.sort_key().map(|key| {
            let mut matching: Vec<(&R, Option<FieldValue>)> = records
                .values()
                .filter(|r| filter.matches(*r))
                .map(|r| (r, r.field(&key.field)))
                .collect();
            matching.sort_by(|(_, a), (_, b)| compare_sort_values(a.as_ref(), b.as_ref(), key.descending));
            matching.into_iter().map(|(r, _)| r.id()).collect()
        });

        Ok(Self {
            records,
            filter,
            order,
        })
    }

    /// Iterate the matching records. May be called any number of times.
    pub fn iter(&self) -> ListingIter<'_, 'a, R> {
        match &self.order {
            Some(ids) => ListingIter::Sorted {
                ids: ids.iter(),
                records: self.records,
            },
            None => ListingIter::Insertion {
                inner: self.records.values(),
                filter: &self.filter,
            },
        }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<R::Id> {
        self.iter().map(Record::id).collect()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<R>
    where
        R: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<'l, 'a, R: Record> IntoIterator for &'l Listing<'a, R> {
    type Item = &'a R;
    type IntoIter = ListingIter<'l, 'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`Listing::iter`].
pub enum ListingIter<'l, 'a, R: Record> {
    Insertion {
        inner: btree_map::Values<'a, R::Id, R>,
        filter: &'l Filter,
    },
    Sorted {
        ids: std::slice::Iter<'l, R::Id>,
        records: &'a BTreeMap<R::Id, R>,
    },
}

impl<'a, R: Record> Iterator for ListingIter<'_, 'a, R> {
    type Item = &'a R;

    fn next(&mut self) -> Option<&'a R> {
        match self {
            ListingIter::Insertion { inner, filter } => inner.find(|r| filter.matches(*r)),
            ListingIter::Sorted { ids, records } => {
                let records: &'a BTreeMap<R::Id, R> = *records;
                ids.find_map(|id| records.get(id))
            }
        }
    }
}

/// Unset values sort last in both directions.
fn compare_sort_values(a: Option<&FieldValue>, b: Option<&FieldValue>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = a.compare(b).unwrap_or(Ordering::Equal);
            if descending { ord.reverse() } else { ord }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// =============================================================================
// ENROLLMENT QUERIES
// =============================================================================

/// Index-backed enrollment lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentQuery {
    ByProvider(ProviderId),
    ByPayer(PayerId),
    ByStatus(EnrollmentStatus),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewProvider, Provider, ProviderStatus};

    fn providers() -> BTreeMap<ProviderId, Provider> {
        let mut map = BTreeMap::new();
        for (i, (name, status)) in [
            ("Dr. Carter", ProviderStatus::Active),
            ("Dr. Adams", ProviderStatus::Pending),
            ("Dr. Baker", ProviderStatus::Active),
        ]
        .into_iter()
        .enumerate()
        {
            let id = ProviderId(i as u64 + 1);
            let mut draft = NewProvider::new(name);
            draft.status = status;
            map.insert(id, draft.into_record(id));
        }
        map
    }

    fn names<'a>(listing: &Listing<'a, Provider>) -> Vec<&'a str> {
        listing.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn empty_filter_lists_in_insertion_order() {
        let map = providers();
        let listing = Listing::new(&map, Filter::new()).expect("listing");
        assert_eq!(names(&listing), vec!["Dr. Carter", "Dr. Adams", "Dr. Baker"]);
    }

    #[test]
    fn equality_filter() {
        let map = providers();
        let filter = Filter::new().eq("status", FieldValue::text("Active"));
        let listing = Listing::new(&map, filter).expect("listing");
        assert_eq!(names(&listing), vec!["Dr. Carter", "Dr. Baker"]);
    }

    #[test]
    fn listing_is_restartable() {
        let map = providers();
        let listing = Listing::new(&map, Filter::new()).expect("listing");
        let first: Vec<_> = listing.iter().map(|p| p.id).collect();
        let second: Vec<_> = (&listing).into_iter().map(|p| p.id).collect();
        assert_eq!(first, second);
        assert_eq!(listing.count(), 3);
    }

    #[test]
    fn sort_ascending_and_descending() {
        let map = providers();
        let asc = Listing::new(&map, Filter::new().sort_by("name")).expect("listing");
        assert_eq!(names(&asc), vec!["Dr. Adams", "Dr. Baker", "Dr. Carter"]);

        let desc = Listing::new(&map, Filter::new().sort_by_desc("name")).expect("listing");
        assert_eq!(names(&desc), vec!["Dr. Carter", "Dr. Baker", "Dr. Adams"]);
    }

    #[test]
    fn range_filter_on_ids() {
        let map = providers();
        let filter = Filter::new().range("id", Some(FieldValue::Id(2)), None);
        let listing = Listing::new(&map, filter).expect("listing");
        assert_eq!(listing.ids(), vec![ProviderId(2), ProviderId(3)]);
    }

    #[test]
    fn unknown_field_rejected() {
        let map = providers();
        let err = Listing::new(&map, Filter::new().eq("shoe_size", FieldValue::Id(9)))
            .expect_err("unknown field");
        assert!(matches!(err, StoreError::Validation { .. }));

        let err = Listing::new(&map, Filter::new().sort_by("shoe_size")).expect_err("unknown sort");
        assert!(matches!(err, StoreError::Validation { .. }));
    }

    #[test]
    fn inverted_range_rejected() {
        let filter = Filter::new().range("id", Some(FieldValue::Id(5)), Some(FieldValue::Id(1)));
        assert!(filter.validate::<Provider>().is_err());
    }

    #[test]
    fn unset_field_never_matches() {
        assert!(!Predicate::Equals(FieldValue::text("x")).matches(None));
        assert!(
            !Predicate::Range {
                min: None,
                max: None
            }
            .matches(None)
        );
    }
}
