//! # Change Notifications
//!
//! Subscribers registered on the store receive one [`ChangeEvent`] per
//! affected record after every successful mutation, so a UI layer can
//! re-render without polling.
//!
//! Events are delivered only after the whole mutation (including any
//! cascade) has been committed. Within one mutation, cascaded records are
//! reported first and the originating record last.

use crate::{EntityKind, RecordId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

/// One committed change to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub kind: EntityKind,
    pub operation: Operation,
    /// Raw id within the `kind` collection.
    pub id: u64,
}

impl ChangeEvent {
    pub fn new<I: RecordId>(operation: Operation, id: I) -> Self {
        Self {
            kind: I::KIND,
            operation,
            id: id.raw(),
        }
    }

    pub fn created<I: RecordId>(id: I) -> Self {
        Self::new(Operation::Create, id)
    }

    pub fn updated<I: RecordId>(id: I) -> Self {
        Self::new(Operation::Update, id)
    }

    pub fn deleted<I: RecordId>(id: I) -> Self {
        Self::new(Operation::Delete, id)
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.operation {
            Operation::Create => "created",
            Operation::Update => "updated",
            Operation::Delete => "deleted",
        };
        write!(f, "{} {}{} {}", self.kind, self.kind.prefix(), self.id, op)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// Boxed subscriber callback.
pub type Listener = Box<dyn FnMut(&ChangeEvent) + Send>;

/// Registry of subscriber callbacks.
#[derive(Default)]
pub struct Notifier {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Notifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&ChangeEvent) + Send + 'static,
    {
        self.next_id = self.next_id.saturating_add(1);
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver a batch of events to every subscriber, in order.
    pub fn notify(&mut self, events: &[ChangeEvent]) {
        for (_, listener) in &mut self.listeners {
            for event in events {
                listener(event);
            }
        }
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.listeners.len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EnrollmentId, ProviderId};
    use std::sync::{Arc, Mutex};

    #[test]
    fn subscribers_receive_events_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut notifier = Notifier::new();
        notifier.subscribe(move |event| sink.lock().expect("lock").push(*event));

        let events = [
            ChangeEvent::deleted(EnrollmentId(4)),
            ChangeEvent::deleted(ProviderId(1)),
        ];
        notifier.notify(&events);

        assert_eq!(*seen.lock().expect("lock"), events.to_vec());
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&count);

        let mut notifier = Notifier::new();
        let id = notifier.subscribe(move |_| *sink.lock().expect("lock") += 1);

        notifier.notify(&[ChangeEvent::created(ProviderId(1))]);
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.notify(&[ChangeEvent::created(ProviderId(2))]);

        assert_eq!(*count.lock().expect("lock"), 1);
        assert!(notifier.is_empty());
    }

    #[test]
    fn event_display() {
        assert_eq!(
            ChangeEvent::updated(EnrollmentId(3)).to_string(),
            "Enrollment E3 updated"
        );
    }
}
