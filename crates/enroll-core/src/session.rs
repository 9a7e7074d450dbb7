//! # Session Module
//!
//! Session management combining the entity store with the signed-in user
//! and the UI's provider selection.
//!
//! Host sequence:
//! 1. `login(user)` with the identity supplied by the auth layer
//! 2. `populate(snapshot)` from the persistence collaborator
//! 3. UI reads and mutations through `store()` / `store_mut()`
//! 4. `logout()` clears every record and the selection
//!
//! The session never checks credentials.

use crate::{CurrentUser, EntityStore, Provider, ProviderId, Snapshot, StoreError};
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct Session {
    user: Option<CurrentUser>,
    store: EntityStore,
    /// Provider currently focused in the UI.
    selected_provider: Option<ProviderId>,
}

impl Session {
    /// Create a signed-out session with an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the authenticated identity.
    ///
    /// Signing in as a different user first clears everything the previous
    /// user could see.
    pub fn login(&mut self, user: CurrentUser) {
        if self.user.as_ref().is_some_and(|current| current.id != user.id) {
            self.reset();
        }
        info!(user = %user.id, role = %user.role, "session started");
        self.user = Some(user);
    }

    /// Clear the store and selection. Store subscribers are kept.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(user = %user.id, "session ended");
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.selected_provider = None;
        self.store.clear();
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Load the signed-in user's data. Fails with `Validation` when nobody
    /// is signed in.
    pub fn populate(&mut self, snapshot: Snapshot) -> Result<(), StoreError> {
        if self.user.is_none() {
            return Err(StoreError::validation("user", "login required before populate"));
        }
        self.store.populate(snapshot)?;
        self.selected_provider = None;
        debug!(providers = self.store.provider_count(), "session populated");
        Ok(())
    }

    #[must_use]
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    // =========================================================================
    // PROVIDER SELECTION
    // =========================================================================

    /// Focus a provider. The provider must exist.
    pub fn select_provider(&mut self, id: ProviderId) -> Result<&Provider, StoreError> {
        let provider = self.store.provider(id)?;
        self.selected_provider = Some(id);
        Ok(provider)
    }

    pub fn clear_selection(&mut self) {
        self.selected_provider = None;
    }

    /// The focused provider, if it still exists.
    #[must_use]
    pub fn selected_provider(&self) -> Option<&Provider> {
        self.selected_provider
            .and_then(|id| self.store.provider(id).ok())
    }

    /// Delete a provider with cascade, dropping the selection if it pointed
    /// at the deleted provider.
    pub fn delete_provider(&mut self, id: ProviderId) -> Result<Provider, StoreError> {
        let removed = self.store.delete_provider(id)?;
        if self.selected_provider == Some(id) {
            self.selected_provider = None;
        }
        Ok(removed)
    }
}

// =============================================================================
// TESTS
// =============================================================================
