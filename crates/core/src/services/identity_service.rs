use std::sync::Mutex;

use crate::models::identity::Identity;
use crate::storage::identity_store::IdentityStore;

/// Resolves the per-installation identity, memoized for the process
/// lifetime.
///
/// Resolution never throws: if the durable store is unavailable the
/// service returns `None`, downstream identity-scoped fetches are skipped,
/// and the next call tries the store again. Only a successful resolution
/// is cached, so the value can never change within a session.
pub struct IdentityService {
    store: IdentityStore,
    cached: Mutex<Option<Identity>>,
}

impl IdentityService {
    pub fn new(store: IdentityStore) -> Self {
        Self {
            store,
            cached: Mutex::new(None),
        }
    }

    pub fn resolve(&self) -> Option<Identity> {
        let mut cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(identity) = cached.as_ref() {
            return Some(identity.clone());
        }
        match self.store.load_or_create() {
            Ok(identity) => {
                tracing::debug!(path = %self.store.path().display(), "identity resolved");
                *cached = Some(identity.clone());
                Some(identity)
            }
            Err(e) => {
                tracing::warn!(error = %e, "identity store unavailable; scoped fetches will be skipped");
                None
            }
        }
    }
}

impl std::fmt::Debug for IdentityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let resolved = self
            .cached
            .lock()
            .map(|cached| cached.is_some())
            .unwrap_or(false);
        f.debug_struct("IdentityService")
            .field("store", &self.store)
            .field("resolved", &resolved)
            .finish()
    }
}
