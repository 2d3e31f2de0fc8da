//! Session registry: concurrent map from session id to context state.
//!
//! Each context sits behind its own `tokio::sync::Mutex`, so turns
//! within one session serialize while different sessions proceed in
//! parallel. The registry itself is a `DashMap`; lookups clone the
//! `Arc` immediately so no map guard is ever held across an await.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;

use solace_types::chat::SessionId;
use solace_types::persona::PersonaProfile;

use crate::context::ContextState;

/// Concurrent registry of live conversational contexts.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<DashMap<SessionId, Arc<Mutex<ContextState>>>>,
    default_credits: u32,
}

impl SessionRegistry {
    /// Create a registry that seeds each new context with
    /// `default_credits` reply credits.
    pub fn new(default_credits: u32) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            default_credits,
        }
    }

    /// Register a new context for the given profile.
    ///
    /// Returns the fresh session id and the credit budget it starts
    /// with.
    pub fn create(&self, profile: PersonaProfile) -> (SessionId, u32) {
        let state = ContextState::new(profile, self.default_credits);
        let id = state.session_id;
        let credits = state.credits;
        self.inner.insert(id, Arc::new(Mutex::new(state)));
        debug!(session_id = %id, credits, "session created");
        (id, credits)
    }

    /// Look up a context. The `Arc` is cloned immediately; lock it to
    /// work with the state.
    pub fn get(&self, id: &SessionId) -> Option<Arc<Mutex<ContextState>>> {
        self.inner.get(id).map(|entry| entry.value().clone())
    }

    /// Drop a context. Returns whether it existed.
    pub fn remove(&self, id: &SessionId) -> bool {
        let removed = self.inner.remove(id).is_some();
        if removed {
            debug!(session_id = %id, "session removed");
        }
        removed
    }

    /// Number of live contexts.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
