//! In-memory session registry
//!
//! Sessions are created lazily on first reference and evicted the moment their
//! last connection leaves, taking the cached state with them. A client that
//! reconnects after that starts from an empty session.
//!
//! A [`SessionGuard`] holds the map shard lock for its session. Every
//! operation that reads or writes membership or cached state runs while
//! holding one, so connect, disconnect and relay steps on the same session
//! never interleave. Guards must not be held across an `.await`.

use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use relay_core::{Role, Session};
use std::sync::Arc;

/// Exclusive access to one session entry
pub type SessionGuard<'a> = RefMut<'a, String, Session>;

/// Registry of live sessions
pub struct SessionRegistry {
    sessions: DashMap<String, Session>,
}

impl SessionRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Create an empty registry wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Get the session for `session_id`, creating an empty one if absent
    pub fn get_or_create(&self, session_id: &str) -> SessionGuard<'_> {
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(session_id = %session_id, "Session created");
                Session::new()
            })
    }

    /// Get an existing session without creating it
    pub(crate) fn get_mut(&self, session_id: &str) -> Option<SessionGuard<'_>> {
        self.sessions.get_mut(session_id)
    }

    /// Delete a session unconditionally. Returns whether it existed.
    pub fn remove(&self, session_id: &str) -> bool {
        let removed = self.sessions.remove(session_id).is_some();

        if removed {
            tracing::debug!(session_id = %session_id, "Session removed");
        }

        removed
    }

    /// Detach one member and evict the session if it became empty.
    ///
    /// Decrement, emptiness check and removal happen under one shard lock.
    /// Returns `true` if the session was evicted.
    pub fn release(&self, session_id: &str, role: Role) -> bool {
        let evicted = self
            .sessions
            .remove_if_mut(session_id, |_, session| {
                session.detach(role);
                session.is_empty()
            })
            .is_some();

        if evicted {
            tracing::debug!(session_id = %session_id, "Session evicted");
        }

        evicted
    }

    /// Copy of a session's current state
    pub fn snapshot(&self, session_id: &str) -> Option<Session> {
        self.sessions.get(session_id).map(|s| s.clone())
    }

    /// Check if a session exists
    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Get the number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.sessions.len())
            .finish()
    }
}
