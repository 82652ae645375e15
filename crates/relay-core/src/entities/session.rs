//! Session entity
//!
//! One relay session: member counters per role and the single-slot cache of
//! the most recent `state` payload.

use crate::value_objects::Role;
use serde::Serialize;
use serde_json::Value;

/// State of one relay session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    last_state: Option<Value>,
    publisher_count: usize,
    viewer_count: usize,
}

impl Session {
    /// Create an empty session with no cached state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached state payload, if any
    pub fn last_state(&self) -> Option<&Value> {
        self.last_state.as_ref()
    }

    /// Replace the cached state payload
    pub fn set_last_state(&mut self, state: Option<Value>) {
        self.last_state = state;
    }

    pub fn publisher_count(&self) -> usize {
        self.publisher_count
    }

    pub fn viewer_count(&self) -> usize {
        self.viewer_count
    }

    /// Total number of attached connections
    pub fn member_count(&self) -> usize {
        self.publisher_count + self.viewer_count
    }

    /// Record a connection joining with the given role
    pub fn attach(&mut self, role: Role) {
        match role {
            Role::Publisher => self.publisher_count += 1,
            Role::Viewer => self.viewer_count += 1,
        }
    }

    /// Record a connection leaving with the given role. Counters clamp at zero.
    pub fn detach(&mut self, role: Role) {
        match role {
            Role::Publisher => self.publisher_count = self.publisher_count.saturating_sub(1),
            Role::Viewer => self.viewer_count = self.viewer_count.saturating_sub(1),
        }
    }

    /// Check if no connection is attached
    pub fn is_empty(&self) -> bool {
        self.member_count() == 0
    }
}
