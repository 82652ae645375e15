//! In-process group transport
//!
//! Tracks live connections and named broadcast groups using DashMap for
//! thread-safe access.

use super::{Connection, ConnectionState, Outbound, Transport};
use crate::protocol::{CloseCode, Frame};
use dashmap::DashMap;
use relay_core::ConnectionId;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Transport backed by per-connection mpsc queues
pub struct GroupTransport {
    /// Live connections by id
    connections: DashMap<ConnectionId, Arc<Connection>>,

    /// Group name to member ids
    groups: DashMap<String, HashSet<ConnectionId>>,
}

impl GroupTransport {
    /// Create an empty transport
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            groups: DashMap::new(),
        }
    }

    /// Create an empty transport wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register an accepted socket's outbound queue
    pub fn register(&self, id: ConnectionId, sender: mpsc::Sender<Outbound>) -> Arc<Connection> {
        let connection = Connection::new(id.clone(), sender);
        self.connections.insert(id.clone(), connection.clone());

        tracing::trace!(connection_id = %id, "Connection registered");

        connection
    }

    /// Forget a connection. Dropping the last sender ends its writer task.
    pub fn unregister(&self, id: &ConnectionId) -> Option<Arc<Connection>> {
        let (_, connection) = self.connections.remove(id)?;
        connection.set_state(ConnectionState::Disconnected);

        tracing::trace!(connection_id = %id, "Connection unregistered");

        Some(connection)
    }

    /// Get a connection by id
    pub fn connection(&self, id: &ConnectionId) -> Option<Arc<Connection>> {
        self.connections.get(id).map(|r| r.clone())
    }

    /// Update a connection's lifecycle state
    pub fn set_state(&self, id: &ConnectionId, state: ConnectionState) {
        if let Some(connection) = self.connections.get(id) {
            connection.set_state(state);
        }
    }

    /// Get the total number of live connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Get the number of non-empty groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Get the number of members in a group
    pub fn group_size(&self, group: &str) -> usize {
        self.groups.get(group).map_or(0, |members| members.len())
    }

    /// Force-close every live connection with `code`. Returns how many were closed.
    pub fn close_all(&self, code: CloseCode) -> usize {
        let ids: Vec<ConnectionId> = self.connections.iter().map(|c| c.key().clone()).collect();

        for id in &ids {
            self.force_disconnect(id, code);
        }

        ids.len()
    }

    fn group_members(&self, group: &str) -> Vec<Arc<Connection>> {
        self.groups
            .get(group)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|id| self.connections.get(id).map(|c| c.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Transport for GroupTransport {
    fn join_group(&self, connection_id: &ConnectionId, group: &str) {
        self.groups
            .entry(group.to_string())
            .or_default()
            .insert(connection_id.clone());

        tracing::trace!(connection_id = %connection_id, group = %group, "Joined group");
    }

    fn leave_group(&self, connection_id: &ConnectionId, group: &str) {
        // Drop the group in the same step as its last member
        self.groups.remove_if_mut(group, |_, members| {
            members.remove(connection_id);
            members.is_empty()
        });

        tracing::trace!(connection_id = %connection_id, group = %group, "Left group");
    }

    fn send_to(&self, connection_id: &ConnectionId, frame: Frame) -> bool {
        let Some(connection) = self.connection(connection_id) else {
            return false;
        };

        match connection.try_send(Outbound::Frame(frame)) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(connection_id = %connection_id, error = %e, "Dropped frame");
                false
            }
        }
    }

    fn broadcast_to_group(&self, group: &str, frame: Frame) -> usize {
        let mut sent = 0;

        for connection in self.group_members(group) {
            if connection.try_send(Outbound::Frame(frame.clone())).is_ok() {
                sent += 1;
            } else {
                tracing::debug!(
                    connection_id = %connection.id(),
                    group = %group,
                    "Dropped broadcast frame"
                );
            }
        }

        tracing::trace!(group = %group, sent = sent, "Frame broadcast to group");

        sent
    }

    fn force_disconnect(&self, connection_id: &ConnectionId, code: CloseCode) {
        if let Some(connection) = self.unregister(connection_id) {
            let _ = connection.try_send(Outbound::Close(code));

            tracing::debug!(connection_id = %connection_id, code = %code, "Connection force-closed");
        }
    }
}

impl Default for GroupTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GroupTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupTransport")
            .field("connections", &self.connections.len())
            .field("groups", &self.groups.len())
            .finish()
    }
}
