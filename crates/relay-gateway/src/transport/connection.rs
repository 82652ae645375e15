//! Individual transport connection
//!
//! The server side of one socket: its outbound queue and lifecycle state.

use super::Outbound;
use parking_lot::RwLock;
use relay_core::ConnectionId;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Socket accepted, handshake not yet validated
    Connecting,
    /// Joined to a session, events are accepted
    Active,
    /// Closed (terminal)
    Disconnected,
}

/// A single transport connection
pub struct Connection {
    /// Transport-assigned identifier
    id: ConnectionId,

    /// Current lifecycle state
    state: RwLock<ConnectionState>,

    /// Queue drained by the socket writer task
    sender: mpsc::Sender<Outbound>,

    /// Connection creation time
    created_at: Instant,
}

impl Connection {
    /// Create a new connection in the `Connecting` state
    pub fn new(id: ConnectionId, sender: mpsc::Sender<Outbound>) -> Arc<Self> {
        Arc::new(Self {
            id,
            state: RwLock::new(ConnectionState::Connecting),
            sender,
            created_at: Instant::now(),
        })
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// Get the current state
    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    /// Set the connection state. `Disconnected` is terminal and never left.
    pub fn set_state(&self, state: ConnectionState) {
        let mut current = self.state.write();
        if *current != ConnectionState::Disconnected {
            *current = state;
        }
    }

    /// Get connection age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Queue an instruction without waiting
    pub fn try_send(&self, outbound: Outbound) -> Result<(), mpsc::error::TrySendError<Outbound>> {
        self.sender.try_send(outbound)
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("created_at", &self.created_at)
            .finish()
    }
}
