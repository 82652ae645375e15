//! Handle to an accepted relay connection

use relay_core::{ConnectionId, Role};

/// An active connection's membership: which session it joined and as what.
///
/// Produced only by a successful handshake and consumed by disconnect, so a
/// handle cannot be released twice. Not `Clone` for the same reason.
#[derive(Debug, PartialEq, Eq)]
pub struct ConnectionHandle {
    connection_id: ConnectionId,
    session_id: String,
    role: Role,
}

impl ConnectionHandle {
    pub(crate) fn new(connection_id: ConnectionId, session_id: String, role: Role) -> Self {
        Self {
            connection_id,
            session_id,
            role,
        }
    }

    pub fn connection_id(&self) -> &ConnectionId {
        &self.connection_id
    }

    /// Session identifier, already trimmed
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
