//! Connection manager
//!
//! Admits connections into sessions and releases them on disconnect, keeping
//! the registry's per-role counters and the transport's broadcast groups in step.

use super::ConnectionHandle;
use crate::protocol::Envelope;
use crate::registry::SessionRegistry;
use crate::transport::Transport;
use relay_core::{ConnectionId, RelayError, RelayEvent, RelayResult, Role};
use std::sync::Arc;

/// Admits and releases relay connections
pub struct ConnectionManager {
    registry: Arc<SessionRegistry>,
    transport: Arc<dyn Transport>,
}

impl ConnectionManager {
    /// Create a new connection manager
    pub fn new(registry: Arc<SessionRegistry>, transport: Arc<dyn Transport>) -> Self {
        Self {
            registry,
            transport,
        }
    }

    /// Create a new connection manager wrapped in Arc
    pub fn new_shared(registry: Arc<SessionRegistry>, transport: Arc<dyn Transport>) -> Arc<Self> {
        Arc::new(Self::new(registry, transport))
    }

    /// Admit a connection into a session.
    ///
    /// Rejects the handshake if `session_id` is blank after trimming; the caller
    /// must then force-close the socket. Otherwise joins the session's group,
    /// bumps the counter for `role`, and if the session has cached state sends
    /// it to this connection alone as a `state` catch-up event.
    pub fn on_connect(
        &self,
        connection_id: ConnectionId,
        session_id: &str,
        role: Option<&str>,
    ) -> RelayResult<ConnectionHandle> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(RelayError::RejectedHandshake);
        }
        let role = Role::from_handshake(role);

        let mut session = self.registry.get_or_create(session_id);
        self.transport.join_group(&connection_id, session_id);
        session.attach(role);

        // Sent while the session is still locked so no broadcast can overtake it
        let caught_up = match session.last_state() {
            Some(state) => self.send_catch_up(&connection_id, state.clone()),
            None => false,
        };

        tracing::info!(
            connection_id = %connection_id,
            session_id = %session_id,
            role = %role,
            publishers = session.publisher_count(),
            viewers = session.viewer_count(),
            caught_up = caught_up,
            "Connection joined session"
        );

        drop(session);

        Ok(ConnectionHandle::new(connection_id, session_id.to_string(), role))
    }

    /// Release a connection from its session.
    ///
    /// Leaves the broadcast group, decrements the counter for the handle's role
    /// (never below zero), and evicts the session once both counters are zero.
    /// Returns `true` if the session was evicted.
    pub fn on_disconnect(&self, handle: ConnectionHandle) -> bool {
        self.transport
            .leave_group(handle.connection_id(), handle.session_id());
        let evicted = self.registry.release(handle.session_id(), handle.role());

        tracing::info!(
            connection_id = %handle.connection_id(),
            session_id = %handle.session_id(),
            role = %handle.role(),
            evicted = evicted,
            "Connection left session"
        );

        evicted
    }

    fn send_catch_up(&self, connection_id: &ConnectionId, state: serde_json::Value) -> bool {
        match Envelope::relay(RelayEvent::state(state)).to_frame() {
            Ok(frame) => self.transport.send_to(connection_id, frame),
            Err(e) => {
                tracing::warn!(
                    connection_id = %connection_id,
                    error = %e,
                    "Failed to encode catch-up event"
                );
                false
            }
        }
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("registry", &self.registry)
            .finish()
    }
}
