//! Event relay
//!
//! Takes an inbound payload from one connection, refreshes the session's
//! cached state for `state` events, and broadcasts the payload verbatim to the
//! whole session group, sender included. Delivery is fire-and-forget.

use crate::connection::ConnectionHandle;
use crate::protocol::Envelope;
use crate::registry::SessionRegistry;
use crate::transport::Transport;
use relay_core::{RelayError, RelayEvent, RelayResult};
use serde_json::Value;
use std::sync::Arc;

/// Fans inbound events out to their session
pub struct EventRelay {
    registry: Arc<SessionRegistry>,
    transport: Arc<dyn Transport>,
}

impl EventRelay {
    /// Create a new event relay
    pub fn new(registry: Arc<SessionRegistry>, transport: Arc<dyn Transport>) -> Self {
        Self {
            registry,
            transport,
        }
    }

    /// Create a new event relay wrapped in Arc
    pub fn new_shared(registry: Arc<SessionRegistry>, transport: Arc<dyn Transport>) -> Arc<Self> {
        Arc::new(Self::new(registry, transport))
    }

    /// Handle a raw text frame from a connection.
    ///
    /// Frames that are not valid envelopes, or that use a channel other than
    /// the relay channel, are dropped.
    pub fn on_text(&self, handle: &ConnectionHandle, text: &str) -> Option<usize> {
        let envelope = match Envelope::from_json(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::debug!(
                    connection_id = %handle.connection_id(),
                    error = %e,
                    "Dropped undecodable frame"
                );
                return None;
            }
        };

        if !envelope.is_relay_channel() {
            tracing::debug!(
                connection_id = %handle.connection_id(),
                channel = %envelope.event,
                "Dropped frame on unknown channel"
            );
            return None;
        }

        self.on_event(handle, envelope.data)
    }

    /// Handle an inbound event payload.
    ///
    /// Returns the number of connections the broadcast was queued for, or
    /// `None` if the payload was dropped. Failures are logged and never reach
    /// the sender.
    pub fn on_event(&self, handle: &ConnectionHandle, raw: Value) -> Option<usize> {
        match self.relay(handle, raw) {
            Ok(recipients) => Some(recipients),
            Err(e) if e.is_expected() => {
                tracing::debug!(
                    connection_id = %handle.connection_id(),
                    session_id = %handle.session_id(),
                    code = e.code(),
                    error = %e,
                    "Dropped event"
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    connection_id = %handle.connection_id(),
                    session_id = %handle.session_id(),
                    code = e.code(),
                    error = %e,
                    "Failed to relay event"
                );
                None
            }
        }
    }

    fn relay(&self, handle: &ConnectionHandle, raw: Value) -> RelayResult<usize> {
        let event = RelayEvent::try_from(raw)?;
        let kind = event.kind().map(str::to_string);
        let cached_state = event.is_state().then(|| event.state_payload());

        // Encode before touching the session so a failure leaves it unchanged
        let frame = Envelope::relay(event).to_frame()?;

        let mut session = self
            .registry
            .get_mut(handle.session_id())
            .ok_or_else(|| RelayError::SessionNotFound(handle.session_id().to_string()))?;

        if let Some(state) = cached_state {
            session.set_last_state(state);
        }

        let recipients = self.transport.broadcast_to_group(handle.session_id(), frame);
        drop(session);

        tracing::trace!(
            connection_id = %handle.connection_id(),
            session_id = %handle.session_id(),
            event_type = ?kind,
            recipients = recipients,
            "Event relayed"
        );

        Ok(recipients)
    }
}

impl std::fmt::Debug for EventRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRelay")
            .field("registry", &self.registry)
            .finish()
    }
}
