//! Relay state
//!
//! Application state for the relay server.

use crate::broadcast::EventRelay;
use crate::connection::ConnectionManager;
use crate::registry::SessionRegistry;
use crate::transport::GroupTransport;
use relay_common::RelayConfig;
use relay_core::Session;
use std::sync::Arc;

/// Relay application state
///
/// Holds all shared dependencies for the relay server. The registry is owned
/// here and lives exactly as long as the server; outside the crate it is only
/// readable through session snapshots.
#[derive(Clone)]
pub struct RelayState {
    /// Session registry shared by the manager and the relay
    registry: Arc<SessionRegistry>,
    /// Transport backing every WebSocket
    transport: Arc<GroupTransport>,
    /// Connection manager for joins and leaves
    connection_manager: Arc<ConnectionManager>,
    /// Event relay for inbound events
    event_relay: Arc<EventRelay>,
    /// Application configuration
    config: Arc<RelayConfig>,
}

impl RelayState {
    /// Wire up a fresh registry, transport, manager and relay
    pub fn new(config: RelayConfig) -> Self {
        let registry = SessionRegistry::new_shared();
        let transport = GroupTransport::new_shared();
        let connection_manager = ConnectionManager::new_shared(registry.clone(), transport.clone());
        let event_relay = EventRelay::new_shared(registry.clone(), transport.clone());

        Self {
            registry,
            transport,
            connection_manager,
            event_relay,
            config: Arc::new(config),
        }
    }

    /// Copy of a live session, if any
    pub fn session(&self, session_id: &str) -> Option<Session> {
        self.registry.snapshot(session_id)
    }

    /// Get the number of live sessions
    pub fn session_count(&self) -> usize {
        self.registry.len()
    }

    /// Get the transport
    pub fn transport(&self) -> &GroupTransport {
        &self.transport
    }

    /// Get the connection manager
    pub fn connection_manager(&self) -> &ConnectionManager {
        &self.connection_manager
    }

    /// Get the event relay
    pub fn event_relay(&self) -> &EventRelay {
        &self.event_relay
    }

    /// Get the application configuration
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

impl std::fmt::Debug for RelayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayState")
            .field("registry", &self.registry)
            .field("transport", &self.transport)
            .field("config", &"RelayConfig")
            .finish()
    }
}
