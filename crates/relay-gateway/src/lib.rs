//! # relay-gateway
//!
//! WebSocket relay between one publisher and any number of viewers per session.
//!
//! A connection joins a session through the [`connection::ConnectionManager`],
//! which keeps per-role counters in the [`registry::SessionRegistry`] and
//! replays the cached `state` event to late joiners. Inbound events go through
//! the [`broadcast::EventRelay`], which refreshes that cache and fans the event
//! out to the session's group on the [`transport::Transport`].

pub mod broadcast;
pub mod connection;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod transport;
