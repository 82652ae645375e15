//! Event broadcasting
//!
//! Relays inbound events to every connection in the sender's session.

mod relay;

pub use relay::EventRelay;
