//! # relay-core
//!
//! Domain layer for the stream relay: session state, connection roles,
//! relay events and the error taxonomy.
//! This crate has zero dependencies on infrastructure (web framework, runtime, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::Session;
pub use error::{RelayError, RelayResult};
pub use events::{RelayEvent, EVENT_CHANNEL, STATE_EVENT_TYPE};
pub use value_objects::{ConnectionId, Role};
