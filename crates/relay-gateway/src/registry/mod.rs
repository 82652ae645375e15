//! Session registry
//!
//! Owns every live session's state, keyed by session identifier.

mod session_registry;

pub use session_registry::{SessionGuard, SessionRegistry};
