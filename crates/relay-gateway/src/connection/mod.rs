//! Connection management
//!
//! Tracks each connection's role and session membership.

mod handle;
mod manager;

pub use handle::ConnectionHandle;
pub use manager::ConnectionManager;
