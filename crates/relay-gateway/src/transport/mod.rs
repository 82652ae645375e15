//! Transport seam
//!
//! The relay core only talks to connections through [`Transport`]: a
//! point-to-point send, a fan-out to a named group, group membership, and a
//! forced close. [`GroupTransport`] is the in-process implementation that
//! backs every WebSocket with an outbound queue.

mod connection;
mod group;

pub use connection::{Connection, ConnectionState};
pub use group::GroupTransport;

use crate::protocol::{CloseCode, Frame};
use relay_core::ConnectionId;

/// Instruction queued for a connection's writer task
#[derive(Debug, Clone)]
pub enum Outbound {
    /// Text frame to write
    Frame(Frame),
    /// Close the socket with this code
    Close(CloseCode),
}

/// Outbound primitives available to the relay core
///
/// All methods are non-blocking. Delivery is best-effort: a closed or full
/// queue loses that frame and nothing is retried.
pub trait Transport: Send + Sync {
    /// Add a connection to a broadcast group
    fn join_group(&self, connection_id: &ConnectionId, group: &str);

    /// Remove a connection from a broadcast group
    fn leave_group(&self, connection_id: &ConnectionId, group: &str);

    /// Send a frame to one connection. Returns whether it was queued.
    fn send_to(&self, connection_id: &ConnectionId, frame: Frame) -> bool;

    /// Send a frame to every member of a group. Returns how many queued it.
    fn broadcast_to_group(&self, group: &str, frame: Frame) -> usize;

    /// Close a connection from the server side
    fn force_disconnect(&self, connection_id: &ConnectionId, code: CloseCode);
}
