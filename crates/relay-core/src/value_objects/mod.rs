//! Value objects - immutable types that represent domain concepts

mod connection_id;
mod role;

pub use connection_id::ConnectionId;
pub use role::Role;
