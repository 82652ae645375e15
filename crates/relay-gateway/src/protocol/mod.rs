//! Relay wire protocol
//!
//! Defines the frame envelope, close codes, and handshake parameters.

mod close_codes;
mod envelope;
mod handshake;

pub use close_codes::CloseCode;
pub use envelope::{Envelope, Frame};
pub use handshake::HandshakeQuery;
