//! WebSocket close codes
//!
//! Relay-specific close codes sent when the server ends a connection.

use relay_core::RelayError;

/// Relay WebSocket close codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum CloseCode {
    /// Unknown error occurred
    UnknownError = 4000,
    /// Handshake carried no session identifier
    MissingSession = 4001,
    /// Server is shutting down
    ServerShutdown = 4002,
}

impl CloseCode {
    /// Pick the close code for an error that ends a connection
    #[must_use]
    pub fn for_error(error: &RelayError) -> Self {
        match error {
            RelayError::RejectedHandshake => Self::MissingSession,
            _ => Self::UnknownError,
        }
    }

    /// Get the raw u16 value
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Get the description for this close code
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::UnknownError => "Unknown error occurred",
            Self::MissingSession => "Missing sessionId",
            Self::ServerShutdown => "Server shutting down",
        }
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} ({}): {}", self, self.as_u16(), self.description())
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        code.as_u16()
    }
}
