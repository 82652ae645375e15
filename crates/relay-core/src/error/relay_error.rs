//! Relay errors - failures that can occur while handling a connection or an event
//!
//! None of these are ever reported back to a publisher or viewer. They exist so
//! the boundary code can decide how loudly to log and whether to close the socket.

use thiserror::Error;

/// Relay layer errors
#[derive(Debug, Error)]
pub enum RelayError {
    /// Handshake carried no usable session identifier
    #[error("Handshake rejected: missing session identifier")]
    RejectedHandshake,

    /// Inbound payload is absent or not a JSON object
    #[error("Malformed event: {0}")]
    MalformedEvent(&'static str),

    /// Outbound frame could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Session entry vanished while a member was still attached
    #[error("Session not found: {0}")]
    SessionNotFound(String),
}

impl RelayError {
    /// Get an error code string for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::RejectedHandshake => "REJECTED_HANDSHAKE",
            Self::MalformedEvent(_) => "MALFORMED_EVENT",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::SessionNotFound(_) => "UNKNOWN_SESSION",
        }
    }

    /// Check if this error is expected client misuse rather than a relay fault
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::RejectedHandshake | Self::MalformedEvent(_))
    }
}

/// Result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(RelayError::RejectedHandshake.code(), "REJECTED_HANDSHAKE");
        assert_eq!(RelayError::MalformedEvent("null").code(), "MALFORMED_EVENT");
        assert_eq!(
            RelayError::SessionNotFound("abc".to_string()).code(),
            "UNKNOWN_SESSION"
        );
    }

    #[test]
    fn test_is_expected() {
        assert!(RelayError::RejectedHandshake.is_expected());
        assert!(RelayError::MalformedEvent("not an object").is_expected());
        assert!(!RelayError::SessionNotFound("abc".to_string()).is_expected());
    }

    #[test]
    fn test_error_display() {
        let err = RelayError::MalformedEvent("payload is null");
        assert_eq!(err.to_string(), "Malformed event: payload is null");

        let err = RelayError::SessionNotFound("s1".to_string());
        assert_eq!(err.to_string(), "Session not found: s1");
    }
}
