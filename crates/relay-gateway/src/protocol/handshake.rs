//! Handshake parameters
//!
//! Read from the upgrade request's query string, e.g.
//! `/ws?sessionId=abc123&role=publisher`. Both are optional here; the
//! connection manager decides whether the handshake is acceptable.

use serde::Deserialize;

/// Query parameters of a relay handshake
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HandshakeQuery {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
    pub role: Option<String>,
}

impl HandshakeQuery {
    /// Session identifier as sent, or empty when missing
    pub fn session_id(&self) -> &str {
        self.session_id.as_deref().unwrap_or_default()
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields() {
        let query = HandshakeQuery::default();
        assert_eq!(query.session_id(), "");
        assert!(query.role().is_none());
    }

    #[test]
    fn test_deserialize_camel_case_session_id() {
        let query: HandshakeQuery =
            serde_json::from_str(r#"{"sessionId":"abc","role":"publisher"}"#).unwrap();
        assert_eq!(query.session_id(), "abc");
        assert_eq!(query.role(), Some("publisher"));
    }
}
