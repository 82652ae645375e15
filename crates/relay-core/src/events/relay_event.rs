//! Relay event
//!
//! An event is any JSON object. The `type` field is the application-level
//! discriminator, `data` is opaque, and `ts` is a producer timestamp the relay
//! neither validates nor rewrites. Fields are kept verbatim and in the order the
//! producer sent them.

use crate::error::RelayError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Transport channel label used for every relayed payload
pub const EVENT_CHANNEL: &str = "hb:event";

/// Discriminator of the event kind that updates the session cache
pub const STATE_EVENT_TYPE: &str = "state";

/// A validated inbound or outbound event object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelayEvent(Map<String, Value>);

impl RelayEvent {
    /// Build the catch-up event sent to a late joiner
    #[must_use]
    pub fn state(data: Value) -> Self {
        let mut fields = Map::new();
        fields.insert("type".to_string(), Value::String(STATE_EVENT_TYPE.to_string()));
        fields.insert("data".to_string(), data);
        Self(fields)
    }

    /// Get the `type` discriminator if it is a string
    pub fn kind(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    /// Check if this event updates the session's cached state
    pub fn is_state(&self) -> bool {
        self.kind() == Some(STATE_EVENT_TYPE)
    }

    /// Get the opaque `data` payload
    pub fn data(&self) -> Option<&Value> {
        self.0.get("data")
    }

    /// Payload to cache for a `state` event. Absent and `null` data both clear the slot.
    pub fn state_payload(&self) -> Option<Value> {
        self.data().filter(|d| !d.is_null()).cloned()
    }

    /// Convert back into a JSON value
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl TryFrom<Value> for RelayEvent {
    type Error = RelayError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            Value::Null => Err(RelayError::MalformedEvent("payload is null")),
            Value::Array(_) => Err(RelayError::MalformedEvent("payload is an array")),
            _ => Err(RelayError::MalformedEvent("payload is not an object")),
        }
    }
}

impl From<RelayEvent> for Value {
    fn from(event: RelayEvent) -> Self {
        event.into_value()
    }
}
