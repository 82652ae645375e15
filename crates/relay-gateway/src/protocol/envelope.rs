//! Frame envelope
//!
//! Every text frame, in both directions, is `{"event": <channel>, "data": <payload>}`.
//! The channel label is fixed; the application discriminator lives inside `data`.

use relay_core::{RelayEvent, EVENT_CHANNEL};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// A serialized envelope, shared between all recipients of a broadcast
pub type Frame = Arc<str>;

/// Channel-tagged frame payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Transport channel label
    pub event: String,

    /// Payload carried on the channel
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// Wrap a relay event on the relay channel
    #[must_use]
    pub fn relay(event: RelayEvent) -> Self {
        Self {
            event: EVENT_CHANNEL.to_string(),
            data: event.into_value(),
        }
    }

    /// Check if this envelope travels on the relay channel
    pub fn is_relay_channel(&self) -> bool {
        self.event == EVENT_CHANNEL
    }

    /// Serialize into a shareable frame
    pub fn to_frame(&self) -> Result<Frame, serde_json::Error> {
        serde_json::to_string(self).map(Frame::from)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
