//! Relay events - messages exchanged between publishers and viewers

mod relay_event;

pub use relay_event::{RelayEvent, EVENT_CHANNEL, STATE_EVENT_TYPE};
