//! Integration test utilities for the stream relay
//!
//! This crate provides helpers for running end-to-end tests against
//! the relay's WebSocket endpoint and HTTP routes.

pub mod helpers;

pub use helpers::*;
