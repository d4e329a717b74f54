//! Realtime Broadcasting
//!
//! Per-poll subscriber rooms and live snapshot fan-out, run as a single-owner
//! hub task so every viewer of a poll sees updates in vote order.

pub mod hub;

pub use hub::{spawn, LiveHandle, LiveStats, ServerEvent};
