//! quickpoll server library
//!
//! Create a poll over REST, share its id, and watch vote tallies update in
//! realtime over WebSocket. All state is in-memory and lives for the
//! process; the realtime layer is a single-writer hub so every viewer sees
//! votes in the order they were applied.

pub mod cli;
pub mod config;
pub mod live;
pub mod polls;
pub mod server;
