//! Polls Module
//!
//! In-memory poll state: the data model and the store that owns it.

pub mod poll;
pub mod store;

pub use poll::{Poll, PollOption};
pub use store::{PollStore, StoreError};
