//! Utility functions and helpers
//!
//! Timestamp/text rendering and atomic file writes.

pub mod atomic;
pub mod time;

pub use atomic::atomic_write;
pub use time::{format_timestamp, now_millis, truncate};
