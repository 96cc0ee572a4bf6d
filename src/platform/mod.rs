//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time (epoch milliseconds)

pub mod time;

pub use time::now_ms;
