//! Utility Module
//!
//! - [`time`]: frame timing

pub mod time;

pub use time::FrameClock;
