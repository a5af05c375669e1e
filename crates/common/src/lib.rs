//! Jumpcam Common Utilities
//!
//! Shared infrastructure for all jumpcam crates:
//! - Error types and result aliases
//! - Loop timing utilities (frame rate metering, periodic status ticks)
//! - Tracing/logging initialization
//! - Configuration loading and validation

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
