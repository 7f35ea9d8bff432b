//! Error handling and session statistics.
//!
//! This module provides:
//! - Error type definitions (initialization, loader gate, version bump)
//! - Session statistics tracking (dispatch counts, suppressed triggers)

mod stats;
mod types;

// Re-export public API
pub use stats::SessionStats;
pub use types::{BumpError, GateError, InitializationError};
