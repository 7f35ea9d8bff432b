//! Application initialization.
//!
//! This module provides the logger setup shared by the session simulator and
//! the version bump binary. Both parse their own CLI options and then call
//! [`init_logger_with`] before doing any work, so every log line of either
//! binary goes through the same formats and filters.

mod logger;

// Re-export public API
pub use logger::init_logger_with;
