//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timing defaults, vendor endpoints, etc.)
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, IdleMode, LogFormat, LogLevel};
