//! Error type definitions.
//!
//! This module defines all error types used throughout the application.

use std::path::PathBuf;

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Error types for loader gate operations.
#[derive(Error, Debug)]
pub enum GateError {
    /// `initialize` was called on a gate that already registered its
    /// listeners. The trigger is one-shot per page load; a second
    /// registration pass would double-deliver events to the guard.
    #[error("loader already initialized; trigger listeners are registered once per page load")]
    AlreadyInitialized,
}

/// Error types for the service worker version bump.
#[derive(Error, Debug)]
pub enum BumpError {
    /// The service worker source could not be read.
    #[error("failed to read service worker file {}: {source}", path.display())]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The rewritten service worker source could not be written back.
    #[error("failed to write service worker file {}: {source}", path.display())]
    Write {
        /// Path that failed to write.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_error_message_names_the_invariant() {
        let message = GateError::AlreadyInitialized.to_string();
        assert!(message.contains("already initialized"));
        assert!(message.contains("once per page load"));
    }

    #[test]
    fn test_bump_error_messages_include_path() {
        let read = BumpError::Read {
            path: PathBuf::from("sw.js"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(read.to_string().contains("sw.js"));
        assert!(read.to_string().starts_with("failed to read"));

        let write = BumpError::Write {
            path: PathBuf::from("out/sw.js"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(write.to_string().contains("out/sw.js"));
        assert!(write.to_string().starts_with("failed to write"));
    }
}
