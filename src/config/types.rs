//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_MEASUREMENT_ID, DEFAULT_PROJECT_ID, IDLE_CALLBACK_TIMEOUT_MS, IDLE_FALLBACK_DELAY_MS,
    SETTLE_TIMEOUT_SECS, SIM_IDLE_AFTER_MS,
};
use crate::events::InteractionKind;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Idle scheduling strategy for the deferred injection phase.
///
/// `Signal` models a host with a cooperative idle callback (the wait is
/// bounded by a timeout); `Fallback` models a host without one (a short
/// fixed delay is used instead).
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum IdleMode {
    /// Wait for the host's idle signal, bounded by the idle timeout
    Signal,
    /// No idle signal available; wait a short fixed delay
    Fallback,
}

/// Library configuration, also parseable from the command line.
///
/// This is the core configuration struct used by the library. It can be
/// constructed programmatically without going through the CLI.
///
/// # Examples
///
/// ```no_run
/// use script_gate::{Config, InteractionKind};
///
/// let config = Config {
///     interactions: vec![InteractionKind::Scroll, InteractionKind::Click],
///     measurement_id: "G-1234567890".to_string(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "script_gate",
    about = "Replays user interactions against an interaction-gated script loader and reports what gets injected"
)]
pub struct Config {
    /// Interaction events to replay against the page, in order (repeatable)
    #[arg(long = "interaction", value_enum, value_name = "KIND")]
    pub interactions: Vec<InteractionKind>,

    /// Measurement ID configured for the pageview tracker
    #[arg(long, env = "GTM_MEASUREMENT_ID", default_value = DEFAULT_MEASUREMENT_ID)]
    pub measurement_id: String,

    /// Project ID configured for the behavioral recorder
    #[arg(long, env = "CLARITY_PROJECT_ID", default_value = DEFAULT_PROJECT_ID)]
    pub project_id: String,

    /// Idle scheduling strategy for the deferred phase
    #[arg(long, value_enum, default_value_t = IdleMode::Signal)]
    pub idle_mode: IdleMode,

    /// Milliseconds after the last replayed event at which the simulated host
    /// raises its idle signal (signal mode only)
    #[arg(long, default_value_t = SIM_IDLE_AFTER_MS)]
    pub idle_after_ms: u64,

    /// Upper bound in milliseconds on waiting for an idle slot
    #[arg(long, default_value_t = IDLE_CALLBACK_TIMEOUT_MS)]
    pub idle_timeout_ms: u64,

    /// Fixed delay in milliseconds used when no idle signal source exists
    #[arg(long, default_value_t = IDLE_FALLBACK_DELAY_MS)]
    pub idle_fallback_ms: u64,

    /// Maximum seconds to wait for the deferred phase to settle
    #[arg(long, default_value_t = SETTLE_TIMEOUT_SECS)]
    pub settle_timeout_secs: u64,

    /// Start with a document that is still parsing; listener registration is
    /// deferred until the document becomes ready
    #[arg(long)]
    pub start_loading: bool,

    /// Print the rendered page body after the session settles
    #[arg(long)]
    pub print_html: bool,

    /// Print the full session report as JSON
    #[arg(long)]
    pub json_report: bool,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interactions: Vec::new(),
            measurement_id: DEFAULT_MEASUREMENT_ID.to_string(),
            project_id: DEFAULT_PROJECT_ID.to_string(),
            idle_mode: IdleMode::Signal,
            idle_after_ms: SIM_IDLE_AFTER_MS,
            idle_timeout_ms: IDLE_CALLBACK_TIMEOUT_MS,
            idle_fallback_ms: IDLE_FALLBACK_DELAY_MS,
            settle_timeout_secs: SETTLE_TIMEOUT_SECS,
            start_loading: false,
            print_html: false,
            json_report: false,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        // Test all LogLevel variants convert correctly to log::LevelFilter
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_log_level_ordering() {
        // Verify that log levels are ordered correctly (Error < Warn < Info < Debug < Trace)
        let error = log::LevelFilter::from(LogLevel::Error);
        let warn = log::LevelFilter::from(LogLevel::Warn);
        let info = log::LevelFilter::from(LogLevel::Info);
        let debug = log::LevelFilter::from(LogLevel::Debug);
        let trace = log::LevelFilter::from(LogLevel::Trace);

        // Each level should be more restrictive than the next
        assert!(error < warn);
        assert!(warn < info);
        assert!(info < debug);
        assert!(debug < trace);
    }

    #[test]
    fn test_log_format_variants() {
        // Test that LogFormat enum variants can be created and compared
        let plain = LogFormat::Plain;
        let json = LogFormat::Json;

        // Both should be valid variants
        match plain {
            LogFormat::Plain => {}
            LogFormat::Json => panic!("Plain should not match Json"),
        }

        match json {
            LogFormat::Plain => panic!("Json should not match Plain"),
            LogFormat::Json => {}
        }
    }

    #[test]
    fn test_idle_mode_variants() {
        // The two strategies must stay distinguishable; the loader branches on them
        assert_ne!(IdleMode::Signal, IdleMode::Fallback);
        assert_eq!(format!("{:?}", IdleMode::Signal), "Signal");
        assert_eq!(format!("{:?}", IdleMode::Fallback), "Fallback");
    }

    #[test]
    fn test_config_default() {
        // Test Config default values
        let config = Config::default();
        assert!(config.interactions.is_empty());
        assert_eq!(config.measurement_id, DEFAULT_MEASUREMENT_ID);
        assert_eq!(config.project_id, DEFAULT_PROJECT_ID);
        assert_eq!(config.idle_mode, IdleMode::Signal);
        assert_eq!(config.idle_timeout_ms, 3000);
        assert_eq!(config.idle_fallback_ms, 100);
        assert!(!config.start_loading);
        assert!(!config.print_html);
        assert!(!config.json_report);
    }
}
