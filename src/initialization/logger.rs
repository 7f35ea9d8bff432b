//! Logger initialization.
//!
//! Wires `env_logger` with either a colored plain-text format or a
//! line-per-record JSON format.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use env_logger::fmt::Formatter;
use log::{LevelFilter, Record};

/// Initializes the global logger at the given level and format.
///
/// `RUST_LOG` is honored first, then the explicit `level` is applied on top,
/// so `--log-level` always wins while `RUST_LOG=script_gate=trace` style
/// per-module filters remain available for quick debugging.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` when a global logger has
/// already been installed.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug script_gate --interaction scroll
/// script_gate --interaction scroll --log-level trace --log-format json
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(true);

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    // The HTML parsing stack is noisy at debug level and its internals are
    // never what a session log is about
    builder.filter_module("html5ever", LevelFilter::Error);
    builder.filter_module("selectors", LevelFilter::Warn);
    builder.filter_module("script_gate", level);

    match format {
        LogFormat::Json => builder.format(json_format),
        LogFormat::Plain => builder.format(plain_format),
    };

    // try_init() so repeated calls (tests, embedding) report an error instead
    // of panicking
    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

/// Colored single-line format: emoji, target, level, message.
fn plain_format(buf: &mut Formatter, record: &Record) -> std::io::Result<()> {
    let level = record.level();
    let (emoji, colored_level) = match level {
        log::Level::Error => ("❌", level.to_string().red()),
        log::Level::Warn => ("⚠️", level.to_string().yellow()),
        log::Level::Info => ("✔️", level.to_string().green()),
        log::Level::Debug => ("🔍", level.to_string().blue()),
        log::Level::Trace => ("🔬", level.to_string().purple()),
    };

    writeln!(
        buf,
        "{} {} [{}] {}",
        emoji,
        record.target().cyan(),
        colored_level,
        record.args()
    )
}

/// One JSON object per line with a millisecond timestamp. Keeps session logs
/// machine-ingestable without a tracing subscriber.
fn json_format(buf: &mut Formatter, record: &Record) -> std::io::Result<()> {
    let line = serde_json::json!({
        "ts": chrono::Utc::now().timestamp_millis(),
        "level": record.level().to_string(),
        "target": record.target(),
        "msg": record.args().to_string(),
    });
    writeln!(buf, "{line}")
}
