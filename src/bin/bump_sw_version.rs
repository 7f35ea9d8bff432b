//! Service worker version bump (CLI binary).
//!
//! Build-time companion to the loader: rewrites the `CACHE_VERSION` constant
//! in a service worker source file with a value derived from the build time,
//! so deployed clients discard stale caches on their next visit. Intended to
//! run as a pre-deploy step.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use script_gate::config::SW_DEFAULT_PATH;
use script_gate::initialization::init_logger_with;
use script_gate::{bump_cache_version, LogFormat, LogLevel};

/// Command-line options for the version bump tool.
#[derive(Debug, Parser)]
#[command(
    name = "bump_sw_version",
    about = "Rewrites the CACHE_VERSION constant in a service worker file with a build-time value"
)]
struct BumpOpts {
    /// Path to the service worker source file
    #[arg(default_value = SW_DEFAULT_PATH, value_name = "FILE")]
    path: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let opts = BumpOpts::parse();

    init_logger_with(opts.log_level.clone().into(), opts.log_format.clone())
        .context("Failed to initialize logger")?;

    match bump_cache_version(&opts.path) {
        Ok(outcome) => {
            match outcome.new_version {
                Some(version) => println!(
                    "✅ {} now carries cache version {} (build time {})",
                    outcome.path.display(),
                    version,
                    outcome.timestamp
                ),
                None => println!(
                    "⚠️ No CACHE_VERSION declaration in {}; nothing to bump",
                    outcome.path.display()
                ),
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("bump_sw_version error: {:#}", e);
            process::exit(1);
        }
    }
}
