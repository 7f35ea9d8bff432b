//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `script_gate` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use script_gate::initialization::init_logger_with;
use script_gate::{run_session, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // This allows setting GTM_MEASUREMENT_ID / CLARITY_PROJECT_ID in .env
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        // If .env not found in current dir, try next to the executable
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    // Parse command-line arguments into Config
    let config = Config::parse();

    // Initialize logger based on config
    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    let print_html = config.print_html;
    let json_report = config.json_report;

    // Run the session using the library
    match run_session(config).await {
        Ok(report) => {
            // Print user-friendly summary
            println!(
                "✅ Dispatched {} event{} - gate {} ({} remote, {} inline script{}) in {:.2}s",
                report.events_dispatched,
                if report.events_dispatched == 1 { "" } else { "s" },
                report.phase,
                report.remote_scripts,
                report.inline_scripts,
                if report.inline_scripts == 1 { "" } else { "s" },
                report.elapsed_seconds
            );
            if let Some(kind) = report.triggered_by {
                println!("Triggered by '{}' ({} duplicate trigger(s) suppressed)", kind, report.suppressed_triggers);
            }
            for tag in &report.vendor_tags {
                println!("  {} ({})", tag.provider, tag.id);
            }

            if json_report {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report)
                        .context("Failed to serialize session report")?
                );
            } else if print_html {
                println!("{}", report.body_html);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("script_gate error: {:#}", e);
            process::exit(1);
        }
    }
}
