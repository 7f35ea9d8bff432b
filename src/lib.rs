//! script_gate library: interaction-gated deferred script loading
//!
//! This library defers third-party script injection until a page's first user
//! interaction. A gate arms one-shot listeners for the qualifying interaction
//! kinds on both the window and the document; the first event to fire wins,
//! tears down every listener, injects the markdown rendering library
//! immediately, and schedules the analytics vendors (pageview tracker and
//! behavioral session recorder) behind an idle callback so they never compete
//! with content work.
//!
//! # Example
//!
//! ```no_run
//! use script_gate::{run_session, Config, InteractionKind};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     interactions: vec![InteractionKind::Scroll, InteractionKind::Click],
//!     measurement_id: "G-AB12CD34EF".to_string(),
//!     ..Default::default()
//! };
//!
//! let report = run_session(config).await?;
//! println!("phase {}: {} remote and {} inline script(s) injected",
//!          report.phase, report.remote_scripts, report.inline_scripts);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

pub mod audit;
mod bump;
pub mod config;
pub mod dom;
mod error_handling;
pub mod events;
mod idle;
pub mod initialization;
mod loader;
mod session;
mod utils;
pub mod vendors;

// Re-export public API
pub use bump::{bump_cache_version, bump_cache_version_at, BumpOutcome};
pub use config::{Config, IdleMode, LogFormat, LogLevel};
pub use error_handling::{BumpError, GateError, InitializationError, SessionStats};
pub use events::{InteractionEvent, InteractionKind, Subscription};
pub use idle::{IdleHandle, IdleOutcome, IdleScheduler};
pub use loader::{LoadState, LoaderPhase, ScriptGate};
pub use run::{run_session, SessionReport};
pub use session::Session;

// Internal run module (contains the session simulation logic)
mod run {
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::Result;
    use log::{debug, info, warn};

    use crate::audit::{extract_vendor_tags, has_markdown_library, VendorTag};
    use crate::config::{Config, IdleMode};
    use crate::events::InteractionKind;
    use crate::idle::IdleScheduler;
    use crate::loader::{LoaderPhase, ScriptGate};
    use crate::session::Session;
    use crate::vendors::{markdown_url, VendorSet};

    /// Results of a simulated page session.
    ///
    /// Contains the gate's final state and a summary of what was injected.
    #[derive(Debug, Clone, serde::Serialize)]
    pub struct SessionReport {
        /// The gate's phase when the session settled
        pub phase: LoaderPhase,
        /// The interaction kind that won the trigger, if any fired
        pub triggered_by: Option<InteractionKind>,
        /// Total interaction events dispatched across window and document
        pub events_dispatched: usize,
        /// Events that reached a listener after the gate had already fired
        pub suppressed_triggers: usize,
        /// Remote script elements present in the page body
        pub remote_scripts: usize,
        /// Inline script elements present in the page body
        pub inline_scripts: usize,
        /// Vendors identified by auditing the rendered body
        pub vendor_tags: Vec<VendorTag>,
        /// Whether the markdown rendering library was injected
        pub markdown_present: bool,
        /// The rendered page body
        pub body_html: String,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    /// Runs a simulated page session with the provided configuration.
    ///
    /// This is the main entry point for the library. It builds a page session,
    /// arms the gate over it, replays the configured interaction sequence, and
    /// waits for the deferred phase to settle before auditing the result.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the session (interaction sequence,
    ///   vendor IDs, idle scheduling, timeouts)
    ///
    /// # Returns
    ///
    /// Returns a `SessionReport` describing the gate's final phase and the
    /// scripts it injected, or an error if the session failed to complete.
    ///
    /// # Errors
    ///
    /// This function will return an error if the gate cannot be initialized
    /// over the session.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use script_gate::{run_session, Config, InteractionKind};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = Config {
    ///     interactions: vec![InteractionKind::PointerMove],
    ///     ..Default::default()
    /// };
    /// let report = run_session(config).await?;
    /// println!("triggered by {:?}", report.triggered_by);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_session(config: Config) -> Result<SessionReport> {
        let start_time = std::time::Instant::now();

        let session = if config.start_loading {
            Session::new_loading()
        } else {
            Session::new()
        };

        let vendors = VendorSet::from_ids(
            config.measurement_id.as_str(),
            config.project_id.as_str(),
        );

        let idle = match config.idle_mode {
            IdleMode::Signal => {
                IdleScheduler::signal_with_timeout(Duration::from_millis(config.idle_timeout_ms))
            }
            IdleMode::Fallback => {
                IdleScheduler::fallback_with_delay(Duration::from_millis(config.idle_fallback_ms))
            }
        };
        let idle_handle = idle.idle_handle();

        let gate = ScriptGate::new(
            Arc::clone(session.page()),
            vendors,
            idle,
            Arc::clone(session.stats()),
        );
        gate.initialize(&session)?;

        if session.is_loading() {
            info!("page is still loading; listener registration is deferred until load completes");
            session.finish_loading();
        }

        // The browser would fire the idle callback once the main thread
        // quiets down; the simulation signals it on a timer instead.
        if let Some(handle) = idle_handle {
            let after = Duration::from_millis(config.idle_after_ms);
            tokio::spawn(async move {
                tokio::time::sleep(after).await;
                handle.signal_idle();
            });
        }

        if config.interactions.is_empty() {
            info!("no interactions scripted; the gate will stay in its waiting phase");
        }
        for kind in &config.interactions {
            let delivered = session.dispatch(*kind);
            debug!("dispatched '{}' to {} listener(s)", kind, delivered);
        }

        let settle_timeout = Duration::from_secs(config.settle_timeout_secs);
        if tokio::time::timeout(settle_timeout, gate.settle())
            .await
            .is_err()
        {
            warn!(
                "deferred phase did not settle within {}s; reporting current state",
                config.settle_timeout_secs
            );
        }

        if gate.phase() != LoaderPhase::Waiting && session.page().complete_load(&markdown_url()) {
            debug!("markdown library finished loading");
        }

        session.stats().log_summary();

        let body_html = session.page().render_body();
        let vendor_tags = extract_vendor_tags(&body_html);
        let markdown_present = has_markdown_library(&body_html);

        let scripts = session.page().scripts();
        let remote_scripts = scripts.iter().filter(|s| s.is_remote()).count();
        let inline_scripts = scripts.iter().filter(|s| s.is_inline()).count();

        let elapsed_seconds = start_time.elapsed().as_secs_f64();

        Ok(SessionReport {
            phase: gate.phase(),
            triggered_by: gate.triggered_by(),
            events_dispatched: session.stats().total_dispatched(),
            suppressed_triggers: session.stats().suppressed_triggers(),
            remote_scripts,
            inline_scripts,
            vendor_tags,
            markdown_present,
            body_html,
            elapsed_seconds,
        })
    }
}
