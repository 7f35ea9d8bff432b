//! Configuration constants.
//!
//! This module defines all configuration constants used throughout the application,
//! including timing defaults, vendor endpoints, and the service worker versioning
//! parameters.

use std::time::Duration;

// Deferred-phase timing
/// Upper bound in milliseconds on waiting for an idle slot before the
/// analytics scripts are injected anyway.
/// Matches the `requestIdleCallback` timeout browsers are given for this
/// pattern: 3s is long enough to stay out of the way of post-interaction
/// work (scrolling, input handling) but short enough that a busy page
/// still gets its analytics within a few seconds of the first interaction.
pub const IDLE_CALLBACK_TIMEOUT_MS: u64 = 3000;
/// Fixed delay in milliseconds used when the host provides no idle signal
/// at all (the `setTimeout` fallback path).
/// Kept deliberately short: without idle information there is nothing to
/// wait for beyond letting the triggering event's own handlers finish.
pub const IDLE_FALLBACK_DELAY_MS: u64 = 100;
/// Default ceiling on waiting for the deferred phase to settle after the
/// trigger fired. The deferred phase normally completes within the idle
/// timeout plus scheduling noise; anything past this indicates a stalled
/// host and is reported rather than awaited forever.
pub const SETTLE_TIMEOUT_SECS: u64 = 10;

// Vendor endpoints
/// Tag manager loader base URL; the stream is selected via the `id`
/// query parameter.
pub const TAG_MANAGER_SCRIPT_URL: &str = "https://www.googletagmanager.com/gtag/js";
/// Behavioral analytics tag base URL; the project ID is appended as the
/// final path segment by the inline bootstrap snippet.
pub const BEHAVIORAL_TAG_URL: &str = "https://www.clarity.ms/tag/";
/// CDN URL for the markdown rendering library loaded immediately on the
/// first interaction (the chat widget depends on it).
pub const MARKDOWN_CDN_URL: &str = "https://cdn.jsdelivr.net/npm/marked/marked.min.js";

// Vendor identifiers (used as defaults)
/// Placeholder measurement ID for the pageview tracker.
/// Real deployments override this via `--measurement-id` or the
/// `GTM_MEASUREMENT_ID` environment variable.
pub const DEFAULT_MEASUREMENT_ID: &str = "G-XXXXXXXXXX";
/// Placeholder project ID for the behavioral recorder.
/// Real deployments override this via `--project-id` or the
/// `CLARITY_PROJECT_ID` environment variable.
pub const DEFAULT_PROJECT_ID: &str = "0000000000";

// Service worker versioning
/// Default path of the service worker source file rewritten at deploy time.
pub const SW_DEFAULT_PATH: &str = "sw.js";
/// Pattern matched (and rewritten) by the cache version bump.
/// Accepts either quote style and captures it so the rewrite preserves it;
/// only the first occurrence is rewritten, mirroring how the constant
/// appears exactly once at the top of the service worker source.
pub const CACHE_VERSION_PATTERN: &str = r#"const CACHE_VERSION = (['"])v\d+['"]"#;

// Simulator timing
/// How long after the last replayed interaction the simulated host raises
/// its idle signal. Small but non-zero so the deferred phase observably
/// starts in the idle-wait state first.
pub const SIM_IDLE_AFTER_MS: u64 = 25;

/// Upper bound on waiting for an idle slot, as a [`Duration`].
pub const IDLE_CALLBACK_TIMEOUT: Duration = Duration::from_millis(IDLE_CALLBACK_TIMEOUT_MS);
/// Fixed fallback delay, as a [`Duration`].
pub const IDLE_FALLBACK_DELAY: Duration = Duration::from_millis(IDLE_FALLBACK_DELAY_MS);
