//! Service worker cache version bumping.
//!
//! A service worker decides whether to refresh its caches by comparing the
//! `CACHE_VERSION` constant in its source against the one it last installed
//! with. Deploying new assets without changing that constant leaves stale
//! caches live, so the build pipeline rewrites it on every run with a value
//! derived from the build time. Millisecond precision keeps consecutive
//! builds distinct.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::{Captures, Regex};

use crate::config::CACHE_VERSION_PATTERN;
use crate::error_handling::BumpError;
use crate::utils::compile_regex_unsafe;

// The declaration as it appears in service worker source, either quote style.
// The version value stays numeric so the next build's rewrite matches again.
static CACHE_VERSION_DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(CACHE_VERSION_PATTERN, "CACHE_VERSION_PATTERN"));

/// Result of a version bump run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BumpOutcome {
    /// The service worker file that was processed.
    pub path: PathBuf,
    /// The version written into the file, or `None` when no
    /// `CACHE_VERSION` declaration was found and the file was left as-is.
    pub new_version: Option<String>,
    /// Human-readable build time the version was derived from.
    pub timestamp: String,
}

/// Rewrites the `CACHE_VERSION` declaration in the file at `path` with a
/// version derived from the current time.
///
/// Returns the outcome on success. A file without the declaration is left
/// untouched and reported with `new_version: None`; only read and write
/// failures are errors.
pub fn bump_cache_version(path: &Path) -> Result<BumpOutcome, BumpError> {
    bump_cache_version_at(path, Utc::now())
}

/// Same as [`bump_cache_version`] but with an explicit build time.
pub fn bump_cache_version_at(path: &Path, now: DateTime<Utc>) -> Result<BumpOutcome, BumpError> {
    let contents = fs::read_to_string(path).map_err(|source| BumpError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let new_version = format!("v{}", now.timestamp_millis());
    let timestamp = now.format("%Y-%m-%dT%H-%M-%S").to_string();

    let mut replaced = false;
    let updated = CACHE_VERSION_DECLARATION.replace(&contents, |caps: &Captures| {
        replaced = true;
        // Preserve whichever quote style the file already uses
        format!("const CACHE_VERSION = {quote}{new_version}{quote}", quote = &caps[1])
    });

    if !replaced {
        log::warn!(
            "no CACHE_VERSION declaration found in {}; file left unchanged",
            path.display()
        );
        return Ok(BumpOutcome {
            path: path.to_path_buf(),
            new_version: None,
            timestamp,
        });
    }

    fs::write(path, updated.as_bytes()).map_err(|source| BumpError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!(
        "cache version in {} bumped to {} (build time {})",
        path.display(),
        new_version,
        timestamp
    );

    Ok(BumpOutcome {
        path: path.to_path_buf(),
        new_version: Some(new_version),
        timestamp,
    })
}
