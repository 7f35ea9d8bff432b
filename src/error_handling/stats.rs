//! Session statistics tracking.
//!
//! This module provides thread-safe statistics tracking for interaction
//! dispatch and trigger suppression during a page session.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use crate::events::InteractionKind;

/// Thread-safe session statistics tracker.
///
/// Tracks how many interactions of each kind were dispatched and how many
/// qualifying events arrived after the trigger had already fired (and were
/// therefore suppressed by the one-shot guard). All kinds are initialized to
/// zero on creation.
///
/// # Thread Safety
///
/// This struct is thread-safe and can be shared across multiple tasks using `Arc`.
pub struct SessionStats {
    dispatched: HashMap<InteractionKind, AtomicUsize>,
    suppressed_triggers: AtomicUsize,
}

impl SessionStats {
    /// Creates a tracker with every counter at zero.
    pub fn new() -> Self {
        let mut dispatched = HashMap::new();
        for kind in InteractionKind::iter() {
            dispatched.insert(kind, AtomicUsize::new(0));
        }

        SessionStats {
            dispatched,
            suppressed_triggers: AtomicUsize::new(0),
        }
    }

    /// Increment the dispatch counter for one interaction kind.
    ///
    /// All kinds are initialized in the constructor; a missing entry indicates
    /// a bug in initialization, which is logged rather than panicked on.
    pub fn record_dispatched(&self, kind: InteractionKind) {
        if let Some(counter) = self.dispatched.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment dispatch counter for {:?} which is not in the map. \
                 This indicates a bug in SessionStats initialization.",
                kind
            );
        }
    }

    /// Get the dispatch count for one interaction kind.
    pub fn dispatched_count(&self, kind: InteractionKind) -> usize {
        self.dispatched
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or_else(|| {
                log::warn!(
                    "Interaction kind {:?} not found in stats map, returning 0. \
                     This indicates a bug in SessionStats initialization.",
                    kind
                );
                0
            })
    }

    /// Get total dispatch count across all interaction kinds.
    pub fn total_dispatched(&self) -> usize {
        InteractionKind::iter()
            .map(|k| self.dispatched_count(k))
            .sum()
    }

    /// Increment the suppressed-trigger counter (a qualifying event arrived
    /// after the one-shot trigger had already fired).
    pub fn record_suppressed_trigger(&self) {
        self.suppressed_triggers.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of qualifying events the one-shot guard swallowed.
    pub fn suppressed_triggers(&self) -> usize {
        self.suppressed_triggers.load(Ordering::SeqCst)
    }

    /// Logs a per-kind dispatch summary plus the suppression count.
    pub fn log_summary(&self) {
        let total = self.total_dispatched();
        if total == 0 {
            log::info!("no interactions dispatched this session");
            return;
        }
        log::info!("interactions dispatched: {}", total);
        for kind in InteractionKind::iter() {
            let count = self.dispatched_count(kind);
            if count > 0 {
                log::info!("  {}: {}", kind, count);
            }
        }
        let suppressed = self.suppressed_triggers();
        if suppressed > 0 {
            log::info!("duplicate trigger attempts suppressed: {}", suppressed);
        }
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}
