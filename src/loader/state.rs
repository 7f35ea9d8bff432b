//! Loader state machine.
//!
//! Three phases, strictly forward: `Waiting` until the first qualifying
//! interaction, `Triggered` while the deferred phase is pending, `Loaded`
//! once both analytics vendors are installed. The trigger itself is an
//! atomic compare-exchange: ten listeners race toward it (five kinds on two
//! targets, plus window/document double delivery of the same event) and
//! exactly one wins.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use tokio::sync::watch;

use crate::events::InteractionKind;

/// Where the loader is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderPhase {
    /// Armed; no qualifying interaction yet. Zero injections have happened.
    Waiting,
    /// Trigger fired; immediate injection done, deferred phase pending.
    Triggered,
    /// Deferred phase complete; every injection this loader will ever make
    /// has been made.
    Loaded,
}

impl LoaderPhase {
    /// Returns a human-readable string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            LoaderPhase::Waiting => "waiting",
            LoaderPhase::Triggered => "triggered",
            LoaderPhase::Loaded => "loaded",
        }
    }
}

impl std::fmt::Display for LoaderPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set-once trigger flag plus an observable phase.
///
/// `try_trigger` is the only entry to `Triggered` and succeeds exactly once
/// per state; everything that must happen "on first interaction only" hangs
/// off that success. The phase is published through a `watch` channel so
/// callers can await `Loaded` instead of polling.
#[derive(Debug)]
pub struct LoadState {
    triggered: AtomicBool,
    triggered_by: OnceLock<InteractionKind>,
    phase_tx: watch::Sender<LoaderPhase>,
}

impl LoadState {
    /// Creates a state in `Waiting`.
    pub fn new() -> Self {
        Self {
            triggered: AtomicBool::new(false),
            triggered_by: OnceLock::new(),
            phase_tx: watch::Sender::new(LoaderPhase::Waiting),
        }
    }

    /// Attempts to fire the one-shot trigger, recording the winning kind.
    /// Returns true exactly once; every later call (any kind) returns false.
    pub fn try_trigger(&self, kind: InteractionKind) -> bool {
        if self
            .triggered
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            let _ = self.triggered_by.set(kind);
            self.phase_tx.send_replace(LoaderPhase::Triggered);
            true
        } else {
            false
        }
    }

    /// Advances `Triggered` to `Loaded`. Ignored (with a warning) if the
    /// trigger never fired; there is no path to `Loaded` that skips it.
    pub fn mark_loaded(&self) {
        if self.triggered.load(Ordering::SeqCst) {
            self.phase_tx.send_replace(LoaderPhase::Loaded);
        } else {
            log::warn!("mark_loaded called before the trigger fired; ignored");
        }
    }

    /// Current phase.
    pub fn phase(&self) -> LoaderPhase {
        *self.phase_tx.borrow()
    }

    /// Receiver for awaiting phase changes.
    pub fn subscribe(&self) -> watch::Receiver<LoaderPhase> {
        self.phase_tx.subscribe()
    }

    /// Whether the trigger has fired.
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Whether the deferred phase has completed.
    pub fn is_loaded(&self) -> bool {
        self.phase() == LoaderPhase::Loaded
    }

    /// The interaction kind that won the trigger, once one has.
    pub fn triggered_by(&self) -> Option<InteractionKind> {
        self.triggered_by.get().copied()
    }
}

impl Default for LoadState {
    fn default() -> Self {
        Self::new()
    }
}
