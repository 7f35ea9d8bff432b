//! Idle-time scheduling for the deferred injection phase.
//!
//! Browsers offer two ways to run work "when the page is quiet": a
//! cooperative idle callback whose wait is bounded by a timeout, and a plain
//! short timer for hosts that have no idle machinery at all. [`IdleScheduler`]
//! models both so the loader can promise the same thing either way: analytics
//! injection happens after the triggering interaction's own work, and no
//! later than a fixed bound.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

use crate::config::{IDLE_CALLBACK_TIMEOUT, IDLE_FALLBACK_DELAY};

/// Strategy for waiting out the gap between trigger and deferred injection.
#[derive(Debug)]
pub enum IdleScheduler {
    /// Wait for the host's idle signal, but no longer than `timeout`.
    Signal {
        /// Raised by the host (via [`IdleHandle`]) when the page goes quiet.
        notify: Arc<Notify>,
        /// Upper bound on the wait.
        timeout: Duration,
    },
    /// No idle source; wait a fixed `delay` and proceed.
    Fallback {
        /// The fixed delay.
        delay: Duration,
    },
}

/// How an idle wait resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleOutcome {
    /// The host signalled idle before the timeout.
    Signalled,
    /// The timeout elapsed first; injection proceeds anyway.
    TimedOut,
    /// The fixed fallback delay elapsed.
    FixedDelay,
}

impl IdleOutcome {
    /// Returns a human-readable string representation of the outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            IdleOutcome::Signalled => "idle signal",
            IdleOutcome::TimedOut => "idle timeout",
            IdleOutcome::FixedDelay => "fixed delay",
        }
    }
}

impl std::fmt::Display for IdleOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle the host uses to raise the idle signal.
///
/// Signalling before the wait starts is fine: the permit is stored and the
/// wait resolves immediately.
#[derive(Debug, Clone)]
pub struct IdleHandle {
    notify: Arc<Notify>,
}

impl IdleHandle {
    /// Reports that the page has gone quiet.
    pub fn signal_idle(&self) {
        self.notify.notify_one();
    }
}

impl IdleScheduler {
    /// Signal-based scheduler with the production timeout.
    pub fn signal() -> Self {
        Self::signal_with_timeout(IDLE_CALLBACK_TIMEOUT)
    }

    /// Signal-based scheduler with an explicit timeout (tests use short ones).
    pub fn signal_with_timeout(timeout: Duration) -> Self {
        IdleScheduler::Signal {
            notify: Arc::new(Notify::new()),
            timeout,
        }
    }

    /// Fallback scheduler with the production delay.
    pub fn fallback() -> Self {
        Self::fallback_with_delay(IDLE_FALLBACK_DELAY)
    }

    /// Fallback scheduler with an explicit delay.
    pub fn fallback_with_delay(delay: Duration) -> Self {
        IdleScheduler::Fallback { delay }
    }

    /// Handle for raising the idle signal; `None` in fallback mode, which has
    /// nothing to signal.
    pub fn idle_handle(&self) -> Option<IdleHandle> {
        match self {
            IdleScheduler::Signal { notify, .. } => Some(IdleHandle {
                notify: Arc::clone(notify),
            }),
            IdleScheduler::Fallback { .. } => None,
        }
    }

    /// Waits until the deferred phase should run and reports which path
    /// resolved the wait.
    pub async fn wait(&self) -> IdleOutcome {
        match self {
            IdleScheduler::Signal { notify, timeout } => {
                tokio::select! {
                    _ = notify.notified() => IdleOutcome::Signalled,
                    _ = tokio::time::sleep(*timeout) => IdleOutcome::TimedOut,
                }
            }
            IdleScheduler::Fallback { delay } => {
                tokio::time::sleep(*delay).await;
                IdleOutcome::FixedDelay
            }
        }
    }
}
