//! Trigger subscriptions.
//!
//! The loader arms one listener per interaction kind per target. A
//! [`Subscription`] bundles all of those registrations behind a single
//! cancellation handle so "stop listening" is one call, whether it happens
//! because the trigger fired or because the session is being torn down.

use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

use crate::events::target::{EventTarget, ListenerId};

/// Cancellation handle over a set of listener registrations.
///
/// `cancel` is idempotent: the first call removes every remaining
/// registration and trips the token; later calls are no-ops. Registrations
/// that already removed themselves (`once` listeners that fired) are simply
/// skipped.
pub struct Subscription {
    entries: Mutex<Vec<(Arc<EventTarget>, ListenerId)>>,
    token: CancellationToken,
}

impl Subscription {
    /// Wraps a set of (target, listener) registrations.
    pub fn new(entries: Vec<(Arc<EventTarget>, ListenerId)>) -> Self {
        Self {
            entries: Mutex::new(entries),
            token: CancellationToken::new(),
        }
    }

    /// Removes every remaining registration and trips the cancellation token.
    pub fn cancel(&self) {
        if self.token.is_cancelled() {
            return;
        }
        let entries = std::mem::take(
            &mut *self
                .entries
                .lock()
                .expect("subscription entries lock poisoned"),
        );
        let mut removed = 0;
        for (target, id) in entries {
            if target.remove_listener(id) {
                removed += 1;
            }
        }
        self.token.cancel();
        log::debug!("subscription cancelled; {} listener(s) removed", removed);
    }

    /// Whether `cancel` has run.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Token observers can await to learn the subscription ended.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Registrations not yet removed (by `cancel` or by `once` delivery).
    pub fn remaining(&self) -> usize {
        self.entries
            .lock()
            .expect("subscription entries lock poisoned")
            .len()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("remaining", &self.remaining())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
