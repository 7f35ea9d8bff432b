//! The interaction-gated script loader.
//!
//! Nothing third-party loads at page load. The gate arms one `once` listener
//! per interaction kind on both the window and the document; the first
//! qualifying event wins the trigger, injects the markdown library
//! immediately, and schedules the analytics vendors for the next idle slot.
//! The winning handler sweeps away every other registration, and any handler
//! already snapshotted for delivery at that moment hits the set-once guard
//! and is counted, not acted on.
//!
//! # Requirements
//!
//! Trigger handlers spawn the deferred phase with `tokio::spawn`, so
//! interactions must be dispatched from within a Tokio runtime.

mod state;

#[cfg(test)]
mod tests;

pub use state::{LoadState, LoaderPhase};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use strum::IntoEnumIterator;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::dom::Page;
use crate::error_handling::{GateError, SessionStats};
use crate::events::{
    InteractionEvent, InteractionKind, ListenerOptions, Subscription,
};
use crate::idle::IdleScheduler;
use crate::session::Session;
use crate::vendors::{markdown_descriptor, VendorSet};

/// The loader gate: owns the state machine, the vendors, and the idle
/// scheduler, and wires them to a session's event targets.
///
/// Cloning is cheap and shares the same gate.
#[derive(Clone)]
pub struct ScriptGate {
    inner: Arc<GateInner>,
}

struct GateInner {
    state: LoadState,
    page: Arc<Page>,
    vendors: VendorSet,
    idle: IdleScheduler,
    stats: Arc<SessionStats>,
    initialized: AtomicBool,
    subscription: Mutex<Option<Subscription>>,
    deferred: Mutex<Option<JoinHandle<()>>>,
}

impl ScriptGate {
    /// Creates an unarmed gate over the given page, vendors, and idle
    /// scheduler.
    pub fn new(
        page: Arc<Page>,
        vendors: VendorSet,
        idle: IdleScheduler,
        stats: Arc<SessionStats>,
    ) -> Self {
        Self {
            inner: Arc::new(GateInner {
                state: LoadState::new(),
                page,
                vendors,
                idle,
                stats,
                initialized: AtomicBool::new(false),
                subscription: Mutex::new(None),
                deferred: Mutex::new(None),
            }),
        }
    }

    /// Arms the trigger: registers a `once` listener for every interaction
    /// kind on the session's window and document.
    ///
    /// On a still-loading session, registration is parked until the document
    /// becomes ready; events dispatched before then reach no listeners and
    /// cannot trigger anything.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::AlreadyInitialized`] on any call after the first;
    /// the second call registers nothing.
    pub fn initialize(&self, session: &Session) -> Result<(), GateError> {
        if self
            .inner
            .initialized
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(GateError::AlreadyInitialized);
        }
        if session.is_loading() {
            log::info!("document still loading; deferring trigger arming until ready");
            let inner = Arc::clone(&self.inner);
            session.on_ready(move |ready_session| GateInner::arm(&inner, ready_session));
        } else {
            GateInner::arm(&self.inner, session);
        }
        Ok(())
    }

    /// Current loader phase.
    pub fn phase(&self) -> LoaderPhase {
        self.inner.state.phase()
    }

    /// The interaction kind that fired the trigger, once one has.
    pub fn triggered_by(&self) -> Option<InteractionKind> {
        self.inner.state.triggered_by()
    }

    /// Receiver for awaiting phase changes (e.g. `Loaded`).
    pub fn subscribe_phase(&self) -> watch::Receiver<LoaderPhase> {
        self.inner.state.subscribe()
    }

    /// The vendors this gate installs.
    pub fn vendors(&self) -> &VendorSet {
        &self.inner.vendors
    }

    /// Awaits the deferred phase, if the trigger has spawned one. Idempotent:
    /// the task handle is consumed, so later calls return immediately.
    pub async fn settle(&self) {
        let handle = self
            .inner
            .deferred
            .lock()
            .expect("deferred task lock poisoned")
            .take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                log::error!("deferred phase task failed: {}", e);
            }
        }
    }
}

impl std::fmt::Debug for ScriptGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptGate")
            .field("phase", &self.phase())
            .field(
                "initialized",
                &self.inner.initialized.load(Ordering::SeqCst),
            )
            .finish()
    }
}

impl GateInner {
    /// Registers the trigger listeners (5 kinds x 2 targets) and parks the
    /// subscription for the post-trigger sweep.
    ///
    /// Handlers capture the gate weakly: a dropped gate leaves inert
    /// listeners, not a cycle through the session's targets.
    fn arm(inner: &Arc<GateInner>, session: &Session) {
        let mut entries = Vec::new();
        for kind in InteractionKind::iter() {
            for target in [session.window(), session.document()] {
                let weak = Arc::downgrade(inner);
                let id = target.add_listener(
                    kind,
                    ListenerOptions::passive_capture_once(),
                    move |event| {
                        if let Some(inner) = weak.upgrade() {
                            GateInner::on_interaction(&inner, event);
                        }
                    },
                );
                entries.push((Arc::clone(target), id));
            }
        }
        *inner
            .subscription
            .lock()
            .expect("subscription lock poisoned") = Some(Subscription::new(entries));
        log::info!("waiting for user interaction before loading deferred scripts");
    }

    /// Trigger handler. First qualifying event wins; the rest are counted.
    fn on_interaction(inner: &Arc<GateInner>, event: &InteractionEvent) {
        if !inner.state.try_trigger(event.kind) {
            inner.stats.record_suppressed_trigger();
            log::debug!(
                "'{}' arrived after the trigger already fired; ignored",
                event.kind
            );
            return;
        }
        log::info!(
            "user interaction detected ('{}'); loading deferred scripts",
            event.kind
        );

        // The fired listener removed itself (`once`); the subscription sweep
        // removes the other nine registrations
        if let Some(subscription) = inner
            .subscription
            .lock()
            .expect("subscription lock poisoned")
            .take()
        {
            subscription.cancel();
        }

        // Immediate phase: the markdown library, synchronously with the
        // trigger so the chat widget can render replies as soon as possible
        inner.page.append(markdown_descriptor());

        // Deferred phase: both analytics vendors, off the interaction path
        let deferred = Arc::clone(inner);
        let handle = tokio::spawn(async move {
            let outcome = deferred.idle.wait().await;
            log::debug!("deferred phase starting ({})", outcome);
            deferred.vendors.tag_manager.install(&deferred.page);
            deferred.vendors.recorder.install(&deferred.page);
            deferred.state.mark_loaded();
            log::info!("deferred scripts loaded");
        });
        *inner.deferred.lock().expect("deferred task lock poisoned") = Some(handle);
    }
}
