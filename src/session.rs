//! A page session: window, document, page body, and readiness.
//!
//! [`Session`] owns the two event targets interactions are delivered to and
//! the page they inject into. One synthetic interaction becomes two
//! deliveries, window first and document second, matching the capture order
//! a real event would propagate in. That double delivery is why registering
//! the same handler on both targets needs the loader's one-shot guard.
//!
//! Sessions also model document readiness: work handed to [`Session::on_ready`]
//! while the document is still parsing is parked and runs when
//! [`Session::finish_loading`] fires, the way init code waits for
//! `DOMContentLoaded`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::dom::Page;
use crate::error_handling::SessionStats;
use crate::events::{EventTarget, InteractionEvent, InteractionKind};

type ReadyCallback = Box<dyn FnOnce(&Session) + Send>;

/// One simulated page load.
pub struct Session {
    window: Arc<EventTarget>,
    document: Arc<EventTarget>,
    page: Arc<Page>,
    stats: Arc<SessionStats>,
    ready: AtomicBool,
    pending_ready: Mutex<Vec<ReadyCallback>>,
}

impl Session {
    /// Creates a session whose document is already ready (the common case:
    /// scripts at the end of the body run after parsing).
    pub fn new() -> Self {
        Self::with_readiness(true)
    }

    /// Creates a session whose document is still parsing; `on_ready` work is
    /// parked until [`Session::finish_loading`].
    pub fn new_loading() -> Self {
        Self::with_readiness(false)
    }

    fn with_readiness(ready: bool) -> Self {
        Self {
            window: Arc::new(EventTarget::new("window")),
            document: Arc::new(EventTarget::new("document")),
            page: Arc::new(Page::new()),
            stats: Arc::new(SessionStats::new()),
            ready: AtomicBool::new(ready),
            pending_ready: Mutex::new(Vec::new()),
        }
    }

    /// The window target.
    pub fn window(&self) -> &Arc<EventTarget> {
        &self.window
    }

    /// The document target.
    pub fn document(&self) -> &Arc<EventTarget> {
        &self.document
    }

    /// The page body injections land in.
    pub fn page(&self) -> &Arc<Page> {
        &self.page
    }

    /// Session statistics.
    pub fn stats(&self) -> &Arc<SessionStats> {
        &self.stats
    }

    /// Whether the document is still parsing.
    pub fn is_loading(&self) -> bool {
        !self.ready.load(Ordering::SeqCst)
    }

    /// Runs `callback` now if the document is ready, otherwise parks it until
    /// [`Session::finish_loading`].
    pub fn on_ready<F>(&self, callback: F)
    where
        F: FnOnce(&Session) + Send + 'static,
    {
        if self.is_loading() {
            self.pending_ready
                .lock()
                .expect("pending ready lock poisoned")
                .push(Box::new(callback));
            log::debug!("document still loading; callback parked until ready");
        } else {
            callback(self);
        }
    }

    /// Marks the document ready and runs parked callbacks in registration
    /// order. Calling this on an already-ready session is a no-op.
    pub fn finish_loading(&self) {
        if self
            .ready
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            log::debug!("finish_loading on a ready session; nothing to do");
            return;
        }
        let parked = std::mem::take(
            &mut *self
                .pending_ready
                .lock()
                .expect("pending ready lock poisoned"),
        );
        log::info!(
            "document ready; running {} parked callback(s)",
            parked.len()
        );
        for callback in parked {
            callback(self);
        }
    }

    /// Delivers one synthetic interaction to the window and then the
    /// document, and records it in the stats. Returns the number of handlers
    /// invoked across both targets.
    pub fn dispatch(&self, kind: InteractionKind) -> usize {
        self.stats.record_dispatched(kind);
        let event = InteractionEvent::new(kind);
        let invoked = self.window.dispatch(&event) + self.document.dispatch(&event);
        log::trace!(
            "session: dispatched '{}' ({} handler(s) invoked)",
            kind,
            invoked
        );
        invoked
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("loading", &self.is_loading())
            .field("window_listeners", &self.window.listener_count())
            .field("document_listeners", &self.document.listener_count())
            .field("scripts", &self.page.script_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ListenerOptions;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_dispatch_reaches_window_then_document() {
        let session = Session::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let o = Arc::clone(&order);
        session
            .window()
            .add_listener(InteractionKind::Scroll, ListenerOptions::default(), move |_| {
                o.lock().unwrap().push("window");
            });
        let o = Arc::clone(&order);
        session
            .document()
            .add_listener(InteractionKind::Scroll, ListenerOptions::default(), move |_| {
                o.lock().unwrap().push("document");
            });

        assert_eq!(session.dispatch(InteractionKind::Scroll), 2);
        assert_eq!(*order.lock().unwrap(), vec!["window", "document"]);
    }

    #[test]
    fn test_dispatch_records_stats_even_with_no_listeners() {
        let session = Session::new();
        assert_eq!(session.dispatch(InteractionKind::KeyDown), 0);
        assert_eq!(session.stats().dispatched_count(InteractionKind::KeyDown), 1);
    }

    #[test]
    fn test_on_ready_runs_immediately_when_ready() {
        let session = Session::new();
        let ran = Arc::new(AtomicBool::new(false));
        let r = Arc::clone(&ran);
        session.on_ready(move |_| r.store(true, Ordering::SeqCst));
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn test_on_ready_parks_until_finish_loading() {
        let session = Session::new_loading();
        assert!(session.is_loading());

        let runs = Arc::new(AtomicUsize::new(0));
        let r = Arc::clone(&runs);
        session.on_ready(move |_| {
            r.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        session.finish_loading();
        assert!(!session.is_loading());
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        // A second finish_loading must not rerun callbacks
        session.finish_loading();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_parked_callbacks_run_in_registration_order() {
        let session = Session::new_loading();
        let order = Arc::new(Mutex::new(Vec::new()));
        for label in ["a", "b", "c"] {
            let o = Arc::clone(&order);
            session.on_ready(move |_| o.lock().unwrap().push(label));
        }
        session.finish_loading();
        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ready_callback_can_register_listeners() {
        // The loader's deferred arming path: its on_ready callback registers
        // listeners through the &Session it receives
        let session = Session::new_loading();
        session.on_ready(|s| {
            s.window()
                .add_listener(InteractionKind::Click, ListenerOptions::default(), |_| {});
        });
        assert_eq!(session.window().listener_count(), 0);
        session.finish_loading();
        assert_eq!(session.window().listener_count(), 1);
    }
}
