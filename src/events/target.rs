//! Dispatchable event targets.
//!
//! A [`EventTarget`] models one node interactions are delivered to (the window
//! or the document). Listener registration follows DOM semantics: each
//! registration carries `passive`/`capture`/`once` options, and `once`
//! registrations are removed before their handler runs so a handler can never
//! observe itself still registered.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::events::kinds::{InteractionEvent, InteractionKind};

/// Options attached to a listener registration.
///
/// `passive` promises the handler never blocks default handling (the loader's
/// handlers only flip state and enqueue work), `capture` delivers during the
/// capture phase so the trigger sees the event before page handlers can stop
/// it, and `once` removes the registration after its first delivery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Handler will not block default handling.
    pub passive: bool,
    /// Deliver during the capture phase.
    pub capture: bool,
    /// Remove the registration after the first delivery.
    pub once: bool,
}

impl ListenerOptions {
    /// The option set the loader registers its trigger listeners with.
    pub fn passive_capture_once() -> Self {
        Self {
            passive: true,
            capture: true,
            once: true,
        }
    }
}

/// Opaque identifier for one listener registration on one target.
pub type ListenerId = u64;

type Handler = Arc<dyn Fn(&InteractionEvent) + Send + Sync>;

struct Registration {
    id: ListenerId,
    kind: InteractionKind,
    options: ListenerOptions,
    handler: Handler,
}

/// One node interactions are delivered to.
///
/// Dispatch snapshots the matching handlers and releases the registry lock
/// before invoking them, so handlers may re-enter the target (register or
/// remove listeners, even on themselves) without deadlocking.
pub struct EventTarget {
    name: &'static str,
    next_id: AtomicU64,
    listeners: Mutex<Vec<Registration>>,
}

impl EventTarget {
    /// Creates an empty target. `name` only labels log lines.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            next_id: AtomicU64::new(1),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// The label this target logs under ("window", "document").
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Registers a handler for one interaction kind and returns its id.
    pub fn add_listener<F>(
        &self,
        kind: InteractionKind,
        options: ListenerOptions,
        handler: F,
    ) -> ListenerId
    where
        F: Fn(&InteractionEvent) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let registration = Registration {
            id,
            kind,
            options,
            handler: Arc::new(handler),
        };
        self.listeners
            .lock()
            .expect("listener registry lock poisoned")
            .push(registration);
        log::trace!(
            "{}: listener {} registered for '{}' (passive={}, capture={}, once={})",
            self.name,
            id,
            kind,
            options.passive,
            options.capture,
            options.once
        );
        id
    }

    /// Removes a registration by id. Returns false when the id is unknown,
    /// e.g. a `once` listener that already fired.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self
            .listeners
            .lock()
            .expect("listener registry lock poisoned");
        let before = listeners.len();
        listeners.retain(|r| r.id != id);
        let removed = listeners.len() < before;
        if removed {
            log::trace!("{}: listener {} removed", self.name, id);
        }
        removed
    }

    /// Number of live registrations across all kinds.
    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .expect("listener registry lock poisoned")
            .len()
    }

    /// Delivers an event to every listener registered for its kind, in
    /// registration order. Returns the number of handlers invoked.
    ///
    /// `once` registrations are removed before their handler runs, matching
    /// DOM `addEventListener` semantics.
    pub fn dispatch(&self, event: &InteractionEvent) -> usize {
        let matched: Vec<Handler> = {
            let mut listeners = self
                .listeners
                .lock()
                .expect("listener registry lock poisoned");
            let handlers: Vec<Handler> = listeners
                .iter()
                .filter(|r| r.kind == event.kind)
                .map(|r| Arc::clone(&r.handler))
                .collect();
            listeners.retain(|r| r.kind != event.kind || !r.options.once);
            handlers
        };
        if !matched.is_empty() {
            log::trace!(
                "{}: dispatching '{}' to {} listener(s)",
                self.name,
                event.kind,
                matched.len()
            );
        }
        for handler in &matched {
            handler(event);
        }
        matched.len()
    }
}

impl std::fmt::Debug for EventTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventTarget")
            .field("name", &self.name)
            .field("listeners", &self.listener_count())
            .finish()
    }
}
