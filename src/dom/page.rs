//! The headless page body.
//!
//! [`Page`] is the sink every injection lands in: an append-only list of
//! script elements plus the completion callbacks still waiting on the host.
//! There is no removal and no reordering: the body only ever grows, and it
//! grows in injection order, so tests and audits can read the injection
//! history straight out of the rendered HTML.

use std::sync::Mutex;

use url::Url;

use crate::dom::element::{ScriptDescriptor, ScriptElement};

type LoadCallback = Box<dyn FnOnce() + Send>;

/// Append-only script body with host-driven load completion.
pub struct Page {
    body: Mutex<Vec<ScriptElement>>,
    pending_loads: Mutex<Vec<(Url, LoadCallback)>>,
}

impl Page {
    /// Creates an empty page.
    pub fn new() -> Self {
        Self {
            body: Mutex::new(Vec::new()),
            pending_loads: Mutex::new(Vec::new()),
        }
    }

    /// Appends a remote script element.
    ///
    /// The descriptor's completion callback (if any) is parked until the host
    /// calls [`Page::complete_load`] for the same URL. Injection returns as
    /// soon as the element is recorded; it never waits for the fetch.
    pub fn append(&self, descriptor: ScriptDescriptor) {
        let ScriptDescriptor { src, mode, on_load } = descriptor;
        log::debug!("page: appending remote script {}", src);
        self.body
            .lock()
            .expect("page body lock poisoned")
            .push(ScriptElement::Remote {
                src: src.clone(),
                mode,
            });
        if let Some(callback) = on_load {
            self.pending_loads
                .lock()
                .expect("pending loads lock poisoned")
                .push((src, callback));
        }
    }

    /// Appends an inline script element.
    pub fn append_inline(&self, text: impl Into<String>) {
        let text = text.into();
        log::debug!("page: appending inline script ({} bytes)", text.len());
        self.body
            .lock()
            .expect("page body lock poisoned")
            .push(ScriptElement::Inline { text });
    }

    /// Host hook: reports that the fetch for `src` finished, firing the oldest
    /// matching completion callback. Returns false when no callback was
    /// waiting on that URL.
    pub fn complete_load(&self, src: &Url) -> bool {
        let callback = {
            let mut pending = self
                .pending_loads
                .lock()
                .expect("pending loads lock poisoned");
            match pending.iter().position(|(url, _)| url == src) {
                Some(index) => Some(pending.remove(index).1),
                None => None,
            }
        };
        match callback {
            Some(callback) => {
                log::debug!("page: load completed for {}", src);
                callback();
                true
            }
            None => {
                log::trace!("page: no pending load for {}", src);
                false
            }
        }
    }

    /// Snapshot of the body in injection order.
    pub fn scripts(&self) -> Vec<ScriptElement> {
        self.body.lock().expect("page body lock poisoned").clone()
    }

    /// Number of script elements in the body.
    pub fn script_count(&self) -> usize {
        self.body.lock().expect("page body lock poisoned").len()
    }

    /// Completion callbacks still waiting on the host.
    pub fn pending_load_count(&self) -> usize {
        self.pending_loads
            .lock()
            .expect("pending loads lock poisoned")
            .len()
    }

    /// Renders the body as HTML, one element per line, in injection order.
    pub fn render_body(&self) -> String {
        self.body
            .lock()
            .expect("page body lock poisoned")
            .iter()
            .map(ScriptElement::to_html)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("scripts", &self.script_count())
            .field("pending_loads", &self.pending_load_count())
            .finish()
    }
}
