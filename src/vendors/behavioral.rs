//! Behavioral analytics session recorder.
//!
//! This vendor ships as an inline bootstrap snippet rather than a remote
//! element: the snippet defines the queueing placeholder function and then
//! creates the remote tag itself when a browser executes it. The headless
//! page therefore receives exactly one inline element for this vendor, and
//! the recorder's call queue lives on from construction so calls made before
//! (or instead of) script execution are never lost.

use std::sync::Arc;

use crate::config::BEHAVIORAL_TAG_URL;
use crate::dom::Page;
use crate::vendors::queue::VendorQueue;

/// One recorded call to the vendor's placeholder function.
///
/// The real function takes arbitrary arguments (`clarity("set", key, value)`,
/// `clarity("identify", ...)`); only their textual form matters to the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderCall {
    /// The call's arguments, in order.
    pub args: Vec<String>,
}

impl RecorderCall {
    /// Builds a call from anything yielding string-ish arguments.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// The session recorder integration.
#[derive(Debug)]
pub struct BehavioralRecorder {
    project_id: String,
    queue: Arc<VendorQueue<RecorderCall>>,
}

impl BehavioralRecorder {
    /// Creates a recorder for the given project ID. The call queue exists
    /// (and accepts pushes) from this point on.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            queue: Arc::new(VendorQueue::new("behavioral recorder queue")),
        }
    }

    /// The project ID sessions are recorded under.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Shared handle to the call queue.
    pub fn queue(&self) -> Arc<VendorQueue<RecorderCall>> {
        Arc::clone(&self.queue)
    }

    /// Queues a call to the recorder.
    pub fn track(&self, call: RecorderCall) {
        self.queue.push(call);
    }

    /// The inline bootstrap snippet, parameterized by the project ID.
    ///
    /// Its shape matters to the audit: the final argument triple
    /// `"clarity", "script", "<project id>"` is what identifies the vendor in
    /// rendered HTML.
    pub fn bootstrap_snippet(&self) -> String {
        format!(
            concat!(
                "(function(c,l,a,r,i,t,y){{",
                "c[a]=c[a]||function(){{(c[a].q=c[a].q||[]).push(arguments)}};",
                "t=l.createElement(r);t.async=1;t.src=\"{base}\"+i;",
                "y=l.getElementsByTagName(r)[0];y.parentNode.insertBefore(t,y);",
                "}})(window, document, \"clarity\", \"script\", \"{id}\");"
            ),
            base = BEHAVIORAL_TAG_URL,
            id = self.project_id
        )
    }

    /// Appends the inline bootstrap element.
    pub(crate) fn install(&self, page: &Page) {
        page.append_inline(self.bootstrap_snippet());
        log::info!(
            "behavioral recorder installed (project id {})",
            self.project_id
        );
    }
}
