//! Tag-manager pageview tracker.
//!
//! The tracker bootstraps in two steps, mirroring how the vendor's snippet
//! works on a real page: first the command queue is seeded with the library
//! timestamp and the stream configuration, then the remote library element is
//! appended. The seeds are in the queue before the element exists, so however
//! quickly the remote script attaches, it replays them first and the pageview
//! is attributed correctly.

use std::sync::Arc;

use chrono::Utc;
use url::Url;

use crate::config::TAG_MANAGER_SCRIPT_URL;
use crate::dom::{LoadMode, Page, ScriptDescriptor};
use crate::utils::parse_url_unsafe;
use crate::vendors::queue::VendorQueue;

/// A command pushed onto the tag-manager queue (`gtag(...)` call).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagCommand {
    /// Library bootstrap timestamp (`gtag('js', new Date())`).
    Js {
        /// Milliseconds since the epoch at bootstrap time.
        at_ms: i64,
    },
    /// Stream configuration (`gtag('config', '<measurement id>')`).
    Config {
        /// The measurement ID the pageview is attributed to.
        measurement_id: String,
    },
    /// Custom event (`gtag('event', name, params)`).
    Event {
        /// Event name.
        name: String,
        /// Event parameters as key/value pairs.
        params: Vec<(String, String)>,
    },
}

/// The pageview tracker integration.
#[derive(Debug)]
pub struct TagManager {
    measurement_id: String,
    queue: Arc<VendorQueue<TagCommand>>,
}

impl TagManager {
    /// Creates a tracker for the given measurement ID. The command queue
    /// exists (and accepts pushes) from this point on.
    pub fn new(measurement_id: impl Into<String>) -> Self {
        Self {
            measurement_id: measurement_id.into(),
            queue: Arc::new(VendorQueue::new("tag manager queue")),
        }
    }

    /// The measurement ID this tracker reports to.
    pub fn measurement_id(&self) -> &str {
        &self.measurement_id
    }

    /// Shared handle to the command queue.
    pub fn queue(&self) -> Arc<VendorQueue<TagCommand>> {
        Arc::clone(&self.queue)
    }

    /// The remote library URL, with the measurement ID as the `id` query
    /// parameter.
    pub fn script_url(&self) -> Url {
        let mut url = parse_url_unsafe(TAG_MANAGER_SCRIPT_URL, "tag manager script URL");
        url.query_pairs_mut()
            .append_pair("id", &self.measurement_id);
        url
    }

    /// Queues a custom event.
    pub fn track_event(&self, name: impl Into<String>, params: Vec<(String, String)>) {
        self.queue.push(TagCommand::Event {
            name: name.into(),
            params,
        });
    }

    /// Seeds the queue and appends the remote library element.
    ///
    /// Seed order is fixed: `Js` (library timestamp) then `Config` (stream
    /// selection), the same order the vendor's own snippet produces.
    pub(crate) fn install(&self, page: &Page) {
        self.queue.push(TagCommand::Js {
            at_ms: Utc::now().timestamp_millis(),
        });
        self.queue.push(TagCommand::Config {
            measurement_id: self.measurement_id.clone(),
        });
        page.append(ScriptDescriptor::new(self.script_url(), LoadMode::Async));
        log::info!(
            "pageview tracker installed (measurement id {})",
            self.measurement_id
        );
    }
}
