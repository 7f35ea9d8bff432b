//! Third-party vendor integrations.
//!
//! This module provides:
//! - [`VendorQueue`], the buffer-then-attach call queue every vendor bootstraps through
//! - The pageview tracker ([`TagManager`]) and session recorder ([`BehavioralRecorder`])
//! - The markdown library descriptor loaded immediately on trigger

mod behavioral;
mod markdown;
mod queue;
mod tag_manager;

pub use behavioral::{BehavioralRecorder, RecorderCall};
pub use markdown::markdown_url;
pub(crate) use markdown::markdown_descriptor;
pub use queue::VendorQueue;
pub use tag_manager::{TagCommand, TagManager};

/// The analytics vendors installed by the deferred phase, as one unit.
#[derive(Debug)]
pub struct VendorSet {
    /// Pageview tracker (remote element, seeded command queue).
    pub tag_manager: TagManager,
    /// Session recorder (inline bootstrap element, live call queue).
    pub recorder: BehavioralRecorder,
}

impl VendorSet {
    /// Builds both vendors from their deployment IDs.
    pub fn from_ids(measurement_id: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            tag_manager: TagManager::new(measurement_id),
            recorder: BehavioralRecorder::new(project_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_set_wires_both_ids() {
        let vendors = VendorSet::from_ids("G-1234567890", "abc123xyz");
        assert_eq!(vendors.tag_manager.measurement_id(), "G-1234567890");
        assert_eq!(vendors.recorder.project_id(), "abc123xyz");
    }
}
