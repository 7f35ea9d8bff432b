//! Markdown rendering library.
//!
//! Loaded immediately on the first interaction (not idle-deferred): the chat
//! widget renders assistant replies as markdown, and a user who has started
//! interacting may open it at any moment.

use url::Url;

use crate::config::MARKDOWN_CDN_URL;
use crate::dom::{LoadMode, ScriptDescriptor};
use crate::utils::parse_url_unsafe;

/// The library's CDN URL.
pub fn markdown_url() -> Url {
    parse_url_unsafe(MARKDOWN_CDN_URL, "markdown CDN URL")
}

/// Injection descriptor for the library: async, with a readiness log on
/// completion.
pub(crate) fn markdown_descriptor() -> ScriptDescriptor {
    ScriptDescriptor::new(markdown_url(), LoadMode::Async)
        .with_on_load(|| log::debug!("markdown renderer loaded and ready"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_targets_cdn_async() {
        let descriptor = markdown_descriptor();
        assert_eq!(descriptor.src().as_str(), MARKDOWN_CDN_URL);
        assert_eq!(descriptor.mode(), LoadMode::Async);
    }

    #[test]
    fn test_markdown_url_parses() {
        assert_eq!(markdown_url().host_str(), Some("cdn.jsdelivr.net"));
    }
}
