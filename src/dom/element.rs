//! Script elements and injection descriptors.

use url::Url;

/// How the host page fetches and executes an injected script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum LoadMode {
    /// Fetched in parallel with parsing, executed whenever ready.
    /// Everything this loader injects is async: nothing injected after the
    /// first interaction may block the page.
    Async,
    /// Fetched and executed in document order.
    Sync,
}

/// A script element recorded in the page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptElement {
    /// Remote script referenced by URL.
    Remote {
        /// Source URL.
        src: Url,
        /// Async or sync execution.
        mode: LoadMode,
    },
    /// Inline script carrying its source text.
    Inline {
        /// The script body.
        text: String,
    },
}

impl ScriptElement {
    /// Whether this element references a remote source.
    pub fn is_remote(&self) -> bool {
        matches!(self, ScriptElement::Remote { .. })
    }

    /// Whether this element carries inline source text.
    pub fn is_inline(&self) -> bool {
        matches!(self, ScriptElement::Inline { .. })
    }

    /// The remote source URL, if any.
    pub fn src(&self) -> Option<&Url> {
        match self {
            ScriptElement::Remote { src, .. } => Some(src),
            ScriptElement::Inline { .. } => None,
        }
    }

    /// Renders the element as a `<script>` tag.
    pub fn to_html(&self) -> String {
        match self {
            ScriptElement::Remote {
                src,
                mode: LoadMode::Async,
            } => format!(r#"<script src="{}" async></script>"#, src),
            ScriptElement::Remote {
                src,
                mode: LoadMode::Sync,
            } => format!(r#"<script src="{}"></script>"#, src),
            ScriptElement::Inline { text } => format!("<script>{}</script>", text),
        }
    }
}

/// An injection request: everything needed to append one remote script.
///
/// Descriptors are ephemeral; [`Page::append`] consumes them at injection time.
/// The optional completion callback models the element's `onload` hook and
/// fires when the host later reports the fetch finished; injection itself
/// never waits on it.
///
/// [`Page::append`]: crate::dom::Page::append
pub struct ScriptDescriptor {
    pub(crate) src: Url,
    pub(crate) mode: LoadMode,
    pub(crate) on_load: Option<Box<dyn FnOnce() + Send>>,
}

impl ScriptDescriptor {
    /// Describes a remote script with no completion callback.
    pub fn new(src: Url, mode: LoadMode) -> Self {
        Self {
            src,
            mode,
            on_load: None,
        }
    }

    /// Attaches a completion callback, replacing any previous one.
    pub fn with_on_load<F>(mut self, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_load = Some(Box::new(callback));
        self
    }

    /// The source URL this descriptor will inject.
    pub fn src(&self) -> &Url {
        &self.src
    }

    /// The load mode this descriptor will inject with.
    pub fn mode(&self) -> LoadMode {
        self.mode
    }
}

impl std::fmt::Debug for ScriptDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptDescriptor")
            .field("src", &self.src.as_str())
            .field("mode", &self.mode)
            .field("on_load", &self.on_load.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_remote_async_renders_async_attribute() {
        let element = ScriptElement::Remote {
            src: url("https://cdn.example.com/lib.js"),
            mode: LoadMode::Async,
        };
        assert_eq!(
            element.to_html(),
            r#"<script src="https://cdn.example.com/lib.js" async></script>"#
        );
    }

    #[test]
    fn test_remote_sync_renders_without_async_attribute() {
        let element = ScriptElement::Remote {
            src: url("https://cdn.example.com/lib.js"),
            mode: LoadMode::Sync,
        };
        assert_eq!(
            element.to_html(),
            r#"<script src="https://cdn.example.com/lib.js"></script>"#
        );
    }

    #[test]
    fn test_inline_renders_text_verbatim() {
        let element = ScriptElement::Inline {
            text: "window.x = 1;".to_string(),
        };
        assert_eq!(element.to_html(), "<script>window.x = 1;</script>");
        assert!(element.is_inline());
        assert!(element.src().is_none());
    }

    #[test]
    fn test_descriptor_builder() {
        let descriptor = ScriptDescriptor::new(url("https://cdn.example.com/lib.js"), LoadMode::Async)
            .with_on_load(|| {});
        assert_eq!(descriptor.src().as_str(), "https://cdn.example.com/lib.js");
        assert_eq!(descriptor.mode(), LoadMode::Async);
        assert!(format!("{:?}", descriptor).contains("on_load: true"));
    }
}
