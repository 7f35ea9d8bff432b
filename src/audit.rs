//! Vendor tag extraction from rendered page HTML.
//!
//! The loader's output is a page body; this module reads one back. It parses
//! the HTML, walks the script elements, and identifies which vendors are
//! present and under which IDs. This is the check a deployment runs to
//! confirm the right analytics landed on the right stream.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::utils::{compile_regex_unsafe, parse_selector_unsafe};

/// A vendor identified in rendered HTML.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct VendorTag {
    /// Vendor name (e.g., "Google Analytics 4", "Microsoft Clarity")
    pub provider: String,
    /// The deployment ID (e.g., "G-XXXXXXXXXX", a Clarity project ID)
    pub id: String,
}

static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("script", "SCRIPT_SELECTOR"));

// Tracker library element: gtag/js?id=G-XXXXXXXXXX in a script src
static TRACKER_SRC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"(?i)gtag/js\?id=(G-[A-Z0-9]+)", "TRACKER_SRC_PATTERN"));

// Tracker config call: gtag('config', 'G-XXXXXXXXXX') in inline script text
static TRACKER_CONFIG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(
        r#"(?i)gtag\s*\(\s*['"]config['"]\s*,\s*['"](G-[A-Z0-9]+)['"]"#,
        "TRACKER_CONFIG_PATTERN",
    )
});

// Recorder bootstrap snippet: the ("clarity", "script", "<id>") argument triple
static RECORDER_SNIPPET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(
        r#"['"]clarity['"]\s*,\s*['"]script['"]\s*,\s*['"]([A-Za-z0-9]+)['"]"#,
        "RECORDER_SNIPPET_PATTERN",
    )
});

// Recorder tag element: clarity.ms/tag/<id> in a script src
static RECORDER_SRC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(r"(?i)clarity\.ms/tag/([A-Za-z0-9]+)", "RECORDER_SRC_PATTERN")
});

// Markdown rendering library, minified or not
static MARKDOWN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"(?i)\bmarked(?:\.min)?\.js\b", "MARKDOWN_PATTERN"));

/// Extracts vendor tags from rendered HTML.
///
/// Only script elements are inspected: remote sources by their `src`
/// attribute, inline scripts by their text. An ID appearing through several
/// patterns (e.g. a recorder ID in both the snippet and an attached tag
/// element) is reported once, in first-seen order.
pub fn extract_vendor_tags(html: &str) -> Vec<VendorTag> {
    let document = Html::parse_fragment(html);
    let mut tags = Vec::new();
    let mut seen = HashSet::<(String, String)>::new();

    for element in document.select(&SCRIPT_SELECTOR) {
        if let Some(src) = element.value().attr("src") {
            collect_ids(&TRACKER_SRC_PATTERN, src, "Google Analytics 4", &mut seen, &mut tags);
            collect_ids(&RECORDER_SRC_PATTERN, src, "Microsoft Clarity", &mut seen, &mut tags);
        }
        let text: String = element.text().collect();
        if !text.is_empty() {
            collect_ids(
                &TRACKER_CONFIG_PATTERN,
                &text,
                "Google Analytics 4",
                &mut seen,
                &mut tags,
            );
            collect_ids(
                &RECORDER_SNIPPET_PATTERN,
                &text,
                "Microsoft Clarity",
                &mut seen,
                &mut tags,
            );
            // Snippets embed the tag URL too; catches truncated or reformatted ones
            collect_ids(&RECORDER_SRC_PATTERN, &text, "Microsoft Clarity", &mut seen, &mut tags);
        }
    }

    tags
}

/// Whether the markdown rendering library is present as a remote script.
pub fn has_markdown_library(html: &str) -> bool {
    let document = Html::parse_fragment(html);
    document.select(&SCRIPT_SELECTOR).any(|element| {
        element
            .value()
            .attr("src")
            .map(|src| MARKDOWN_PATTERN.is_match(src))
            .unwrap_or(false)
    })
}

fn collect_ids(
    pattern: &Regex,
    haystack: &str,
    provider: &str,
    seen: &mut HashSet<(String, String)>,
    tags: &mut Vec<VendorTag>,
) {
    for cap in pattern.captures_iter(haystack) {
        if let Some(id) = cap.get(1) {
            let key = (provider.to_string(), id.as_str().to_string());
            if seen.insert(key.clone()) {
                tags.push(VendorTag {
                    provider: key.0,
                    id: key.1,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_tracker_id_from_script_src() {
        let html = r#"<script src="https://www.googletagmanager.com/gtag/js?id=G-AB12CD34EF" async></script>"#;
        let tags = extract_vendor_tags(html);
        assert_eq!(
            tags,
            vec![VendorTag {
                provider: "Google Analytics 4".to_string(),
                id: "G-AB12CD34EF".to_string()
            }]
        );
    }

    #[test]
    fn test_extracts_tracker_id_from_inline_config_call() {
        let html = r#"<script>window.dataLayer = window.dataLayer || [];
gtag('js', new Date());
gtag('config', 'G-AB12CD34EF');</script>"#;
        let tags = extract_vendor_tags(html);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].id, "G-AB12CD34EF");
    }

    #[test]
    fn test_extracts_recorder_id_from_bootstrap_snippet() {
        let recorder = crate::vendors::BehavioralRecorder::new("ab12cd34ef");
        let html = format!("<script>{}</script>", recorder.bootstrap_snippet());
        let tags = extract_vendor_tags(&html);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].provider, "Microsoft Clarity");
        assert_eq!(tags[0].id, "ab12cd34ef");
    }

    #[test]
    fn test_extracts_recorder_id_from_tag_src() {
        let html = r#"<script src="https://www.clarity.ms/tag/ab12cd34ef" async></script>"#;
        let tags = extract_vendor_tags(html);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].id, "ab12cd34ef");
    }

    #[test]
    fn test_same_id_via_multiple_patterns_reported_once() {
        // Snippet plus already-attached tag element: one vendor, one report
        let html = r#"<script>(function(){})(window, document, "clarity", "script", "ab12cd34ef");</script>
<script src="https://www.clarity.ms/tag/ab12cd34ef" async></script>"#;
        let tags = extract_vendor_tags(html);
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn test_ids_outside_script_elements_are_ignored() {
        let html = r#"<p>Our tracking id is G-AB12CD34EF and gtag('config', 'G-AB12CD34EF')</p>"#;
        assert!(extract_vendor_tags(html).is_empty());
    }

    #[test]
    fn test_markdown_library_detection() {
        let with = r#"<script src="https://cdn.jsdelivr.net/npm/marked/marked.min.js" async></script>"#;
        let without = r#"<script src="https://cdn.example.com/other.js"></script>
<script>let marked = "marked.min.js mentioned inline";</script>"#;
        assert!(has_markdown_library(with));
        // Inline mentions don't count; only a remote source does
        assert!(!has_markdown_library(without));
    }

    #[test]
    fn test_empty_body_yields_nothing() {
        assert!(extract_vendor_tags("").is_empty());
        assert!(!has_markdown_library(""));
    }

    #[test]
    fn test_full_session_body_reports_both_vendors() {
        // A body shaped exactly like a settled session's render
        let html = r#"<script src="https://cdn.jsdelivr.net/npm/marked/marked.min.js" async></script>
<script src="https://www.googletagmanager.com/gtag/js?id=G-TESTTEST01" async></script>
<script>(function(c,l,a,r,i,t,y){c[a]=c[a]||function(){(c[a].q=c[a].q||[]).push(arguments)};t=l.createElement(r);t.async=1;t.src="https://www.clarity.ms/tag/"+i;y=l.getElementsByTagName(r)[0];y.parentNode.insertBefore(t,y);})(window, document, "clarity", "script", "testproj01");</script>"#;

        let tags = extract_vendor_tags(html);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].provider, "Google Analytics 4");
        assert_eq!(tags[0].id, "G-TESTTEST01");
        assert_eq!(tags[1].provider, "Microsoft Clarity");
        assert_eq!(tags[1].id, "testproj01");
        assert!(has_markdown_library(html));
    }
}
