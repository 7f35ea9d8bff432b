//! Parsing helpers for static patterns.
//!
//! Regexes, CSS selectors, and vendor URLs used by this crate are string
//! constants; failing to parse one is a programming error, not a runtime
//! condition. These helpers centralize the panic-with-context idiom so call
//! sites stay one-liners inside `LazyLock` initializers.

use regex::Regex;
use scraper::Selector;
use url::Url;

/// Compiles a regex pattern that must succeed (for compile-time constants).
///
/// # Panics
///
/// Panics if the pattern cannot be compiled (indicates a programming error).
pub(crate) fn compile_regex_unsafe(pattern: &str, context: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern '{}' in {}: {}. This is a programming error.",
            pattern, context, e
        )
    })
}

/// Parses a CSS selector that must succeed (for compile-time constants).
///
/// # Panics
///
/// Panics if the selector cannot be parsed (indicates a programming error).
pub(crate) fn parse_selector_unsafe(selector_str: &str, context: &str) -> Selector {
    Selector::parse(selector_str).unwrap_or_else(|e| {
        panic!(
            "Failed to parse CSS selector '{}' in {}: {}. This is a programming error.",
            selector_str, context, e
        )
    })
}

/// Parses a URL that must succeed (for compile-time constants).
///
/// # Panics
///
/// Panics if the URL cannot be parsed (indicates a programming error).
pub(crate) fn parse_url_unsafe(url_str: &str, context: &str) -> Url {
    Url::parse(url_str).unwrap_or_else(|e| {
        panic!(
            "Failed to parse URL '{}' in {}: {}. This is a programming error.",
            url_str, context, e
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_regex_unsafe_with_valid_pattern() {
        let re = compile_regex_unsafe(r"v\d+", "test");
        assert!(re.is_match("v1756000000000"));
    }

    #[test]
    #[should_panic(expected = "programming error")]
    fn test_compile_regex_unsafe_panics_on_invalid_pattern() {
        compile_regex_unsafe(r"(unclosed", "test");
    }

    #[test]
    fn test_parse_selector_unsafe_with_valid_selector() {
        let selector = parse_selector_unsafe("script[src]", "test");
        let html = scraper::Html::parse_fragment(r#"<script src="https://a/b.js"></script>"#);
        assert_eq!(html.select(&selector).count(), 1);
    }

    #[test]
    #[should_panic(expected = "programming error")]
    fn test_parse_selector_unsafe_panics_on_invalid_selector() {
        parse_selector_unsafe("script[", "test");
    }

    #[test]
    fn test_parse_url_unsafe_with_valid_url() {
        let url = parse_url_unsafe("https://www.clarity.ms/tag/", "test");
        assert_eq!(url.host_str(), Some("www.clarity.ms"));
    }

    #[test]
    #[should_panic(expected = "programming error")]
    fn test_parse_url_unsafe_panics_on_invalid_url() {
        parse_url_unsafe("not a url", "test");
    }
}
