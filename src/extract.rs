//! Regex-based tag scanner for raw HTML.
//!
//! Deliberately not a DOM parser: a tag is whatever sits between an opening
//! `<input` or `<textarea` and the first `>` after it, exactly as written.
//! A real HTML parser would normalize malformed markup and change what gets
//! matched; the whole point of this layer is predictable behavior on raw
//! bytes. Matching is case-sensitive to the literal tag names.

use regex::Regex;

/// Scans response bodies for `<input …>` / `<textarea …>` tags.
///
/// The pattern is compiled once at construction and the extractor is shared
/// across all workers.
pub struct TagExtractor {
    tag_re: Regex,
    hidden_only: bool,
}

impl TagExtractor {
    /// Build an extractor. With `hidden_only` set, the output is restricted
    /// to tags carrying `type="hidden"` (or the single-quoted variant).
    pub fn new(hidden_only: bool) -> Self {
        // [^>]* stops at the first closing bracket; an attribute value
        // containing '>' cuts the match short.
        let tag_re = Regex::new(r"<input[^>]*>|<textarea[^>]*>").expect("tag pattern compiles");
        Self { tag_re, hidden_only }
    }

    /// All matching tags in first-appearance order. Empty when none match.
    pub fn extract<'a>(&self, body: &'a str) -> Vec<&'a str> {
        self.tag_re
            .find_iter(body)
            .map(|m| m.as_str())
            .filter(|tag| !self.hidden_only || is_hidden(tag))
            .collect()
    }
}

fn is_hidden(tag: &str) -> bool {
    tag.contains(r#"type="hidden""#) || tag.contains("type='hidden'")
}
