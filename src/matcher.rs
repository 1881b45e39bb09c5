//! OrcidMatcher - ORCID identifier detection via Regex
//!
//! Recognizes the grouped 16-digit ORCID iD (`0000-0002-1825-0097`, last
//! character may be the checksum letter X) in arbitrary text, with optional
//! URL dressing around it:
//! - scheme: `http://` / `https://`
//! - host prefixes: `www.`, `sandbox.`
//! - host: `orcid.org/`
//! - path segments: `orcid/`, `id/`
//!
//! Matching is case-insensitive and side-effect free.

use regex::Regex;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// ==================== TYPE DEFINITIONS ====================

/// A single identifier match in a text run
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct IdentifierMatch {
    /// Byte offset of the raw match start
    pub start: usize,
    /// Byte offset one past the raw match end
    pub end: usize,
    /// The raw matched substring, URL dressing included
    pub matched_text: String,
    /// The normalized identifier: grouped digits, checksum letter uppercased
    pub identifier: String,
}

// ==================== MAIN IMPLEMENTATION ====================

/// OrcidMatcher - identifier pattern detector
///
/// Patterns are compiled once at construction; `scan` is O(n) over the text.
#[wasm_bindgen]
pub struct OrcidMatcher {
    id_re: Regex,
    href_re: Regex,
}

#[wasm_bindgen]
impl OrcidMatcher {
    /// Create a new OrcidMatcher with all patterns compiled
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        // Group 1 captures the bare identifier; everything before it is
        // optional URL dressing.
        let id_re = Regex::new(
            r"(?i)(?:(?:https?://)?(?:www\.)?(?:sandbox\.)?orcid\.org/)?(?:orcid/)?(?:id/)?(\d{4}-\d{4}-\d{4}-\d{3}[\dX])",
        )
        .unwrap();

        // Identifier inside an orcid.org href, wherever it sits in the path
        let href_re = Regex::new(r"(?i)orcid\.org/(\d{4}-\d{4}-\d{4}-\d{3}[\dX])").unwrap();

        Self { id_re, href_re }
    }

    /// Scan text and return all matches as a JS array
    #[wasm_bindgen(js_name = scan)]
    pub fn js_scan(&self, text: &str) -> Result<JsValue, JsValue> {
        let matches = self.find_all(text);
        serde_wasm_bindgen::to_value(&matches)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Quick check whether text contains any identifier
    #[wasm_bindgen(js_name = contains)]
    pub fn contains(&self, text: &str) -> bool {
        self.id_re.is_match(text)
    }
}

impl OrcidMatcher {
    /// Find every identifier occurrence, left to right
    pub fn find_all(&self, text: &str) -> Vec<IdentifierMatch> {
        self.id_re
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let id = caps.get(1)?;
                Some(IdentifierMatch {
                    start: whole.start(),
                    end: whole.end(),
                    matched_text: whole.as_str().to_string(),
                    identifier: normalize(id.as_str()),
                })
            })
            .collect()
    }

    /// Extract the identifier from an `orcid.org/<id>` link target
    pub fn id_from_href(&self, href: &str) -> Option<String> {
        self.href_re
            .captures(href)
            .and_then(|caps| caps.get(1))
            .map(|id| normalize(id.as_str()))
    }
}

impl Default for OrcidMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Uppercase the trailing checksum letter; digits pass through unchanged
fn normalize(raw: &str) -> String {
    raw.to_ascii_uppercase()
}

// The matcher is immutable after construction; one shared instance per
// (single-threaded) WASM context avoids recompiling patterns per scan.
thread_local! {
    static MATCHER: OrcidMatcher = OrcidMatcher::new();
}

/// Run a closure against the shared matcher instance
pub fn with_matcher<R>(f: impl FnOnce(&OrcidMatcher) -> R) -> R {
    MATCHER.with(f)
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_identifier() {
        let m = OrcidMatcher::new();
        let matches = m.find_all("0000-0002-1825-0097");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].identifier, "0000-0002-1825-0097");
        assert_eq!(matches[0].matched_text, "0000-0002-1825-0097");
    }

    #[test]
    fn test_prefix_variants_extract_same_identifier() {
        let m = OrcidMatcher::new();
        let variants = [
            "0000-0002-1825-0097",
            "orcid.org/0000-0002-1825-0097",
            "www.orcid.org/0000-0002-1825-0097",
            "http://orcid.org/0000-0002-1825-0097",
            "https://orcid.org/0000-0002-1825-0097",
            "https://www.orcid.org/0000-0002-1825-0097",
            "https://sandbox.orcid.org/0000-0002-1825-0097",
            "https://orcid.org/orcid/0000-0002-1825-0097",
            "https://orcid.org/id/0000-0002-1825-0097",
            "HTTPS://ORCID.ORG/0000-0002-1825-0097",
        ];
        for v in variants {
            let matches = m.find_all(v);
            assert_eq!(matches.len(), 1, "no match for {}", v);
            assert_eq!(matches[0].identifier, "0000-0002-1825-0097", "bad id for {}", v);
            assert_eq!(matches[0].matched_text, *v);
        }
    }

    #[test]
    fn test_checksum_letter_case_insensitive() {
        let m = OrcidMatcher::new();
        let upper = m.find_all("0000-0002-1694-233X");
        let lower = m.find_all("0000-0002-1694-233x");
        assert_eq!(upper.len(), 1);
        assert_eq!(lower.len(), 1);
        assert_eq!(upper[0].identifier, "0000-0002-1694-233X");
        assert_eq!(lower[0].identifier, "0000-0002-1694-233X");
    }

    #[test]
    fn test_match_inside_surrounding_text() {
        let m = OrcidMatcher::new();
        let text = "Contact: 0000-0002-1825-0097 for details";
        let matches = m.find_all(text);
        assert_eq!(matches.len(), 1);
        let mat = &matches[0];
        assert_eq!(&text[..mat.start], "Contact: ");
        assert_eq!(&text[mat.end..], " for details");
        assert_eq!(mat.matched_text, "0000-0002-1825-0097");
    }

    #[test]
    fn test_multiple_matches_left_to_right() {
        let m = OrcidMatcher::new();
        let text = "A: 0000-0002-1825-0097, B: https://orcid.org/0000-0002-1694-233X.";
        let matches = m.find_all(text);
        assert_eq!(matches.len(), 2);
        assert!(matches[0].start < matches[1].start);
        assert_eq!(matches[0].identifier, "0000-0002-1825-0097");
        assert_eq!(matches[1].identifier, "0000-0002-1694-233X");
    }

    #[test]
    fn test_non_matching_text() {
        let m = OrcidMatcher::new();
        assert!(m.find_all("no identifiers here").is_empty());
        assert!(m.find_all("1234-5678").is_empty());
        assert!(m.find_all("0000-0002-1825-009").is_empty());
        assert!(!m.contains("plain prose"));
    }

    #[test]
    fn test_contains_predicate() {
        let m = OrcidMatcher::new();
        assert!(m.contains("see orcid.org/0000-0002-1825-0097"));
        assert!(!m.contains("see orcid.org"));
    }

    #[test]
    fn test_id_from_href() {
        let m = OrcidMatcher::new();
        assert_eq!(
            m.id_from_href("https://orcid.org/0000-0002-1825-0097"),
            Some("0000-0002-1825-0097".to_string())
        );
        assert_eq!(
            m.id_from_href("http://www.orcid.org/0000-0002-1694-233x"),
            Some("0000-0002-1694-233X".to_string())
        );
        assert_eq!(m.id_from_href("https://example.org/profile"), None);
        assert_eq!(m.id_from_href("https://orcid.org/"), None);
    }
}
