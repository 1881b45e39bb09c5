//! VisitedSet: content-addressable processed-region tracking
//!
//! A region is fingerprinted by its text content plus the identity of its
//! container (tag name and class list). Once a fingerprint is recorded the
//! region is never annotated again, which also covers identical repeated
//! content re-inserted by the host page. Entries live for the page session.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

// =============================================================================
// Types
// =============================================================================

/// Counters describing visited-set traffic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitedStats {
    /// Distinct fingerprints recorded
    pub entries: usize,
    /// Total mark attempts
    pub check_count: u64,
    /// Attempts rejected as already visited
    pub skip_count: u64,
}

// =============================================================================
// VisitedSet
// =============================================================================

/// Fingerprint set over processed text regions
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: HashSet<u64>,
    check_count: u64,
    skip_count: u64,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a region. Returns true if this is the first sighting; false
    /// means the caller must skip the region.
    pub fn mark(&mut self, text: &str, tag: &str, classes: &str) -> bool {
        self.check_count += 1;
        let inserted = self.seen.insert(Self::fingerprint(text, tag, classes));
        if !inserted {
            self.skip_count += 1;
        }
        inserted
    }

    /// Check without recording
    pub fn contains(&self, text: &str, tag: &str, classes: &str) -> bool {
        self.seen.contains(&Self::fingerprint(text, tag, classes))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Drop all recorded fingerprints and counters
    pub fn reset(&mut self) {
        self.seen.clear();
        self.check_count = 0;
        self.skip_count = 0;
    }

    pub fn stats(&self) -> VisitedStats {
        VisitedStats {
            entries: self.seen.len(),
            check_count: self.check_count,
            skip_count: self.skip_count,
        }
    }

    fn fingerprint(text: &str, tag: &str, classes: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        tag.hash(&mut hasher);
        classes.hash(&mut hasher);
        hasher.finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
