//! Filename search over catalog entries.
//!
//! The catalog supports one query shape: a case-insensitive substring match
//! on the entry's filename. Both stores filter through [`SearchQuery`] so the
//! case folding is the same regardless of backend (SQLite's `LIKE` only
//! folds ASCII).

use crate::types::CatalogEntry;

/// A compiled filename query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pattern_lower: String,
}

impl SearchQuery {
    /// Create a substring search query (case-insensitive).
    ///
    /// # Example
    /// ```
    /// use capturelib_core::SearchQuery;
    /// let query = SearchQuery::substring("stage");
    /// assert!(query.matches_name("Stage1.c2o"));
    /// ```
    pub fn substring(pattern: &str) -> Self {
        SearchQuery {
            pattern_lower: pattern.to_lowercase(),
        }
    }

    /// Returns true if the query matches every entry
    pub fn matches_all(&self) -> bool {
        self.pattern_lower.is_empty()
    }

    /// Check a bare filename against the query.
    pub fn matches_name(&self, name: &str) -> bool {
        if self.matches_all() {
            return true;
        }
        name.to_lowercase().contains(&self.pattern_lower)
    }

    /// Check an entry against the query.
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        self.matches_name(&entry.filename)
    }

    /// Keep the entries that match, preserving their order.
    pub fn filter(&self, entries: Vec<CatalogEntry>) -> Vec<CatalogEntry> {
        if self.matches_all() {
            return entries;
        }
        entries.into_iter().filter(|e| self.matches(e)).collect()
    }
}
