//! Catalog store interface.
//!
//! This module defines the contract every catalog backend implements. The
//! scanner and the library coordinator talk to storage only through
//! [`CatalogStore`], so the durable SQLite catalog and the in-memory one are
//! interchangeable.
//!
//! ## Contract
//!
//! - Entries are keyed by `path`. An upsert for a known path rewrites
//!   `filename`, `size`, `modified_at` and `indexed_at`, and keeps `id` and
//!   `created_at` from the first insert.
//! - `indexed_at` is the wall-clock time of the write and never decreases for
//!   a given entry.
//! - Listings are ordered by `filename` (byte order, so case-sensitive), ties
//!   broken by insertion order.
//! - `close` is idempotent. Any other call after `close` fails with a
//!   storage error.

use crate::error::Result;
use crate::search::SearchQuery;
use crate::types::{CatalogEntry, ScannedFile};
use std::cmp::Ordering;

/// A durable or volatile table of catalog entries keyed by path.
///
/// Implementations must be `Send + Sync`; callers still serialize mutations
/// (one scan in flight at a time).
pub trait CatalogStore: Send + Sync {
    /// Insert a new entry or refresh the one with the same path.
    fn upsert(&self, file: &ScannedFile) -> Result<()>;

    /// Look up a single entry by its exact path.
    fn get(&self, path: &str) -> Result<Option<CatalogEntry>>;

    /// All entries, ordered by filename then insertion order.
    fn list_all(&self) -> Result<Vec<CatalogEntry>>;

    /// Entries whose filename contains `query`, ignoring case.
    ///
    /// An empty query returns the same result as [`CatalogStore::list_all`].
    fn search(&self, query: &str) -> Result<Vec<CatalogEntry>> {
        Ok(SearchQuery::substring(query).filter(self.list_all()?))
    }

    /// Remove the entry with this exact path. Absent paths are not an error.
    fn delete(&self, path: &str) -> Result<()>;

    /// Remove every entry.
    fn clear(&self) -> Result<()>;

    /// Number of stored entries.
    fn count(&self) -> Result<usize>;

    /// Release the underlying resources. Safe to call more than once.
    fn close(&self) -> Result<()>;

    /// Backend name for logs and status output
    fn name(&self) -> &'static str;
}

/// Listing order shared by all backends.
pub(crate) fn listing_order(a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
    a.filename.cmp(&b.filename).then(a.id.cmp(&b.id))
}
