//! Volatile catalog store.
//!
//! Same contract as the SQLite catalog, kept in a map behind a lock. Useful
//! for tests and for callers that want a throwaway catalog.

use crate::error::{CatalogError, Result};
use crate::store::{listing_order, CatalogStore};
use crate::types::{CatalogEntry, EntryId, ScannedFile};
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct MemoryState {
    entries: HashMap<String, CatalogEntry>,
    next_id: i64,
    closed: bool,
}

/// In-memory [`CatalogStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn closed(operation: &str) -> CatalogError {
    CatalogError::storage(operation, "catalog is closed")
}

impl CatalogStore for MemoryStore {
    fn upsert(&self, file: &ScannedFile) -> Result<()> {
        let mut state = self.state.write();
        if state.closed {
            return Err(closed("upsert"));
        }

        let now = Utc::now();
        if let Some(entry) = state.entries.get_mut(&file.path) {
            entry.filename = file.filename.clone();
            entry.size = file.size;
            entry.modified_at = file.modified_at;
            entry.indexed_at = entry.indexed_at.max(now);
            return Ok(());
        }

        state.next_id += 1;
        let entry = CatalogEntry {
            id: EntryId::new(state.next_id),
            filename: file.filename.clone(),
            path: file.path.clone(),
            size: file.size,
            modified_at: file.modified_at,
            created_at: file.created_at,
            indexed_at: now,
        };
        state.entries.insert(file.path.clone(), entry);
        Ok(())
    }

    fn get(&self, path: &str) -> Result<Option<CatalogEntry>> {
        let state = self.state.read();
        if state.closed {
            return Err(closed("get"));
        }
        Ok(state.entries.get(path).cloned())
    }

    fn list_all(&self) -> Result<Vec<CatalogEntry>> {
        let state = self.state.read();
        if state.closed {
            return Err(closed("list"));
        }
        let mut entries: Vec<CatalogEntry> = state.entries.values().cloned().collect();
        entries.sort_by(listing_order);
        Ok(entries)
    }

    fn delete(&self, path: &str) -> Result<()> {
        let mut state = self.state.write();
        if state.closed {
            return Err(closed("delete"));
        }
        state.entries.remove(path);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut state = self.state.write();
        if state.closed {
            return Err(closed("clear"));
        }
        state.entries.clear();
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        let state = self.state.read();
        if state.closed {
            return Err(closed("count"));
        }
        Ok(state.entries.len())
    }

    fn close(&self) -> Result<()> {
        let mut state = self.state.write();
        state.closed = true;
        state.entries.clear();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;

    #[test]
    fn test_upsert_inserts_and_assigns_ids() {
        contract::upsert_inserts_and_assigns_ids(&MemoryStore::new());
    }

    #[test]
    fn test_upsert_same_path_updates_in_place() {
        contract::upsert_same_path_updates_in_place(&MemoryStore::new());
    }

    #[test]
    fn test_list_order() {
        contract::list_orders_by_filename_then_insertion(&MemoryStore::new());
    }

    #[test]
    fn test_search() {
        contract::search_is_case_insensitive(&MemoryStore::new());
    }

    #[test]
    fn test_delete_and_clear() {
        contract::delete_and_clear(&MemoryStore::new());
    }

    #[test]
    fn test_close() {
        contract::close_is_idempotent(&MemoryStore::new());
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let store = MemoryStore::new();
        store.upsert(&contract::file("/lib", "a.c2o", 1)).unwrap();
        let first = store.get("/lib/a.c2o").unwrap().unwrap().id;

        store.clear().unwrap();
        store.upsert(&contract::file("/lib", "a.c2o", 1)).unwrap();
        let second = store.get("/lib/a.c2o").unwrap().unwrap().id;
        assert!(second > first);
    }
}
