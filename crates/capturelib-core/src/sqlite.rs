//! Durable catalog store backed by SQLite.
//!
//! ## Schema
//!
//! ```text
//! files
//!   id           INTEGER PRIMARY KEY AUTOINCREMENT
//!   filename     TEXT NOT NULL
//!   path         TEXT NOT NULL UNIQUE
//!   size         INTEGER NOT NULL
//!   modified_at  INTEGER NOT NULL   -- microseconds since the Unix epoch
//!   created_at   INTEGER NOT NULL
//!   indexed_at   INTEGER NOT NULL
//! ```
//!
//! `AUTOINCREMENT` keeps ids strictly increasing even after deletes, so the
//! id doubles as the insertion-order tie breaker for listings.

use crate::error::{CatalogError, Result};
use crate::store::CatalogStore;
use crate::types::{CatalogEntry, EntryId, ScannedFile};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default database file name inside the data directory
pub const CATALOG_FILE_NAME: &str = "catalog.db";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS files (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        filename    TEXT    NOT NULL,
        path        TEXT    NOT NULL UNIQUE,
        size        INTEGER NOT NULL,
        modified_at INTEGER NOT NULL,
        created_at  INTEGER NOT NULL,
        indexed_at  INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_files_filename ON files (filename);
    CREATE INDEX IF NOT EXISTS idx_files_path ON files (path);
";

const UPSERT_SQL: &str = "
    INSERT INTO files (filename, path, size, modified_at, created_at, indexed_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(path) DO UPDATE SET
        filename    = excluded.filename,
        size        = excluded.size,
        modified_at = excluded.modified_at,
        indexed_at  = MAX(files.indexed_at, excluded.indexed_at)
";

const SELECT_COLUMNS: &str =
    "SELECT id, filename, path, size, modified_at, created_at, indexed_at FROM files";

/// [`CatalogStore`] persisted in a single SQLite file.
///
/// ## Example
///
/// ```rust,ignore
/// use capturelib_core::{CatalogStore, SqliteStore};
///
/// let store = SqliteStore::open("./data/catalog.db")?;
/// println!("{} files", store.count()?);
/// store.close()?;
/// ```
pub struct SqliteStore {
    path: Option<PathBuf>,

    /// `None` once closed
    conn: Mutex<Option<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the catalog database at `path`.
    ///
    /// Creates the parent directory and the schema if missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        info!(path = %path.display(), "Opening catalog");
        let conn = Connection::open(path).map_err(|e| CatalogError::storage("open", e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        conn.execute_batch(SCHEMA)?;

        Ok(SqliteStore {
            path: Some(path.to_path_buf()),
            conn: Mutex::new(Some(conn)),
        })
    }

    /// Open a private in-memory database (nothing touches the disk).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(SqliteStore {
            path: None,
            conn: Mutex::new(Some(conn)),
        })
    }

    /// Location of the database file, `None` for in-memory catalogs.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn with_conn<T>(
        &self,
        operation: &str,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T> {
        let guard = self.conn.lock();
        let conn = guard
            .as_ref()
            .ok_or_else(|| CatalogError::storage(operation, "catalog is closed"))?;
        f(conn).map_err(|e| CatalogError::storage(operation, e.to_string()))
    }

    fn query_entries(&self, operation: &str, sql: &str) -> Result<Vec<CatalogEntry>> {
        self.with_conn(operation, |conn| {
            let mut stmt = conn.prepare_cached(sql)?;
            let rows = stmt.query_map([], entry_from_row)?;
            rows.collect()
        })
    }
}

impl CatalogStore for SqliteStore {
    fn upsert(&self, file: &ScannedFile) -> Result<()> {
        let size = i64::try_from(file.size)
            .map_err(|_| CatalogError::storage("upsert", format!("size {} out of range", file.size)))?;
        let indexed_at = Utc::now();

        self.with_conn("upsert", |conn| {
            conn.prepare_cached(UPSERT_SQL)?.execute(params![
                file.filename,
                file.path,
                size,
                to_micros(file.modified_at),
                to_micros(file.created_at),
                to_micros(indexed_at),
            ])
        })?;
        Ok(())
    }

    fn get(&self, path: &str) -> Result<Option<CatalogEntry>> {
        let sql = format!("{} WHERE path = ?1", SELECT_COLUMNS);
        self.with_conn("get", |conn| {
            conn.prepare_cached(&sql)?
                .query_row(params![path], entry_from_row)
                .optional()
        })
    }

    fn list_all(&self) -> Result<Vec<CatalogEntry>> {
        let sql = format!("{} ORDER BY filename, id", SELECT_COLUMNS);
        self.query_entries("list", &sql)
    }

    fn delete(&self, path: &str) -> Result<()> {
        let removed = self.with_conn("delete", |conn| {
            conn.execute("DELETE FROM files WHERE path = ?1", params![path])
        })?;
        debug!(path, removed, "Deleted catalog entry");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let removed = self.with_conn("clear", |conn| conn.execute("DELETE FROM files", []))?;
        info!(removed, "Cleared catalog");
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        let count: i64 = self.with_conn("count", |conn| {
            conn.query_row("SELECT COUNT(*) FROM files", [], |row| row.get(0))
        })?;
        Ok(count as usize)
    }

    fn close(&self) -> Result<()> {
        let Some(conn) = self.conn.lock().take() else {
            return Ok(());
        };

        if let Err((_conn, e)) = conn.close() {
            warn!(error = %e, "Catalog did not close cleanly");
            return Err(CatalogError::storage("close", e.to_string()));
        }
        debug!("Catalog closed");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}

fn to_micros(at: DateTime<Utc>) -> i64 {
    at.timestamp_micros()
}

fn from_micros(micros: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_micros(micros)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(0, micros))
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<CatalogEntry> {
    let size: i64 = row.get(3)?;
    Ok(CatalogEntry {
        id: EntryId::new(row.get(0)?),
        filename: row.get(1)?,
        path: row.get(2)?,
        size: u64::try_from(size).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(3, size))?,
        modified_at: from_micros(row.get(4)?)?,
        created_at: from_micros(row.get(5)?)?,
        indexed_at: from_micros(row.get(6)?)?,
    })
}
