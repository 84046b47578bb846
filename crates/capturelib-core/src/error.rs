//! Error types for catalog operations.
//!
//! Library-level failures are modelled with `thiserror` so callers can match
//! on them; the CLI wraps them in `anyhow` at the top level.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using CatalogError
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Failure modes of the catalog core.
///
/// Per-entry filesystem failures during a scan never show up here: the
/// scanner skips them and keeps walking.
#[derive(Error, Debug)]
pub enum CatalogError {
    // === Storage Errors ===
    /// The catalog storage is unreachable, corrupted or rejected a write
    #[error("storage error: {operation} failed: {reason}")]
    Storage { operation: String, reason: String },

    // === Library Errors ===
    /// An operation needing a library root ran before one was set
    #[error("library path not set")]
    NotConfigured,

    /// The scan root is missing or is not a directory
    #[error("library root {} is not accessible: {reason}", .path.display())]
    RootUnavailable { path: PathBuf, reason: String },

    /// A storage failure stopped a scan part way through
    #[error("scan interrupted after {indexed} files: {source}")]
    ScanInterrupted {
        indexed: usize,
        #[source]
        source: Box<CatalogError>,
    },

    // === Configuration Errors ===
    /// A configuration change could not be applied or persisted
    #[error("configuration error: {reason}")]
    Config { reason: String },

    // === I/O Errors ===
    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// Create a storage error
    pub fn storage(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::Storage {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        CatalogError::Config {
            reason: reason.into(),
        }
    }

    /// Number of files already committed when a scan was interrupted.
    pub fn indexed_before_failure(&self) -> Option<usize> {
        match self {
            CatalogError::ScanInterrupted { indexed, .. } => Some(*indexed),
            _ => None,
        }
    }

    /// Returns true if the failure came from the catalog storage
    pub fn is_storage(&self) -> bool {
        match self {
            CatalogError::Storage { .. } => true,
            CatalogError::ScanInterrupted { source, .. } => source.is_storage(),
            _ => false,
        }
    }
}

impl From<rusqlite::Error> for CatalogError {
    fn from(err: rusqlite::Error) -> Self {
        CatalogError::Storage {
            operation: "sqlite".to_string(),
            reason: err.to_string(),
        }
    }
}
