//! Core data types for the capture catalog.
//!
//! This module defines the records that flow between the scanner, the
//! catalog stores and the callers:
//!
//! - **ScannedFile**: what a scan observed on disk, the input to an upsert
//! - **CatalogEntry**: what the catalog holds, including store-assigned fields
//! - **CaptureKind**: the file extensions that make a file part of the catalog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Surrogate identifier assigned by a store on first insert.
///
/// Stable across updates of the same path. Ids increase with insertion
/// order, which is what listings use to break filename ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(pub i64);

impl EntryId {
    /// Create a new entry ID
    pub fn new(id: i64) -> Self {
        EntryId(id)
    }

    /// Get the raw ID value
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kinds of Capture file the catalog tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptureKind {
    /// `.c2o` stage design
    Object,
    /// `.c2s` show file
    Show,
    /// `.c2p` project file
    Project,
}

impl CaptureKind {
    /// All kinds, in extension order
    pub const ALL: [CaptureKind; 3] = [CaptureKind::Object, CaptureKind::Show, CaptureKind::Project];

    /// Lowercase extension including the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            CaptureKind::Object => ".c2o",
            CaptureKind::Show => ".c2s",
            CaptureKind::Project => ".c2p",
        }
    }

    /// Classify a file name, ignoring case.
    ///
    /// Returns `None` for names that are not Capture files.
    pub fn from_file_name(name: &str) -> Option<CaptureKind> {
        let lower = name.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| lower.ends_with(kind.extension()))
    }
}

impl fmt::Display for CaptureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureKind::Object => write!(f, "object"),
            CaptureKind::Show => write!(f, "show"),
            CaptureKind::Project => write!(f, "project"),
        }
    }
}

/// A matching file as observed on disk during a scan.
///
/// `id` and `indexed_at` are deliberately absent: the store assigns both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Base name, e.g. "Stage1.c2o"
    pub filename: String,

    /// Absolute path, the catalog key
    pub path: String,

    /// Byte length
    pub size: u64,

    /// Filesystem modification time
    pub modified_at: DateTime<Utc>,

    /// Creation time, or `modified_at` where the platform has none
    pub created_at: DateTime<Utc>,
}

impl ScannedFile {
    /// Create a scanned file whose creation time falls back to `modified_at`.
    pub fn new(
        filename: impl Into<String>,
        path: impl Into<String>,
        size: u64,
        modified_at: DateTime<Utc>,
    ) -> Self {
        ScannedFile {
            filename: filename.into(),
            path: path.into(),
            size,
            modified_at,
            created_at: modified_at,
        }
    }

    /// Set the creation time reported by the platform
    pub fn with_created(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Capture kind derived from the file name
    pub fn kind(&self) -> Option<CaptureKind> {
        CaptureKind::from_file_name(&self.filename)
    }
}

/// One indexed file as held by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: EntryId,
    pub filename: String,
    pub path: String,
    pub size: u64,
    pub modified_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,

    /// Wall-clock time of the last successful upsert
    pub indexed_at: DateTime<Utc>,
}

impl CatalogEntry {
    /// Capture kind derived from the file name
    pub fn kind(&self) -> Option<CaptureKind> {
        CaptureKind::from_file_name(&self.filename)
    }
}

/// Summary figures over a set of entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Number of entries
    pub total_files: u64,

    /// Sum of entry sizes in bytes
    pub total_size: u64,
}

impl CatalogStats {
    /// Compute stats over a listing.
    pub fn from_entries(entries: &[CatalogEntry]) -> Self {
        CatalogStats {
            total_files: entries.len() as u64,
            total_size: entries.iter().map(|e| e.size).sum(),
        }
    }
}
