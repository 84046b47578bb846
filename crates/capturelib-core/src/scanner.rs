//! Directory tree scanner.
//!
//! Walks a library root, picks out Capture files and upserts each one into a
//! [`CatalogStore`]. A scan only adds and refreshes entries; files that
//! vanished since an earlier scan stay in the catalog until a caller deletes
//! them or clears the catalog.
//!
//! ## Symlinks
//!
//! Symlinked directories are never entered. A symlink to a regular file is
//! indexed under the file's resolved path, and a file reached both directly
//! and through a link is indexed once per scan.
//!
//! ## Error Policy
//!
//! - Entries the walk cannot read (permission denied, broken symlink, symlink
//!   loop, transient I/O error) are skipped and counted in
//!   [`ScanReport::skipped`]. They never abort the scan.
//! - A failed upsert stops the scan at once. The error carries the number of
//!   files already committed, which stay committed.

use crate::error::{CatalogError, Result};
use crate::store::CatalogStore;
use crate::types::{CaptureKind, ScannedFile};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use walkdir::{DirEntry, WalkDir};

/// How many matches between two progress callbacks
const PROGRESS_INTERVAL: usize = 500;

/// Outcome of a completed scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Matching files upserted into the catalog
    pub matched: usize,

    /// Entries skipped because they could not be read
    pub skipped: usize,

    /// Directories visited, the root included
    pub directories: usize,
}

/// Progress reporting for scan operations
pub trait ScanProgress: Send + Sync {
    /// Called periodically during scanning with the current counts
    fn on_progress(&self, matched: usize, directories: usize);

    /// Called when scanning is complete
    fn on_complete(&self, report: &ScanReport);
}

/// A simple progress reporter that logs to tracing
pub struct LoggingProgress {
    root: String,
}

impl LoggingProgress {
    pub fn new(root: impl Into<String>) -> Self {
        LoggingProgress { root: root.into() }
    }
}

impl ScanProgress for LoggingProgress {
    fn on_progress(&self, matched: usize, directories: usize) {
        debug!(root = %self.root, matched, directories, "Scanning progress");
    }

    fn on_complete(&self, report: &ScanReport) {
        info!(
            root = %self.root,
            matched = report.matched,
            skipped = report.skipped,
            directories = report.directories,
            "Scan complete"
        );
    }
}

/// Synchronizes Capture files under a root into a catalog store.
pub struct Scanner {
    store: Arc<dyn CatalogStore>,
    progress: Option<Arc<dyn ScanProgress>>,
}

impl Scanner {
    /// Create a scanner writing into `store`.
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Scanner {
            store,
            progress: None,
        }
    }

    /// Report progress to `progress` during scans
    pub fn with_progress(mut self, progress: Arc<dyn ScanProgress>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Walk `root` and upsert every matching file.
    ///
    /// With `recursive` false only the immediate children of `root` are
    /// considered; subdirectories are not entered.
    ///
    /// Fails with [`CatalogError::RootUnavailable`] when `root` is missing or
    /// is not a directory, and with [`CatalogError::ScanInterrupted`] when the
    /// store rejects a write.
    #[instrument(skip(self, root), fields(root = %root.display()))]
    pub fn scan_directory(&self, root: &Path, recursive: bool) -> Result<ScanReport> {
        let root = resolve_root(root)?;
        info!(root = %root.display(), recursive, "Scanning library");

        let mut walker = WalkDir::new(&root).follow_links(false);
        if !recursive {
            walker = walker.max_depth(1);
        }

        let mut report = ScanReport::default();
        let mut seen = HashSet::new();
        for item in walker {
            let entry = match item {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(
                        path = ?err.path(),
                        error = %err,
                        "Skipping unreadable entry"
                    );
                    report.skipped += 1;
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                report.directories += 1;
                continue;
            }

            let Some(file) = self.observe(&entry, &mut seen, &mut report) else {
                continue;
            };

            if let Err(err) = self.store.upsert(&file) {
                return Err(CatalogError::ScanInterrupted {
                    indexed: report.matched,
                    source: Box::new(err),
                });
            }
            report.matched += 1;

            if let Some(progress) = &self.progress {
                if report.matched % PROGRESS_INTERVAL == 0 {
                    progress.on_progress(report.matched, report.directories);
                }
            }
        }

        if let Some(progress) = &self.progress {
            progress.on_complete(&report);
        }
        Ok(report)
    }

    /// Build the catalog input for a walk entry, or `None` if it is not a
    /// readable Capture file or was already indexed during this scan.
    fn observe(
        &self,
        entry: &DirEntry,
        seen: &mut HashSet<PathBuf>,
        report: &mut ScanReport,
    ) -> Option<ScannedFile> {
        let file_type = entry.file_type();
        if !file_type.is_file() && !file_type.is_symlink() {
            return None;
        }

        CaptureKind::from_file_name(&entry.file_name().to_string_lossy())?;

        let (resolved, metadata) = match resolve_file(entry) {
            Ok(Some(resolved)) => resolved,
            Ok(None) => return None,
            Err(err) => {
                debug!(path = %entry.path().display(), error = %err, "Skipping unreadable file");
                report.skipped += 1;
                return None;
            }
        };

        let (Some(filename), Some(path)) = (
            resolved.file_name().and_then(|name| name.to_str()),
            resolved.to_str(),
        ) else {
            debug!(path = %resolved.display(), "Skipping non UTF-8 path");
            report.skipped += 1;
            return None;
        };

        // A link may point at a file of another kind.
        CaptureKind::from_file_name(filename)?;

        if seen.contains(&resolved) {
            debug!(path, link = %entry.path().display(), "Already indexed in this scan");
            return None;
        }

        match scanned_file(filename, path, &metadata) {
            Ok(file) => {
                seen.insert(resolved.clone());
                Some(file)
            }
            Err(err) => {
                debug!(path, error = %err, "Skipping file without modification time");
                report.skipped += 1;
                None
            }
        }
    }
}

/// Resolve a walk entry to the real file behind it.
///
/// Regular files under the canonical root already have resolved paths.
/// Symlinks are followed to their target; `None` means the target is not a
/// regular file.
fn resolve_file(entry: &DirEntry) -> std::io::Result<Option<(PathBuf, Metadata)>> {
    if !entry.path_is_symlink() {
        let metadata = entry.metadata()?;
        return Ok(Some((entry.path().to_path_buf(), metadata)));
    }

    let target = fs::canonicalize(entry.path())?;
    let metadata = fs::metadata(&target)?;
    Ok(metadata.is_file().then_some((target, metadata)))
}

/// Canonicalize the root so stored paths are absolute.
fn resolve_root(root: &Path) -> Result<PathBuf> {
    let unavailable = |reason: String| CatalogError::RootUnavailable {
        path: root.to_path_buf(),
        reason,
    };

    let resolved = fs::canonicalize(root).map_err(|e| unavailable(e.to_string()))?;
    let metadata = fs::metadata(&resolved).map_err(|e| unavailable(e.to_string()))?;
    if !metadata.is_dir() {
        return Err(unavailable("not a directory".to_string()));
    }
    Ok(resolved)
}

/// Extract catalog metadata for one file.
///
/// Creation time comes from `Metadata::created`, available on Windows,
/// macOS and the BSDs, and on Linux through statx where the filesystem
/// records a birth time. Elsewhere it falls back to the modification time.
fn scanned_file(filename: &str, path: &str, metadata: &Metadata) -> std::io::Result<ScannedFile> {
    let modified_at: DateTime<Utc> = metadata.modified()?.into();
    let mut file = ScannedFile::new(filename, path, metadata.len(), modified_at);
    if let Ok(created) = metadata.created() {
        file = file.with_created(created.into());
    }
    Ok(file)
}
