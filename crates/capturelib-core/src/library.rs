//! Library coordinator.
//!
//! [`Library`] binds one library root and scan policy to one catalog store
//! and is the API front ends call. It never edits entries itself: every
//! mutation goes through the store's upsert, delete and clear.
//!
//! Calls are expected to be serialized by the caller (one scan in flight at a
//! time). A scan over a large tree takes visible time, so front ends should
//! run it off their event thread.

use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::scanner::{ScanProgress, ScanReport, Scanner};
use crate::sqlite::SqliteStore;
use crate::store::CatalogStore;
use crate::types::{CatalogEntry, CatalogStats};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// What happened to the startup scan when a library was opened.
#[derive(Debug)]
pub enum StartupScan {
    /// No root configured, or auto-scan is off
    Skipped,

    /// The configured root was rescanned
    Completed(ScanReport),

    /// The rescan failed; the library is still usable
    Failed(CatalogError),
}

/// The capture file library.
///
/// ## Example
///
/// ```rust,ignore
/// use capturelib_core::{Config, Library, StartupScan};
///
/// let library = Library::open(Config::load()?, None)?;
/// if let StartupScan::Failed(err) = library.startup_scan() {
///     eprintln!("startup scan failed: {err}");
/// }
/// for entry in library.search("stage")? {
///     println!("{}", entry.path);
/// }
/// library.close()?;
/// ```
pub struct Library {
    config: Config,

    /// Where config changes are persisted (None = in-memory only)
    config_path: Option<PathBuf>,

    store: Arc<dyn CatalogStore>,
    scanner: Scanner,
}

impl Library {
    /// Create a library over an already opened store. Does not scan.
    pub fn new(config: Config, config_path: Option<PathBuf>, store: Arc<dyn CatalogStore>) -> Self {
        let scanner = Scanner::new(store.clone());
        Library {
            config,
            config_path,
            store,
            scanner,
        }
    }

    /// Open the SQLite catalog named by `config`. Does not scan; call
    /// [`Library::startup_scan`] to apply the startup policy.
    pub fn open(config: Config, config_path: Option<PathBuf>) -> Result<Self> {
        let store = Arc::new(SqliteStore::open(config.catalog_path()?)?);
        Ok(Self::new(config, config_path, store))
    }

    /// Report scan progress to `progress`
    pub fn with_progress(mut self, progress: Arc<dyn ScanProgress>) -> Self {
        self.scanner = Scanner::new(self.store.clone()).with_progress(progress);
        self
    }

    /// Run the best-effort rescan configured for startup.
    ///
    /// A failed scan is returned as [`StartupScan::Failed`]; the library
    /// stays usable with its existing catalog.
    pub fn startup_scan(&self) -> StartupScan {
        if self.root().is_none() || !self.config.library.auto_scan {
            return StartupScan::Skipped;
        }

        match self.rescan() {
            Ok(report) => StartupScan::Completed(report),
            Err(err) => {
                warn!(error = %err, "Startup scan failed, continuing with the existing catalog");
                StartupScan::Failed(err)
            }
        }
    }

    /// Point the library at a new root, clear the catalog and scan the root.
    ///
    /// A relative `path` is resolved against the current directory before it
    /// is recorded.
    ///
    /// Destructive: once the clear has run, a failed scan leaves the catalog
    /// empty or partial until the next successful scan.
    pub fn set_root_and_rescan(&mut self, path: impl AsRef<Path>) -> Result<ScanReport> {
        let path = absolute_root(path.as_ref())?;
        let root = path
            .to_str()
            .ok_or_else(|| CatalogError::config(format!("invalid library path {:?}", path)))?;

        let previous = std::mem::replace(&mut self.config.library.path, root.to_string());
        if let Err(err) = self.persist_config() {
            self.config.library.path = previous;
            return Err(err);
        }
        info!(root, previous = %previous, "Library root changed");

        self.store.clear()?;
        self.rescan()
    }

    /// Scan the configured root without clearing the catalog first.
    pub fn rescan(&self) -> Result<ScanReport> {
        let root = self.root().ok_or(CatalogError::NotConfigured)?;
        self.scanner
            .scan_directory(root, self.config.library.scan_subdirectories)
    }

    /// All entries, ordered by filename.
    pub fn list_all(&self) -> Result<Vec<CatalogEntry>> {
        self.store.list_all()
    }

    /// Entries whose filename contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Result<Vec<CatalogEntry>> {
        self.store.search(query)
    }

    /// Number of entries in the catalog.
    pub fn count(&self) -> Result<usize> {
        self.store.count()
    }

    /// Entry count and total size of the catalog.
    pub fn stats(&self) -> Result<CatalogStats> {
        Ok(CatalogStats::from_entries(&self.store.list_all()?))
    }

    /// Release the catalog. Safe to call more than once.
    pub fn close(&self) -> Result<()> {
        self.store.close()
    }

    /// The configured library root, if any.
    pub fn root(&self) -> Option<&Path> {
        self.config.library_root()
    }

    /// Current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying catalog, for single-entry maintenance.
    pub fn store(&self) -> &dyn CatalogStore {
        self.store.as_ref()
    }

    /// Change the scan policy and persist it.
    pub fn set_scan_policy(&mut self, auto_scan: bool, scan_subdirectories: bool) -> Result<()> {
        self.config.library.auto_scan = auto_scan;
        self.config.library.scan_subdirectories = scan_subdirectories;
        self.persist_config()
    }

    /// Persist the current configuration to the library's config file.
    pub fn save_config(&self) -> Result<()> {
        self.persist_config()
    }

    fn persist_config(&self) -> Result<()> {
        let Some(path) = &self.config_path else {
            return Ok(());
        };
        self.config.save_to(path).map_err(|err| match err {
            CatalogError::Config { .. } => err,
            other => CatalogError::config(format!(
                "could not save {}: {}",
                path.display(),
                other
            )),
        })
    }
}

/// Make a user-supplied root absolute so the saved config does not depend
/// on the working directory of later runs.
fn absolute_root(path: &Path) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(CatalogError::config("library path is empty"));
    }
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    let cwd = env::current_dir().map_err(|e| {
        CatalogError::config(format!("cannot resolve {}: {}", path.display(), e))
    })?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"capture").unwrap();
    }

    fn memory_library(config: Config) -> Library {
        Library::new(config, None, Arc::new(MemoryStore::new()))
    }

    fn paths(entries: &[CatalogEntry]) -> BTreeSet<String> {
        entries.iter().map(|e| e.path.clone()).collect()
    }

    #[test]
    fn test_rescan_not_configured() {
        let library = memory_library(Config::default());
        assert!(matches!(library.rescan(), Err(CatalogError::NotConfigured)));
    }

    #[test]
    fn test_set_root_and_rescan() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("Stage1.c2o"));
        touch(&temp_dir.path().join("sub").join("stage2.c2s"));

        let mut library = memory_library(Config::default());
        let report = library.set_root_and_rescan(temp_dir.path()).unwrap();

        assert_eq!(report.matched, 2);
        assert_eq!(library.count().unwrap(), 2);
        assert_eq!(library.root(), Some(temp_dir.path()));
        assert_eq!(library.search("stage").unwrap().len(), 2);
        assert_eq!(library.search("").unwrap(), library.list_all().unwrap());
    }

    #[test]
    fn test_destructive_reconfigure() {
        let old_root = TempDir::new().unwrap();
        let new_root = TempDir::new().unwrap();
        touch(&old_root.path().join("old.c2o"));
        touch(&new_root.path().join("new.c2p"));

        let mut library = memory_library(Config::default());
        library.set_root_and_rescan(old_root.path()).unwrap();
        library.set_root_and_rescan(new_root.path()).unwrap();

        let entries = library.list_all().unwrap();
        assert_eq!(entries.len(), 1);
        let new_base = fs::canonicalize(new_root.path()).unwrap();
        assert!(entries
            .iter()
            .all(|e| Path::new(&e.path).starts_with(&new_base)));
    }

    #[test]
    fn test_reconfigure_to_missing_root_leaves_catalog_empty() {
        let old_root = TempDir::new().unwrap();
        touch(&old_root.path().join("old.c2o"));

        let mut library = memory_library(Config::default());
        library.set_root_and_rescan(old_root.path()).unwrap();

        let missing = old_root.path().join("missing");
        let result = library.set_root_and_rescan(&missing);
        assert!(matches!(result, Err(CatalogError::RootUnavailable { .. })));
        assert_eq!(library.count().unwrap(), 0);
        assert_eq!(library.root(), Some(missing.as_path()));
    }

    #[test]
    fn test_set_root_rejects_empty_path() {
        let mut library = memory_library(Config::default());
        let result = library.set_root_and_rescan("");
        assert!(matches!(result, Err(CatalogError::Config { .. })));
        assert!(library.root().is_none());
    }

    #[test]
    fn test_set_root_persists_config() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("designs");
        touch(&root.join("a.c2o"));
        let config_path = temp_dir.path().join("config").join("capturelib.toml");

        let mut library = Library::new(
            Config::default(),
            Some(config_path.clone()),
            Arc::new(MemoryStore::new()),
        );
        library.set_root_and_rescan(&root).unwrap();

        let saved = Config::load_from(&config_path).unwrap();
        assert_eq!(saved.library_root(), Some(root.as_path()));
    }

    #[test]
    fn test_relative_root_is_saved_absolute() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("designs");
        touch(&root.join("a.c2o"));
        let config_path = temp_dir.path().join("capturelib.toml");

        let cwd = env::current_dir().unwrap();
        let relative = relative_to(&root, &cwd);
        assert!(relative.is_relative());

        let mut library = Library::new(
            Config::default(),
            Some(config_path.clone()),
            Arc::new(MemoryStore::new()),
        );
        library.set_root_and_rescan(&relative).unwrap();

        let saved = Config::load_from(&config_path).unwrap();
        let saved_root = saved.library_root().unwrap();
        assert!(saved_root.is_absolute());
        assert_eq!(
            fs::canonicalize(saved_root).unwrap(),
            fs::canonicalize(&root).unwrap()
        );
        assert_eq!(library.root(), Some(saved_root));
    }

    /// Relative path from `base` to `target` built from `..` components.
    fn relative_to(target: &Path, base: &Path) -> PathBuf {
        let target = fs::canonicalize(target).unwrap();
        let base = fs::canonicalize(base).unwrap();
        let mut relative = PathBuf::new();
        for _ in base.components().skip(1) {
            relative.push("..");
        }
        for component in target.components().skip(1) {
            relative.push(component);
        }
        relative
    }

    #[test]
    fn test_set_root_config_failure_keeps_catalog() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("designs");
        touch(&root.join("a.c2o"));

        // A directory where the config file should be makes the save fail.
        let config_path = temp_dir.path().join("blocked");
        fs::create_dir_all(&config_path).unwrap();

        let mut config = Config::default();
        config.library.path = root.to_str().unwrap().to_string();
        let mut library = Library::new(config, Some(config_path), Arc::new(MemoryStore::new()));
        library.rescan().unwrap();

        let other = temp_dir.path().join("other");
        fs::create_dir_all(&other).unwrap();
        let result = library.set_root_and_rescan(&other);

        assert!(matches!(result, Err(CatalogError::Config { .. })));
        assert_eq!(library.count().unwrap(), 1);
        assert_eq!(library.root(), Some(root.as_path()));
    }

    #[test]
    fn test_rescan_respects_subdirectory_policy() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("x.c2o"));
        touch(&temp_dir.path().join("sub").join("y.c2o"));

        let mut config = Config::default();
        config.library.path = temp_dir.path().to_str().unwrap().to_string();
        config.library.scan_subdirectories = false;

        let mut library = memory_library(config);
        assert_eq!(library.rescan().unwrap().matched, 1);

        library.set_scan_policy(true, true).unwrap();
        assert_eq!(library.rescan().unwrap().matched, 2);
        assert_eq!(library.count().unwrap(), 2);
    }

    #[test]
    fn test_idempotent_rescan() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("a.c2o"));
        touch(&temp_dir.path().join("b.c2s"));

        let mut library = memory_library(Config::default());
        library.set_root_and_rescan(temp_dir.path()).unwrap();
        let before = library.list_all().unwrap();

        library.rescan().unwrap();
        let after = library.list_all().unwrap();

        assert_eq!(paths(&before), paths(&after));
        assert_eq!(library.count().unwrap(), 2);
    }

    #[test]
    fn test_startup_scan_policy() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("a.c2o"));

        let library = memory_library(Config::default());
        assert!(matches!(library.startup_scan(), StartupScan::Skipped));

        let mut config = Config::default();
        config.library.path = temp_dir.path().to_str().unwrap().to_string();
        config.library.auto_scan = false;
        let library = memory_library(config.clone());
        assert!(matches!(library.startup_scan(), StartupScan::Skipped));
        assert_eq!(library.count().unwrap(), 0);

        config.library.auto_scan = true;
        let library = memory_library(config);
        match library.startup_scan() {
            StartupScan::Completed(report) => assert_eq!(report.matched, 1),
            other => panic!("unexpected startup scan: {:?}", other),
        }
    }

    #[test]
    fn test_open_with_missing_root_is_degraded() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.library.path = temp_dir.path().join("gone").to_str().unwrap().to_string();
        config.library.catalog_path = Some(temp_dir.path().join("data").join("catalog.db"));

        let library = Library::open(config, None).unwrap();
        assert!(matches!(
            library.startup_scan(),
            StartupScan::Failed(CatalogError::RootUnavailable { .. })
        ));
        assert_eq!(library.count().unwrap(), 0);
        assert!(library.list_all().unwrap().is_empty());
        library.close().unwrap();
    }

    #[test]
    fn test_open_persists_catalog() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("designs");
        touch(&root.join("venue.c2p"));

        let mut config = Config::default();
        config.library.catalog_path = Some(temp_dir.path().join("catalog.db"));
        config.library.auto_scan = false;

        let mut library = Library::open(config.clone(), None).unwrap();
        library.set_root_and_rescan(&root).unwrap();
        library.close().unwrap();

        let reopened = Library::open(config, None).unwrap();
        assert!(matches!(reopened.startup_scan(), StartupScan::Skipped));
        assert_eq!(reopened.count().unwrap(), 1);
        assert_eq!(reopened.stats().unwrap().total_size, 7);
        reopened.close().unwrap();
    }

    #[test]
    fn test_close_is_idempotent() {
        let library = memory_library(Config::default());
        library.close().unwrap();
        library.close().unwrap();
        assert!(library.count().is_err());
    }
}
