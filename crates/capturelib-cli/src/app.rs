//! Application state management.

use capturelib_core::{Config, Library, LoggingProgress, StartupScan};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared application state.
pub struct App {
    /// The library coordinator
    pub library: Library,

    /// Where settings are saved
    pub config_path: PathBuf,
}

impl App {
    /// Open the catalog without scanning.
    pub fn new(config: Config, config_path: PathBuf) -> anyhow::Result<Self> {
        let progress = Arc::new(LoggingProgress::new("library"));
        let library = Library::open(config, Some(config_path.clone()))?.with_progress(progress);

        info!(
            catalog = %library.config().catalog_path()?.display(),
            entries = library.count()?,
            "Application initialized"
        );

        Ok(App {
            library,
            config_path,
        })
    }

    /// Open the catalog and run the configured startup scan.
    ///
    /// A failed startup scan is reported and the existing catalog is used.
    pub fn open(config: Config, config_path: PathBuf) -> anyhow::Result<Self> {
        let app = Self::new(config, config_path)?;
        match app.library.startup_scan() {
            StartupScan::Skipped => {}
            StartupScan::Completed(report) => {
                info!(matched = report.matched, "Startup scan finished");
            }
            StartupScan::Failed(err) => {
                warn!(error = %err, "Startup scan failed");
                eprintln!("⚠ Startup scan failed: {}", err);
            }
        }
        Ok(app)
    }

    /// Release the catalog.
    pub fn close(self) -> anyhow::Result<()> {
        self.library.close()?;
        Ok(())
    }
}
