//! Scan command - rescan the library or switch to a new root.

use crate::app::App;
use capturelib_core::Config;
use std::path::PathBuf;
use std::time::Instant;

/// Run the scan command.
pub fn run(config: Config, config_path: PathBuf, root: Option<PathBuf>) -> anyhow::Result<()> {
    let mut app = App::new(config, config_path)?;

    let start = Instant::now();
    let result = match &root {
        Some(root) => {
            println!("Switching library to {}", root.display());
            println!("The catalog will be cleared and rebuilt.");
            app.library.set_root_and_rescan(root)
        }
        None => {
            let Some(current) = app.library.root() else {
                eprintln!("No library path set. Run 'capturelib scan --root <dir>' first.");
                return app.close();
            };
            println!("Scanning {}", current.display());
            app.library.rescan()
        }
    };

    let report = match result {
        Ok(report) => report,
        Err(err) => {
            if let Some(indexed) = err.indexed_before_failure() {
                eprintln!("Scan stopped after {} files.", indexed);
            }
            app.close()?;
            return Err(err.into());
        }
    };
    let elapsed = start.elapsed();

    println!();
    println!("Scan complete!");
    println!("  Matched:     {}", report.matched);
    println!("  Skipped:     {}", report.skipped);
    println!("  Directories: {}", report.directories);
    println!("  Catalog:     {} files", app.library.count()?);
    println!("  Time:        {:.2}s", elapsed.as_secs_f64());

    app.close()
}
