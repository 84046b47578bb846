//! Status command - show library root and catalog statistics.

use crate::app::App;
use crate::format::format_size;
use capturelib_core::{CaptureKind, Config};
use std::path::PathBuf;

/// Run the status command.
pub fn run(config: Config, config_path: PathBuf) -> anyhow::Result<()> {
    let app = App::open(config, config_path)?;
    let entries = app.library.list_all()?;
    let stats = app.library.stats()?;
    let library_config = &app.library.config().library;

    println!("Capture Library Status");
    println!("======================");
    println!();

    match app.library.root() {
        Some(root) => println!("📁 Library:   {}", root.display()),
        None => println!("📁 Library:   (not set - run 'capturelib scan --root <dir>')"),
    }
    println!(
        "   Auto-scan: {}   Subdirectories: {}",
        library_config.auto_scan, library_config.scan_subdirectories
    );
    println!();

    println!("📊 {} files | {}", stats.total_files, format_size(stats.total_size));
    for kind in CaptureKind::ALL {
        let count = entries.iter().filter(|e| e.kind() == Some(kind)).count();
        println!("   {:<8} {}", format!("{}:", kind), count);
    }

    if let Some(latest) = entries.iter().map(|e| e.indexed_at).max() {
        println!(
            "   Last indexed: {}",
            latest.format("%Y-%m-%d %H:%M:%S")
        );
    }

    println!();
    println!("Catalog: {}", app.library.config().catalog_path()?.display());
    println!("Config:  {}", app.config_path.display());

    app.close()
}
