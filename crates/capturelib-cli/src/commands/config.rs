//! Config command - show or change settings.

use capturelib_core::{Config, Theme};
use std::path::PathBuf;

/// Run the config command.
///
/// Without options it prints the current settings; with options it updates
/// them and saves the file.
pub fn run(
    mut config: Config,
    config_path: PathBuf,
    auto_scan: Option<bool>,
    subdirectories: Option<bool>,
    theme: Option<Theme>,
) -> anyhow::Result<()> {
    let changed = auto_scan.is_some() || subdirectories.is_some() || theme.is_some();

    if let Some(auto_scan) = auto_scan {
        config.library.auto_scan = auto_scan;
    }
    if let Some(subdirectories) = subdirectories {
        config.library.scan_subdirectories = subdirectories;
    }
    if let Some(theme) = theme {
        config.ui.theme = theme;
    }

    if changed {
        config.save_to(&config_path)?;
        println!("Settings saved to {}", config_path.display());
        println!();
    }

    println!("# {}", config_path.display());
    print!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}
