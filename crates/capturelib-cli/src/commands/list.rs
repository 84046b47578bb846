//! List and search commands - print catalog entries.

use crate::app::App;
use crate::format::{format_size, print_entries};
use crate::OutputFormat;
use capturelib_core::{CatalogStats, Config};
use std::path::PathBuf;

/// Run the list command, or the search command when `query` is given.
pub fn run(
    config: Config,
    config_path: PathBuf,
    query: Option<&str>,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let app = App::open(config, config_path)?;

    let entries = match query {
        Some(query) => app.library.search(query)?,
        None => app.library.list_all()?,
    };

    print_entries(&entries, output)?;

    if let OutputFormat::Text = output {
        let stats = CatalogStats::from_entries(&entries);
        eprintln!();
        eprintln!(
            "{} files, {}",
            stats.total_files,
            format_size(stats.total_size)
        );
    }

    app.close()
}
