//! Output formatting helpers.

use crate::OutputFormat;
use capturelib_core::CatalogEntry;

/// Human-readable size using 1024-based units.
pub fn format_size(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    const PREFIXES: &[u8] = b"KMGTPE";

    if bytes < UNIT {
        return format!("{} B", bytes);
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    format!(
        "{:.1} {}B",
        bytes as f64 / div as f64,
        PREFIXES[exp] as char
    )
}

/// Print entries as text lines or a JSON array.
pub fn print_entries(entries: &[CatalogEntry], output: OutputFormat) -> anyhow::Result<()> {
    match output {
        OutputFormat::Text => {
            for entry in entries {
                println!(
                    "📄 {:<40} {:>10}  {}  {}",
                    entry.filename,
                    format_size(entry.size),
                    entry.modified_at.format("%d.%m.%Y"),
                    entry.path
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(entries)?);
        }
    }
    Ok(())
}
