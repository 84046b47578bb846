//! # Capture Library CLI
//!
//! Command-line front end for the Capture file catalog.
//!
//! ## Commands
//!
//! - `capturelib scan [--root <dir>]` - Rescan the library, or switch to a new root
//! - `capturelib list` - List every catalogued file
//! - `capturelib search <text>` - Find files whose name contains the text
//! - `capturelib status` - Show the library root and catalog statistics
//! - `capturelib remove <path>` - Drop one entry from the catalog
//! - `capturelib clear` - Empty the catalog
//! - `capturelib config` - Show or change settings
//!
//! ## Example Usage
//!
//! ```bash
//! # Point the library at a directory and index it
//! capturelib scan --root ~/Capture/Designs
//!
//! # Search by name
//! capturelib search stage --output json
//! ```

mod app;
mod commands;
mod format;

use capturelib_core::Theme;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Capture Library - catalog and search Capture design files
#[derive(Parser)]
#[command(name = "capturelib")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "CAPTURELIB_CONFIG")]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rescan the library root, or clear and scan a new root
    Scan {
        /// New library root; replaces the catalog with this directory's files
        #[arg(short, long)]
        root: Option<PathBuf>,
    },

    /// List every catalogued file
    #[command(alias = "ls")]
    List {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Find files whose name contains the given text (case-insensitive)
    Search {
        /// Text to look for; empty matches everything
        query: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Show library root and catalog statistics
    Status,

    /// Remove a single entry from the catalog (the file is untouched)
    Remove {
        /// Absolute path of the catalogued file
        path: String,
    },

    /// Remove every entry from the catalog
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show or change settings
    Config {
        /// Rescan the library when it is opened
        #[arg(long)]
        auto_scan: Option<bool>,

        /// Descend into subdirectories while scanning
        #[arg(long)]
        subdirectories: Option<bool>,

        /// Colour theme for graphical front ends (dark, light)
        #[arg(long)]
        theme: Option<Theme>,
    },
}

#[derive(Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();

    let config_path = match cli.config {
        Some(path) => path,
        None => capturelib_core::Config::default_config_path()?,
    };
    let config = capturelib_core::Config::load_from(&config_path)?;

    match cli.command {
        Commands::Scan { root } => commands::scan::run(config, config_path, root),
        Commands::List { output } => commands::list::run(config, config_path, None, output),
        Commands::Search { query, output } => {
            commands::list::run(config, config_path, Some(&query), output)
        }
        Commands::Status => commands::status::run(config, config_path),
        Commands::Remove { path } => commands::remove::run(config, config_path, &path),
        Commands::Clear { yes } => commands::clear::run(config, config_path, yes),
        Commands::Config {
            auto_scan,
            subdirectories,
            theme,
        } => commands::config::run(config, config_path, auto_scan, subdirectories, theme),
    }
}
