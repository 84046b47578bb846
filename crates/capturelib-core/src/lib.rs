//! # Capture Library Core
//!
//! This crate indexes directory trees of Capture design files (`.c2o`,
//! `.c2s`, `.c2p`) into a persistent catalog that supports listing, substring
//! search and incremental rescans.
//!
//! ## Architecture
//!
//! - **Types** (`types`): Catalog entries and scanned file metadata
//! - **Store** (`store`): The catalog contract, with SQLite (`sqlite`) and
//!   in-memory (`memory`) backends
//! - **Search** (`search`): Case-insensitive filename matching
//! - **Scanner** (`scanner`): Directory traversal feeding the store
//! - **Library** (`library`): The coordinator front ends talk to
//! - **Config** (`config`): Configuration management
//!
//! ## Example
//!
//! ```rust,ignore
//! use capturelib_core::{Config, Library};
//!
//! let mut library = Library::open(Config::load()?, None)?;
//! let report = library.set_root_and_rescan("/srv/capture/designs")?;
//! println!("indexed {} files", report.matched);
//! for entry in library.search("stage")? {
//!     println!("{}", entry.path);
//! }
//! ```

pub mod config;
pub mod error;
pub mod library;
pub mod memory;
pub mod scanner;
pub mod search;
pub mod sqlite;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::{Config, Theme};
pub use error::{CatalogError, Result};
pub use library::{Library, StartupScan};
pub use memory::MemoryStore;
pub use scanner::{LoggingProgress, ScanProgress, ScanReport, Scanner};
pub use search::SearchQuery;
pub use sqlite::SqliteStore;
pub use store::CatalogStore;
pub use types::{CaptureKind, CatalogEntry, CatalogStats, EntryId, ScannedFile};
