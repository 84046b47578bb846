//! Configuration management for Capture Library.
//!
//! Configuration is stored as TOML in the platform user-config directory.
//! The location never depends on the library root being scanned.

use crate::error::{CatalogError, Result};
use crate::sqlite::CATALOG_FILE_NAME;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const APP_NAME: &str = "capturelib";

/// Main configuration structure.
///
/// ## Example Configuration File (capturelib.toml)
///
/// ```toml
/// [library]
/// path = "/srv/capture/designs"
/// auto_scan = true
/// scan_subdirectories = true
///
/// [ui]
/// theme = "dark"
/// window_width = 1200
/// window_height = 800
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Library root and scan policy
    pub library: LibraryConfig,

    /// Presentation settings, consumed by front ends only
    pub ui: UiConfig,
}

/// Library root and scan policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Root directory to scan; empty means not configured
    pub path: String,

    /// Rescan the root when the library is opened
    pub auto_scan: bool,

    /// Descend into subdirectories while scanning
    pub scan_subdirectories: bool,

    /// Catalog database location (None = default data directory)
    pub catalog_path: Option<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        LibraryConfig {
            path: String::new(),
            auto_scan: true,
            scan_subdirectories: true,
            catalog_path: None,
        }
    }
}

/// Colour theme for front ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub theme: Theme,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            theme: Theme::Dark,
            window_width: 1200,
            window_height: 800,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default config if no config file exists.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Config::default());
        }

        info!(path = %path.display(), "Loading configuration");
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| CatalogError::config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        info!(path = %path.display(), "Saving configuration");
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CatalogError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("capturelib.toml"))
    }

    /// Get the default data directory path.
    pub fn default_data_dir() -> Result<PathBuf> {
        Ok(project_dirs()?.data_dir().to_path_buf())
    }

    /// Get the catalog database path (from config or default).
    pub fn catalog_path(&self) -> Result<PathBuf> {
        match &self.library.catalog_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::default_data_dir()?.join(CATALOG_FILE_NAME)),
        }
    }

    /// The configured library root, if any.
    pub fn library_root(&self) -> Option<&Path> {
        if self.library.path.is_empty() {
            None
        } else {
            Some(Path::new(&self.library.path))
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
        .ok_or_else(|| CatalogError::config("Could not determine config directory"))
}
