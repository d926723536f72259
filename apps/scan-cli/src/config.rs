//! # Station Configuration
//!
//! Where the receiving station finds its catalog without flags on every
//! invocation.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--catalog`, `--colors`)
//! 2. Environment variables (`WEFT_CATALOG_PATH`, `WEFT_COLORS_PATH`)
//! 3. Config file (`scan.toml` in the platform config dir)
//! 4. Nothing: shape-only commands still work, the rest report the miss
//!
//! ## Config File Format
//! ```toml
//! # scan.toml
//! [catalog]
//! path = "/srv/weft/catalog.json"
//!
//! [colors]
//! path = "/srv/weft/colors.json"
//!
//! [output]
//! pretty = false
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CliResult;

// =============================================================================
// Sections
// =============================================================================

/// Catalog file settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSection {
    /// Path to the catalog JSON file.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Color override file settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColorsSection {
    /// Path to a JSON object of dye code to color name.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    /// Pretty-print decode JSON by default.
    #[serde(default)]
    pub pretty: bool,
}

// =============================================================================
// ScanConfig
// =============================================================================

/// Complete station configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub catalog: CatalogSection,

    #[serde(default)]
    pub colors: ColorsSection,

    #[serde(default)]
    pub output: OutputSection,
}

impl ScanConfig {
    /// Load configuration from file and environment.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (scan.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                debug!(?path, "loading station config");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "no config file, using defaults");
            }
        }

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load config, falling back to defaults if the file is broken.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load station config: {}. Using defaults.", e);
            Self::default()
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("WEFT_CATALOG_PATH") {
            debug!(path = %path, "catalog path from environment");
            self.catalog.path = Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("WEFT_COLORS_PATH") {
            debug!(path = %path, "colors path from environment");
            self.colors.path = Some(PathBuf::from(path));
        }
    }

    /// `scan.toml` in the platform config dir, e.g.
    /// `~/.config/weft-scan/scan.toml` on Linux.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "weft", "weft-scan")
            .map(|dirs| dirs.config_dir().join("scan.toml"))
    }
}

// =============================================================================
// Tests
// =============================================================================
