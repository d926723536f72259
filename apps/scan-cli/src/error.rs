//! # CLI Error Type
//!
//! One error enum for everything that can stop a command before it prints.
//! Decoding itself never fails; what can fail is reaching a usable catalog:
//! missing path, unreadable file, bad JSON, broken config TOML.
//!
//! `main` prints the message to stderr and exits 1. The only other nonzero
//! exit is `validate`'s code 2, which is a verdict, not an error.

use weft_catalog::CatalogError;

/// Anything that stops a command from running.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Catalog or color file could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Station config file exists but is not valid TOML.
    #[error("config file is not valid TOML: {0}")]
    Config(#[from] toml::de::Error),

    /// Config file was named but could not be read.
    #[error("config file unreadable: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// A decode result failed to serialize. Does not happen for our DTOs,
    /// but the writer can still fail on a closed pipe.
    #[error("could not write result: {0}")]
    Output(#[from] serde_json::Error),

    /// No catalog path from any source.
    #[error(
        "no catalog file: pass --catalog, set WEFT_CATALOG_PATH, or configure [catalog] path in scan.toml"
    )]
    MissingCatalog,
}

pub type CliResult<T> = Result<T, CliError>;

// =============================================================================
// Tests
// =============================================================================
