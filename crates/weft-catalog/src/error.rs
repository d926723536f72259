//! # Catalog Loading Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CatalogError (this module) ← Adds the load-level category              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CLI error ← Rendered for the operator, exit code 1                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Note the asymmetry with the engine: decoding is total and has no error
//! type at all, but *loading* can genuinely fail (missing file, broken
//! JSON) and those failures must be precise enough for an operator to fix.

use thiserror::Error;

/// Catalog loading errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// File could not be read.
    ///
    /// ## When This Occurs
    /// - Path does not exist
    /// - Permission denied
    /// - File is not valid UTF-8
    #[error("catalog file unreadable: {0}")]
    Io(#[from] std::io::Error),

    /// File content is not valid JSON.
    #[error("catalog file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON parsed, but the top-level shape is not something a catalog
    /// can be built from.
    ///
    /// ## When This Occurs
    /// - Top level is a bare number, string, or null
    /// - A `products` container holds a scalar
    /// - A colors file does not hold an object
    #[error("unsupported catalog shape: {detail}")]
    UnsupportedShape { detail: String },
}

impl CatalogError {
    /// Creates an UnsupportedShape error.
    pub fn unsupported_shape(detail: impl Into<String>) -> Self {
        CatalogError::UnsupportedShape {
            detail: detail.into(),
        }
    }
}

/// Result type for catalog loading operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

// =============================================================================
// Tests
// =============================================================================
