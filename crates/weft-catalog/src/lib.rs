//! # weft-catalog: Catalog File Loading for WeftScan
//!
//! This crate owns every byte of file I/O in WeftScan. It reads catalog
//! files in whatever shape the ERP export history produced and hands the
//! pure engine a ready [`weft_core::Catalog`] plus color overrides.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        WeftScan Data Flow                               │
//! │                                                                         │
//! │  catalog.json on disk                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  weft-catalog (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐         ┌────────────────────────────┐    │   │
//! │  │   │   loader.rs   │         │         error.rs           │    │   │
//! │  │   │               │         │                            │    │   │
//! │  │   │ shape detect  │         │ CatalogError               │    │   │
//! │  │   │ row cleaning  │         │   Io / Json /              │    │   │
//! │  │   │ color merge   │         │   UnsupportedShape         │    │   │
//! │  │   └───────────────┘         └────────────────────────────┘    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  weft_core::Catalog + ColorMap (pure, ready to decode against)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`loader`] - File reading, shape detection, row normalization
//! - [`error`] - Typed load errors and the `CatalogResult` alias
//!
//! ## Usage
//!
//! ```rust,ignore
//! use weft_catalog::load_path;
//!
//! let file = load_path("catalog.json")?;
//! println!("{} products loaded at {}", file.products, file.loaded_at);
//! let result = weft_core::decode(code, &file.catalog, &file.colors);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod loader;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{CatalogError, CatalogResult};
pub use loader::{load_colors_path, load_path, parse_colors_str, parse_str, CatalogFile};
