//! # weft-core: Pure Decode Engine for WeftScan
//!
//! This crate is the **heart** of WeftScan. It recovers the canonical ERP
//! product record, received quantity, and color from a supplier roll-label
//! code, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        WeftScan Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Receiving Station (scan-cli)                   │   │
//! │  │    scan / type code ──► decode ──► fill receiving form          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 ★ weft-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ classify  │  │  decode   │  │  catalog  │  │  variants │  │   │
//! │  │   │  Vendor   │  │  parsers  │  │   index   │  │  expand   │  │   │
//! │  │   │  bands    │  │  chain    │  │   find    │  │  windows  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐                                 │   │
//! │  │   │   color   │  │  fabric   │                                 │   │
//! │  │   │  markers  │  │  widths   │                                 │   │
//! │  │   └───────────┘  └───────────┘                                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO NETWORK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 weft-catalog (File Loading)                     │   │
//! │  │          catalog JSON parsing, shape tolerance, cleaning        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Vendor, Quantity, DecodedResult, etc.)
//! - [`classify`] - Vendor classification from the shape of a raw code
//! - [`variants`] - Normalized lookup-variant expansion
//! - [`catalog`] - In-memory catalog with a memoized reverse-lookup index
//! - [`color`] - Color marker tables and resolution
//! - [`decode`] - Format parsers and the decode orchestrator
//! - [`fabric`] - Width/composition/grammage extraction from descriptions
//!
//! ## Design Principles
//!
//! 1. **Total Decoding**: Every input, however malformed, yields a complete
//!    [`DecodedResult`] - there is no error path out of `decode`
//! 2. **Pure Functions**: Same (code, catalog, colors) = same result; the
//!    memoized index is a cache, never an observable state change
//! 3. **Integer Quantities**: Metrage is integer thousandths of a meter
//!    (i64), floats are for display only
//! 4. **Declarative Domain Data**: Color tables and field-alias lists are
//!    constants, not branching logic
//!
//! ## Example Usage
//!
//! ```rust
//! use weft_core::{decode, Catalog, ColorMap, MatchPattern};
//! use serde_json::json;
//!
//! let catalog = Catalog::from_entries([(
//!     "147100".to_string(),
//!     json!({"erpCode": "9109", "erpName": "OXFORDINE", "vendor": "TESSUTO"}),
//! )]);
//!
//! // A delimited Tessuto label: key.quantity.marker.po.sequence
//! let result = decode(
//!     "0000000147100.0000050000.000SDE100.242375.00509",
//!     &catalog,
//!     &ColorMap::default(),
//! );
//!
//! assert_eq!(result.erp_code, "9109");
//! assert_eq!(result.quantity.as_meters(), 50.0);
//! assert_eq!(result.color, "white");
//! assert_eq!(result.matched_pattern, MatchPattern::Delimited);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod classify;
pub mod color;
pub mod decode;
pub mod fabric;
pub mod types;
pub mod variants;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use weft_core::Catalog` instead of
// `use weft_core::catalog::Catalog`

pub use catalog::{Catalog, CatalogIndex, IndexStats};
pub use classify::{identify_vendor, is_valid_format};
pub use color::{resolve_color, ColorMap};
pub use decode::{decode, Decoder};
pub use fabric::FabricInfo;
pub use types::{DecodedResult, MatchPattern, ProductRecord, Quantity, Vendor};
pub use variants::expand;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sentinel ERP name for codes that hit no catalog record.
///
/// ## Why a constant?
/// The receiving UI keys off this exact string to highlight rows that need
/// manual attention, so every fallback path must produce the same spelling.
pub const UNMAPPED_PRODUCT_NAME: &str = "UNMAPPED PRODUCT";

/// Segment separator used by delimited label formats.
pub const CODE_DELIMITER: char = '.';

/// Tag that introduces an embedded color code inside a marker segment.
pub const COLOR_MARKER: &str = "SDE";
