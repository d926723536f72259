//! # Core Domain Types
//!
//! Foundational types shared by every WeftScan layer. They are plain data:
//! serializable, cloneable, and free of behavior beyond small accessors, so
//! the CLI, future scanner front-ends, and tests all speak the same language.
//!
//! ## Type Summary
//! ```text
//! ┌────────────────┬────────────────────────────────────────────────────┐
//! │ Type           │ Purpose                                            │
//! ├────────────────┼────────────────────────────────────────────────────┤
//! │ Vendor         │ Which supplier printed the label                   │
//! │ Quantity       │ Metrage in integer thousandths of a meter          │
//! │ MatchPattern   │ Which label format produced a decode               │
//! │ ProductRecord  │ Canonical catalog row after normalization          │
//! │ DecodedResult  │ Complete outcome of decoding one scanned code      │
//! └────────────────┴────────────────────────────────────────────────────┘
//! ```
//!
//! All DTOs serialize with camelCase field names and export TypeScript
//! bindings via ts-rs, so a future browser/Tauri receiving screen can share
//! the exact same shapes.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::UNMAPPED_PRODUCT_NAME;

// =============================================================================
// Vendor
// =============================================================================

/// Supplier identity inferred from the shape of a scanned code.
///
/// ## Why an enum and not a string?
/// Vendor drives which parsers are even attempted, so typos in free-text
/// labels must not leak into control flow. Catalog rows carry arbitrary
/// spellings; [`Vendor::from_label`] folds them into these three values
/// exactly once, at index-build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum Vendor {
    /// Coastal mills: packed continuous digit labels and short numeric codes.
    Coastal,
    /// Tessuto srl: dot-delimited labels with embedded color markers.
    Tessuto,
    /// Anything we cannot attribute. Decoding still proceeds.
    #[default]
    Unknown,
}

impl Vendor {
    /// Normalize a free-text vendor label from a catalog row.
    ///
    /// Trims whitespace and uppercases before matching, so `" tessuto "`
    /// and `"TESSUTO"` both resolve to [`Vendor::Tessuto`]. Unrecognized
    /// labels become [`Vendor::Unknown`] rather than an error.
    ///
    /// ## Example
    /// ```rust
    /// use weft_core::Vendor;
    ///
    /// assert_eq!(Vendor::from_label("coastal"), Vendor::Coastal);
    /// assert_eq!(Vendor::from_label("  TESSUTO "), Vendor::Tessuto);
    /// assert_eq!(Vendor::from_label("ACME"), Vendor::Unknown);
    /// ```
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "COASTAL" => Self::Coastal,
            "TESSUTO" => Self::Tessuto,
            _ => Self::Unknown,
        }
    }

    /// Uppercase wire name, matching the serde representation.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Coastal => "COASTAL",
            Self::Tessuto => "TESSUTO",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Quantity
// =============================================================================

/// Metrage expressed as integer thousandths of a meter.
///
/// ## Why integers?
/// Labels encode quantities as scaled integers (`0000050000` means fifty
/// meters), and floating-point accumulation drifts over a day of receiving.
/// Storing thousandths in an `i64` keeps arithmetic exact; floats exist
/// only at the display edge via [`Quantity::as_meters`].
///
/// ## Example
/// ```rust
/// use weft_core::Quantity;
///
/// let qty = Quantity::from_thousandths(59_000);
/// assert_eq!(qty.as_meters(), 59.0);
/// assert_eq!(qty.to_string(), "59.000");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Quantity(i64);

impl Quantity {
    /// Zero meters. Used by formats that carry no quantity at all.
    #[inline]
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Build from raw thousandths of a meter.
    #[inline]
    pub const fn from_thousandths(thousandths: i64) -> Self {
        Self(thousandths)
    }

    /// Raw thousandths of a meter.
    #[inline]
    pub const fn thousandths(&self) -> i64 {
        self.0
    }

    /// True when no metrage was recovered.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Convert to meters for display. Never use the result for arithmetic.
    #[inline]
    pub fn as_meters(&self) -> f64 {
        self.0 as f64 / 1000.0
    }
}

impl fmt::Display for Quantity {
    /// Formats as meters with exactly three decimals, e.g. `59.000`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}{}.{:03}", sign, abs / 1000, abs % 1000)
    }
}

// =============================================================================
// MatchPattern
// =============================================================================

/// Which label format the decode pipeline ultimately matched.
///
/// Surfaced in every [`DecodedResult`] so operators and logs can tell *how*
/// a code was understood, not just what it resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MatchPattern {
    /// Packed continuous digit run (Coastal roll labels).
    Continuous,
    /// Dot-delimited segments (Tessuto roll labels).
    Delimited,
    /// Short bare code probed directly against the catalog.
    Simple,
    /// No parser produced a result; the code passed through unmapped.
    #[default]
    None,
}

impl MatchPattern {
    /// Lowercase wire name, matching the serde representation.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Continuous => "continuous",
            Self::Delimited => "delimited",
            Self::Simple => "simple",
            Self::None => "none",
        }
    }
}

impl fmt::Display for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ProductRecord
// =============================================================================

/// One catalog row after field-alias normalization.
///
/// Raw catalog JSON arrives with whatever field spellings the export tool of
/// the week produced. The catalog index flattens every accepted spelling
/// into this fixed shape; downstream code never sees the aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductRecord {
    /// Canonical ERP product code, e.g. `"9109"`.
    pub erp_code: String,
    /// Human-readable ERP product name.
    pub erp_name: String,
    /// Supplier this record belongs to.
    pub vendor: Vendor,
    /// The supplier's own article reference, when the export carried one.
    pub vendor_product: String,
}

// =============================================================================
// DecodedResult
// =============================================================================

/// Complete outcome of decoding one scanned code.
///
/// ## Why is there no error variant?
/// Decoding is total. A receiving clerk has a roll in hand whether or not
/// software liked the label, so even garbage input yields a filled result
/// with the raw code preserved and the [`UNMAPPED_PRODUCT_NAME`] sentinel
/// as the name. The form always gets populated; some rows just need a human.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DecodedResult {
    /// Vendor-side key the catalog was matched on (or the raw code if none).
    pub vendor_code: String,
    /// Recovered metrage. Zero when the format carries none.
    pub quantity: Quantity,
    /// Resolved color name, empty when the format carries none.
    pub color: String,
    /// ERP product code, or the raw code when unmapped.
    pub erp_code: String,
    /// ERP product name, or [`UNMAPPED_PRODUCT_NAME`] when unmapped.
    pub erp_name: String,
    /// Supplier attribution for this decode.
    pub vendor: Vendor,
    /// The supplier's own article reference, when known.
    pub vendor_product: String,
    /// Which format parser produced this result.
    pub matched_pattern: MatchPattern,
}

impl DecodedResult {
    /// Fallback result for a code nothing could interpret.
    ///
    /// The raw code is preserved in both `vendor_code` and `erp_code` so the
    /// receiving form still shows what was scanned.
    pub fn unmapped(code: &str) -> Self {
        Self {
            vendor_code: code.to_string(),
            quantity: Quantity::zero(),
            color: String::new(),
            erp_code: code.to_string(),
            erp_name: UNMAPPED_PRODUCT_NAME.to_string(),
            vendor: Vendor::Unknown,
            vendor_product: String::new(),
            matched_pattern: MatchPattern::None,
        }
    }

    /// Successful result backed by a real catalog record.
    pub fn mapped(
        vendor_code: impl Into<String>,
        quantity: Quantity,
        color: impl Into<String>,
        record: &ProductRecord,
        matched_pattern: MatchPattern,
    ) -> Self {
        Self {
            vendor_code: vendor_code.into(),
            quantity,
            color: color.into(),
            erp_code: record.erp_code.clone(),
            erp_name: record.erp_name.clone(),
            vendor: record.vendor,
            vendor_product: record.vendor_product.clone(),
            matched_pattern,
        }
    }

    /// True when this result carries a real catalog record.
    #[inline]
    pub fn is_mapped(&self) -> bool {
        self.erp_name != UNMAPPED_PRODUCT_NAME
    }
}

// =============================================================================
// Tests
// =============================================================================
