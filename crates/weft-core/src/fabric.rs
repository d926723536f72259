//! # Fabric Description Parsing
//!
//! Vendor product descriptions pack the technical sheet into one line:
//!
//! ```text
//! "TECIDO OXFORD 3.00L 100% POLYESTER 109GR/M2"
//!         │       │     │               └── grammage (g/m²)
//!         │       │     └── composition
//!         │       └── width in meters ("L" suffix, comma or dot decimals)
//!         └── free text, ignored
//! ```
//!
//! This module pulls the structured fields back out. Extraction is total:
//! fields that are absent or unreadable stay `None`, and nothing here can
//! fail or panic on any input.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Field Patterns
// =============================================================================

/// Width: decimal number with a comma or dot, suffixed `L`. `"3.00L"`.
static WIDTH_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+[.,]\d+)L").unwrap());

/// Composition: every `NN% FIBER` occurrence. `"65% POLYESTER 35% ALGODAO"`.
static COMPOSITION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+%\s*[A-Z]+").unwrap());

/// Grammage: `"109GR/M2"`, with the trailing `2` optional on older labels.
static GRAMMAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)GR/M2?").unwrap());

// =============================================================================
// FabricInfo
// =============================================================================

/// Structured fields recovered from a vendor product description.
///
/// ## Example
/// ```rust
/// use weft_core::FabricInfo;
///
/// let info = FabricInfo::parse("TECIDO OXFORD 3.00L 100% POLYESTER 109GR/M2");
/// assert_eq!(info.width_m, Some(3.0));
/// assert_eq!(info.composition.as_deref(), Some("100% POLYESTER"));
/// assert_eq!(info.grammage, Some(109));
///
/// assert!(FabricInfo::parse("no technical data here").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FabricInfo {
    /// Roll width in meters.
    pub width_m: Option<f64>,
    /// Fiber composition, blend percentages joined with spaces.
    pub composition: Option<String>,
    /// Weight in grams per square meter.
    pub grammage: Option<u32>,
}

impl FabricInfo {
    /// Extract whatever technical fields the description carries.
    pub fn parse(description: &str) -> Self {
        let width_m = WIDTH_PATTERN
            .captures(description)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().replace(',', ".").parse().ok());

        let parts: Vec<&str> = COMPOSITION_PATTERN
            .find_iter(description)
            .map(|m| m.as_str())
            .collect();
        let composition = (!parts.is_empty()).then(|| parts.join(" "));

        let grammage = GRAMMAGE_PATTERN
            .captures(description)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok());

        Self {
            width_m,
            composition,
            grammage,
        }
    }

    /// True when no field was recovered at all.
    pub fn is_empty(&self) -> bool {
        self.width_m.is_none() && self.composition.is_none() && self.grammage.is_none()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_description() {
        let info = FabricInfo::parse("TECIDO OXFORD 3.00L 100% POLYESTER 109GR/M2");
        assert_eq!(info.width_m, Some(3.0));
        assert_eq!(info.composition.as_deref(), Some("100% POLYESTER"));
        assert_eq!(info.grammage, Some(109));
        assert!(!info.is_empty());
    }

    #[test]
    fn test_comma_decimal_width() {
        let info = FabricInfo::parse("LONETA 1,60L CRU");
        assert_eq!(info.width_m, Some(1.6));
    }

    #[test]
    fn test_blend_composition_joined() {
        let info = FabricInfo::parse("SARJA 65% POLYESTER 35% ALGODAO 240GR/M2");
        assert_eq!(info.composition.as_deref(), Some("65% POLYESTER 35% ALGODAO"));
        assert_eq!(info.grammage, Some(240));
    }

    #[test]
    fn test_grammage_without_trailing_two() {
        let info = FabricInfo::parse("VOIL 45GR/M BRANCO");
        assert_eq!(info.grammage, Some(45));
    }

    #[test]
    fn test_integer_width_is_not_a_width() {
        // A bare "3L" has no decimal part and is not a width marker
        let info = FabricInfo::parse("CAIXA 3L");
        assert_eq!(info.width_m, None);
    }

    #[test]
    fn test_missing_fields_stay_none() {
        let info = FabricInfo::parse("OXFORDINE LISO");
        assert_eq!(info.width_m, None);
        assert_eq!(info.composition, None);
        assert_eq!(info.grammage, None);
        assert!(info.is_empty());
    }

    #[test]
    fn test_empty_description() {
        assert!(FabricInfo::parse("").is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let info = FabricInfo::parse("3.00L 109GR/M2");
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["widthM"], 3.0);
        assert_eq!(value["grammage"], 109);
        assert!(value["composition"].is_null());
    }
}
