//! # Format Parsers & Decode Orchestrator
//!
//! One scanned code goes in, one complete [`DecodedResult`] comes out.
//! Always. The orchestrator runs an explicit ordered chain of format
//! parsers and falls back to an unmapped pass-through when none of them
//! claim the code.
//!
//! ## Parser Chain
//! ```text
//!  scanned code
//!       │  trim + classify
//!       ▼
//!  ┌──────────────┐  miss   ┌──────────────┐  miss   ┌──────────────┐
//!  │  continuous  │ ──────► │  delimited   │ ──────► │    simple    │
//!  │  packed run  │         │  dot-split   │         │  bare probe  │
//!  └──────┬───────┘         └──────┬───────┘         └──────┬───────┘
//!         │ hit                    │ hit or degraded        │ hit
//!         ▼                        ▼                        ▼
//!         └──────────────► DecodedResult ◄─────────────────-┘
//!                                ▲
//!                    all miss: unmapped(code)
//! ```
//!
//! ## Why a const parser slice?
//! Supporting a new vendor format means writing one parser function and
//! inserting it into [`PARSERS`] at the right priority. Nothing else
//! changes: no nested conditionals to re-balance, no orchestrator edits
//! beyond the slice literal.
//!
//! ## Label Anatomy
//! ```text
//!  Coastal packed (after zero strip):
//!  ┌──────────┬───────┬───────┬─────────────┐
//!  │ 20030005 │ 00000 │ 05900 │ 25101300936 │
//!  │ key (8)  │ blk 1 │ blk 2 │ control     │
//!  └──────────┴───────┴───────┴─────────────┘
//!   first non-zero 5-block = quantity in hundredths of a meter
//!
//!  Tessuto delimited:
//!  ┌───────────────┬────────────┬──────────┬────────┬───────┐
//!  │ 0000000147100 │ 0000050000 │ 000SDE100│ 242375 │ 00509 │
//!  │ key           │ qty (mm)   │ color    │ po     │ seq   │
//!  └───────────────┴────────────┴──────────┴────────┴───────┘
//! ```

use tracing::debug;

use crate::catalog::Catalog;
use crate::classify::identify_vendor;
use crate::color::{resolve_color, ColorMap};
use crate::types::{DecodedResult, MatchPattern, Quantity, Vendor};
use crate::{CODE_DELIMITER, UNMAPPED_PRODUCT_NAME};

// =============================================================================
// Packed Format Geometry
// =============================================================================

/// Width of the product-key field at the front of a packed Coastal label.
const PRODUCT_KEY_WIDTH: usize = 8;

/// Width of each packed numeric block after the key.
const QUANTITY_BLOCK_WIDTH: usize = 5;

/// A packed label must carry the key and at least one complete block.
const MIN_PACKED_LEN: usize = PRODUCT_KEY_WIDTH + QUANTITY_BLOCK_WIDTH;

/// Truncated key widths probed when the verbatim key misses. ERP exports
/// historically clipped Coastal keys to these column widths.
const KEY_TRUNCATIONS: &[usize] = &[7, 6, 5];

/// A delimited label needs at least key, quantity, and one trailing segment.
const MIN_DELIMITED_SEGMENTS: usize = 3;

// =============================================================================
// Orchestrator
// =============================================================================

/// Everything a format parser may look at for one scan.
struct DecodeContext<'a> {
    /// Trimmed input.
    code: &'a str,
    /// Shape-based classification of the trimmed input.
    vendor: Vendor,
    catalog: &'a Catalog,
    colors: &'a ColorMap,
}

/// A format parser: `None` hands the code to the next tier.
type FormatParser = fn(&DecodeContext) -> Option<DecodedResult>;

/// The chain, in priority order. Most specific format first.
const PARSERS: &[FormatParser] = &[parse_continuous, parse_delimited, parse_simple];

/// Decode one scanned code against a catalog and color overrides.
///
/// Total: every input, including the empty string, yields a complete
/// [`DecodedResult`]. There is no error path.
///
/// ## Example
/// ```rust
/// use weft_core::{decode, Catalog, ColorMap, MatchPattern, Vendor};
/// use serde_json::json;
///
/// let catalog = Catalog::from_entries([(
///     "20030005".to_string(),
///     json!({"erpCode": "7038", "erpName": "SAILCLOTH", "vendor": "COASTAL"}),
/// )]);
/// let colors = ColorMap::default();
///
/// // A packed Coastal roll label
/// let result = decode("000200300050000005900025101300936", &catalog, &colors);
/// assert_eq!(result.erp_code, "7038");
/// assert_eq!(result.quantity.as_meters(), 59.0);
/// assert_eq!(result.matched_pattern, MatchPattern::Continuous);
///
/// // Garbage still comes back filled in
/// let result = decode("???", &catalog, &colors);
/// assert_eq!(result.erp_code, "???");
/// assert_eq!(result.matched_pattern, MatchPattern::None);
/// assert_eq!(result.vendor, Vendor::Unknown);
/// ```
pub fn decode(code: &str, catalog: &Catalog, colors: &ColorMap) -> DecodedResult {
    let trimmed = code.trim();
    let vendor = identify_vendor(trimmed);
    debug!(code = %trimmed, vendor = %vendor, "classified scan");

    let ctx = DecodeContext {
        code: trimmed,
        vendor,
        catalog,
        colors,
    };
    for parser in PARSERS {
        if let Some(result) = parser(&ctx) {
            debug!(
                code = %trimmed,
                pattern = %result.matched_pattern,
                erp_code = %result.erp_code,
                "decoded scan"
            );
            return result;
        }
    }

    debug!(code = %trimmed, "no format matched, passing through unmapped");
    DecodedResult::unmapped(code)
}

/// Reusable decoder borrowing one catalog and one override map.
///
/// Convenient for batch work: construct once, call [`Decoder::decode`] per
/// scan. Identical semantics to the free [`decode`] function.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    catalog: &'a Catalog,
    colors: &'a ColorMap,
}

impl<'a> Decoder<'a> {
    pub const fn new(catalog: &'a Catalog, colors: &'a ColorMap) -> Self {
        Self { catalog, colors }
    }

    pub fn decode(&self, code: &str) -> DecodedResult {
        decode(code, self.catalog, self.colors)
    }
}

// =============================================================================
// Tier 1: Continuous Packed Parser
// =============================================================================

/// Coastal packed labels: one long digit run, no delimiters.
///
/// Leading zeros are scanner padding and carry nothing; after stripping,
/// the first 8 digits are the product key and the rest splits into 5-digit
/// blocks. The first block with a non-zero value is the quantity, in
/// hundredths of a meter. Whatever follows is control data and is ignored.
fn parse_continuous(ctx: &DecodeContext) -> Option<DecodedResult> {
    if ctx.vendor != Vendor::Coastal || ctx.code.contains(CODE_DELIMITER) {
        return None;
    }

    let stripped = ctx.code.trim_start_matches('0');
    if stripped.len() < MIN_PACKED_LEN || !stripped.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let key = &stripped[..PRODUCT_KEY_WIDTH];
    let quantity = packed_quantity(&stripped[PRODUCT_KEY_WIDTH..]);

    for candidate in key_candidates(key) {
        if let Some(record) = ctx.catalog.find(&candidate) {
            return Some(DecodedResult::mapped(
                candidate,
                quantity,
                "",
                &record,
                MatchPattern::Continuous,
            ));
        }
    }
    None
}

/// Scan complete 5-digit blocks; the first with a non-zero value is the
/// quantity in hundredths of a meter. All-zero blocks mean quantity zero.
fn packed_quantity(blocks: &str) -> Quantity {
    let mut offset = 0;
    while offset + QUANTITY_BLOCK_WIDTH <= blocks.len() {
        let block = &blocks[offset..offset + QUANTITY_BLOCK_WIDTH];
        if let Ok(value) = block.parse::<i64>() {
            if value != 0 {
                return Quantity::from_thousandths(value * 10);
            }
        }
        offset += QUANTITY_BLOCK_WIDTH;
    }
    Quantity::zero()
}

/// Key candidates in probe order: verbatim, zero-normalized, then the
/// historical truncation widths.
fn key_candidates(key: &str) -> Vec<String> {
    let mut candidates = vec![key.to_string()];
    let normalized = key.trim_start_matches('0');
    if !normalized.is_empty() && normalized != key {
        candidates.push(normalized.to_string());
    }
    for width in KEY_TRUNCATIONS {
        candidates.push(key[..*width].to_string());
    }
    candidates
}

// =============================================================================
// Tier 2: Delimited Parser
// =============================================================================

/// Tessuto delimited labels: `key.quantity.marker.po.sequence`.
///
/// The key is segment 0 with leading zeros stripped (kept raw when all
/// zeros), quantity is segment 1 in thousandths of a meter, and the color
/// comes from the first later segment carrying the `SDE` marker. Purchase
/// order and sequence ride along unparsed.
///
/// On a catalog miss this parser still claims the code: the segments were
/// structurally valid, so the extracted quantity and color are worth more
/// than a bare fallback. The result keeps pattern `Delimited` with the
/// unmapped sentinel name.
fn parse_delimited(ctx: &DecodeContext) -> Option<DecodedResult> {
    if !ctx.code.contains(CODE_DELIMITER) {
        return None;
    }
    let segments: Vec<&str> = ctx.code.split(CODE_DELIMITER).collect();
    if segments.len() < MIN_DELIMITED_SEGMENTS {
        return None;
    }

    let raw_key = segments[0];
    let stripped = raw_key.trim_start_matches('0');
    let key = if stripped.is_empty() { raw_key } else { stripped };

    let quantity = delimited_quantity(segments[1]);
    let color = resolve_color(&segments[1..], ctx.colors);

    let mut record = ctx.catalog.find(key);
    if record.is_none() && key != raw_key {
        record = ctx.catalog.find(raw_key);
    }

    Some(match record {
        Some(record) => {
            DecodedResult::mapped(key, quantity, color, &record, MatchPattern::Delimited)
        }
        None => DecodedResult {
            vendor_code: key.to_string(),
            quantity,
            color,
            erp_code: key.to_string(),
            erp_name: UNMAPPED_PRODUCT_NAME.to_string(),
            vendor: ctx.vendor,
            vendor_product: String::new(),
            matched_pattern: MatchPattern::Delimited,
        },
    })
}

/// Quantity segment: an unsigned integer count of thousandths of a meter.
/// Metrage is never negative, so a signed or unparsable segment carries
/// nothing.
fn delimited_quantity(segment: &str) -> Quantity {
    match segment.parse::<i64>() {
        Ok(value) if value >= 0 => Quantity::from_thousandths(value),
        _ => Quantity::zero(),
    }
}

// =============================================================================
// Tier 3: Simple Parser
// =============================================================================

/// Last real tier: probe the code and its numeric normalizations directly.
///
/// Short bare codes are typed or scanned without any quantity on the
/// label, so a hit carries quantity zero; the meters are entered by hand
/// at the station.
fn parse_simple(ctx: &DecodeContext) -> Option<DecodedResult> {
    for candidate in simple_candidates(ctx.code) {
        if let Some(record) = ctx.catalog.find(&candidate) {
            return Some(DecodedResult::mapped(
                candidate,
                Quantity::zero(),
                "",
                &record,
                MatchPattern::Simple,
            ));
        }
    }
    None
}

/// Probe candidates in order: as typed, digits only, zero-stripped, and
/// the integer re-rendering (skipped when it overflows u128).
fn simple_candidates(code: &str) -> Vec<String> {
    let digits: String = code.chars().filter(char::is_ascii_digit).collect();
    let zeroless = digits.trim_start_matches('0');

    let mut candidates = Vec::new();
    push_unique(&mut candidates, code);
    push_unique(&mut candidates, &digits);
    push_unique(&mut candidates, zeroless);
    if let Ok(value) = digits.parse::<u128>() {
        push_unique(&mut candidates, &value.to_string());
    }
    candidates
}

fn push_unique(candidates: &mut Vec<String>, candidate: &str) {
    if !candidate.is_empty() && !candidates.iter().any(|existing| existing == candidate) {
        candidates.push(candidate.to_string());
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_catalog() -> Catalog {
        Catalog::from_entries([
            (
                "20030005".to_string(),
                json!({"erpCode": "7038", "erpName": "SAILCLOTH NATURAL", "vendor": "COASTAL"}),
            ),
            (
                "147100".to_string(),
                json!({
                    "erpCode": "9109",
                    "erpName": "OXFORDINE",
                    "fornecedor_grupo": "TESSUTO",
                    "produtofornecedor": "OXFORD 147100",
                }),
            ),
            (
                "31415".to_string(),
                json!({"codigoERP": "5001", "nomeerp": "CANVAS HEAVY", "supplier": "coastal"}),
            ),
        ])
    }

    fn no_colors() -> ColorMap {
        ColorMap::default()
    }

    // -------------------------------------------------------------------------
    // Totality
    // -------------------------------------------------------------------------

    #[test]
    fn test_decode_is_total_for_any_input() {
        let catalog = sample_catalog();
        let overlong = "9".repeat(100);
        for input in ["", "   ", "???", "abc.def", "0", overlong.as_str()] {
            let result = decode(input, &catalog, &no_colors());
            assert_eq!(result.erp_name, crate::UNMAPPED_PRODUCT_NAME);
            assert_eq!(result.matched_pattern, MatchPattern::None);
            assert_eq!(result.erp_code, input);
            assert_eq!(result.vendor_code, input);
            assert_eq!(result.vendor, Vendor::Unknown);
        }
    }

    #[test]
    fn test_decode_empty_catalog_still_total() {
        let catalog = Catalog::default();
        let result = decode("20030005", &catalog, &no_colors());
        assert!(!result.is_mapped());
        assert_eq!(result.matched_pattern, MatchPattern::None);
    }

    // -------------------------------------------------------------------------
    // Continuous packed tier
    // -------------------------------------------------------------------------

    #[test]
    fn test_continuous_packed_label() {
        let catalog = sample_catalog();
        let result = decode("000200300050000005900025101300936", &catalog, &no_colors());
        assert_eq!(result.matched_pattern, MatchPattern::Continuous);
        assert_eq!(result.vendor_code, "20030005");
        assert_eq!(result.erp_code, "7038");
        assert_eq!(result.erp_name, "SAILCLOTH NATURAL");
        assert_eq!(result.vendor, Vendor::Coastal);
        assert_eq!(result.quantity.as_meters(), 59.0);
        assert_eq!(result.color, "");
    }

    #[test]
    fn test_continuous_all_zero_blocks_mean_zero_quantity() {
        let catalog = sample_catalog();
        // 10 pad zeros + key + 12 zeros: blocks are 00000, 00000, then a
        // short tail that is ignored
        let code = format!("{}20030005{}", "0".repeat(10), "0".repeat(12));
        let result = decode(&code, &catalog, &no_colors());
        assert_eq!(result.matched_pattern, MatchPattern::Continuous);
        assert!(result.quantity.is_zero());
    }

    #[test]
    fn test_continuous_truncated_key_recovery() {
        // Catalog only knows the 5-digit clipped key
        let catalog = Catalog::from_entries([(
            "20030".to_string(),
            json!({"erpCode": "7038", "erpName": "SAILCLOTH", "vendor": "COASTAL"}),
        )]);
        let result = decode("000200300050000005900025101300936", &catalog, &no_colors());
        assert_eq!(result.matched_pattern, MatchPattern::Continuous);
        assert_eq!(result.erp_code, "7038");
        assert_eq!(result.quantity.as_meters(), 59.0);
    }

    #[test]
    fn test_short_coastal_code_falls_through_to_simple() {
        // 8 digits classify Coastal but fail the packed length gate
        let catalog = sample_catalog();
        let result = decode("20030005", &catalog, &no_colors());
        assert_eq!(result.matched_pattern, MatchPattern::Simple);
        assert_eq!(result.erp_code, "7038");
        assert!(result.quantity.is_zero());
    }

    #[test]
    fn test_continuous_miss_falls_through() {
        // Valid packed shape, unknown key, no simple candidate matches
        let catalog = sample_catalog();
        let code = format!("000888777660000005900{}", "1".repeat(12));
        let result = decode(&code, &catalog, &no_colors());
        assert_eq!(result.matched_pattern, MatchPattern::None);
        assert!(!result.is_mapped());
    }

    #[test]
    fn test_packed_quantity_blocks() {
        assert_eq!(packed_quantity("0000005900").as_meters(), 59.0);
        assert_eq!(packed_quantity("1234500000").as_meters(), 123.45);
        assert_eq!(packed_quantity("0000000000").as_meters(), 0.0);
        // Incomplete trailing block is ignored
        assert_eq!(packed_quantity("00000123").as_meters(), 0.0);
        assert_eq!(packed_quantity("").as_meters(), 0.0);
    }

    #[test]
    fn test_key_candidate_order() {
        assert_eq!(
            key_candidates("20030005"),
            vec!["20030005", "2003000", "200300", "20030"],
        );
    }

    // -------------------------------------------------------------------------
    // Delimited tier
    // -------------------------------------------------------------------------

    #[test]
    fn test_delimited_full_label() {
        let catalog = sample_catalog();
        let result = decode(
            "0000000147100.0000050000.000SDE100.242375.00509",
            &catalog,
            &no_colors(),
        );
        assert_eq!(result.matched_pattern, MatchPattern::Delimited);
        assert_eq!(result.vendor_code, "147100");
        assert_eq!(result.erp_code, "9109");
        assert_eq!(result.erp_name, "OXFORDINE");
        assert_eq!(result.vendor, Vendor::Tessuto);
        assert_eq!(result.vendor_product, "OXFORD 147100");
        assert_eq!(result.quantity.as_meters(), 50.0);
        assert_eq!(result.color, "white");
    }

    #[test]
    fn test_delimited_quantity_is_thousandths() {
        let catalog = sample_catalog();
        let result = decode("147100.0000100000.SDE999", &catalog, &no_colors());
        assert_eq!(result.quantity.as_meters(), 100.0);
        assert_eq!(result.color, "black");
    }

    #[test]
    fn test_delimited_unparsable_quantity_is_zero() {
        let catalog = sample_catalog();
        let result = decode("147100.QTY.SDE100", &catalog, &no_colors());
        assert_eq!(result.matched_pattern, MatchPattern::Delimited);
        assert!(result.quantity.is_zero());
    }

    #[test]
    fn test_delimited_signed_quantity_rejected() {
        let catalog = sample_catalog();
        // Catalog hit: the record still maps, the malformed metrage does not
        let result = decode("147100.-5000.SDE100", &catalog, &no_colors());
        assert_eq!(result.matched_pattern, MatchPattern::Delimited);
        assert_eq!(result.erp_code, "9109");
        assert!(result.quantity.is_zero());
        assert_eq!(result.color, "white");

        // The degraded catalog-miss result holds the same floor
        let result = decode("888999.-5000.SDE100", &catalog, &no_colors());
        assert!(!result.is_mapped());
        assert!(result.quantity.is_zero());
    }

    #[test]
    fn test_delimited_quantity_segment() {
        assert_eq!(delimited_quantity("0000050000").as_meters(), 50.0);
        assert!(delimited_quantity("-5000").is_zero());
        assert!(delimited_quantity("QTY").is_zero());
        assert!(delimited_quantity("").is_zero());
    }

    #[test]
    fn test_delimited_catalog_miss_degrades_not_fails() {
        let catalog = sample_catalog();
        let result = decode(
            "0000000888999.0000050000.000SDE999.242375.00509",
            &catalog,
            &no_colors(),
        );
        assert_eq!(result.matched_pattern, MatchPattern::Delimited);
        assert_eq!(result.vendor_code, "888999");
        assert_eq!(result.erp_code, "888999");
        assert_eq!(result.erp_name, crate::UNMAPPED_PRODUCT_NAME);
        assert_eq!(result.vendor, Vendor::Tessuto);
        assert_eq!(result.quantity.as_meters(), 50.0);
        assert_eq!(result.color, "black");
        assert!(!result.is_mapped());
    }

    #[test]
    fn test_delimited_all_zero_key_keeps_raw_segment() {
        let catalog = sample_catalog();
        let result = decode("0000.123.SDE100.x", &catalog, &no_colors());
        assert_eq!(result.matched_pattern, MatchPattern::Delimited);
        assert_eq!(result.vendor_code, "0000");
    }

    #[test]
    fn test_two_segments_skip_delimited_tier() {
        let catalog = sample_catalog();
        let result = decode("147100.50", &catalog, &no_colors());
        // Not enough segments for the delimited tier, but the simple tier
        // still recovers the product through the digit-window variants.
        assert_eq!(result.matched_pattern, MatchPattern::Simple);
        assert_eq!(result.erp_code, "9109");
        assert!(result.quantity.is_zero());
    }

    // -------------------------------------------------------------------------
    // Simple tier
    // -------------------------------------------------------------------------

    #[test]
    fn test_simple_zero_stripped_candidate() {
        let catalog = sample_catalog();
        // 7 digits classify Tessuto; the zero-stripped form hits a record
        // declared by a Coastal vendor. The record's vendor wins.
        let result = decode("0031415", &catalog, &no_colors());
        assert_eq!(result.matched_pattern, MatchPattern::Simple);
        assert_eq!(result.erp_code, "5001");
        assert_eq!(result.vendor, Vendor::Coastal);
        assert!(result.quantity.is_zero());
        assert_eq!(result.color, "");
    }

    #[test]
    fn test_simple_input_is_trimmed() {
        let catalog = sample_catalog();
        let result = decode("  20030005  ", &catalog, &no_colors());
        assert_eq!(result.matched_pattern, MatchPattern::Simple);
        assert_eq!(result.vendor_code, "20030005");
    }

    #[test]
    fn test_simple_candidate_order() {
        assert_eq!(
            simple_candidates("0147100"),
            vec!["0147100", "147100"],
        );
        // Non-digit characters drop out for the digit candidates
        assert_eq!(
            simple_candidates("A-0147100"),
            vec!["A-0147100", "0147100", "147100"],
        );
    }

    #[test]
    fn test_simple_overflow_candidate_skipped() {
        let huge = "9".repeat(60);
        let candidates = simple_candidates(&huge);
        assert_eq!(candidates, vec![huge.clone()]);
    }

    // -------------------------------------------------------------------------
    // Orchestration
    // -------------------------------------------------------------------------

    #[test]
    fn test_color_override_reaches_the_decoder() {
        let catalog = sample_catalog();
        let mut colors = ColorMap::new();
        colors.insert("103", "overdye lot");
        let result = decode("147100.0000050000.SDE103", &catalog, &colors);
        assert_eq!(result.color, "overdye lot");
    }

    #[test]
    fn test_decoder_matches_free_function() {
        let catalog = sample_catalog();
        let colors = no_colors();
        let decoder = Decoder::new(&catalog, &colors);
        for code in ["20030005", "0000000147100.0000050000.000SDE100.242375.00509", "???"] {
            assert_eq!(decoder.decode(code), decode(code, &catalog, &colors));
        }
    }
}
