//! # Catalog File Loading
//!
//! Reads catalog JSON from disk and turns it into a ready
//! [`weft_core::Catalog`] plus color overrides, whatever shape the file is
//! in. The ERP export tooling has changed several times over the years and
//! every era's files are still in circulation, so the loader meets them
//! all:
//!
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────────────────┐
//! │ Shape                        │ Handling                                 │
//! ├──────────────────────────────┼──────────────────────────────────────────┤
//! │ {"products": {...},          │ Containers unwrapped, colors lifted      │
//! │  "colors": {...}}            │ into the override map                    │
//! │ {"147100": {...}, ...}       │ Root object is the product container     │
//! │ [{row}, {row}, ...]          │ Raw export rows, cleaned one by one      │
//! │ {"products": [{row}, ...]}   │ Rows inside a container                  │
//! └──────────────────────────────┴──────────────────────────────────────────┘
//! ```
//!
//! ## Row Cleaning Rules
//! - Lookup key: vendor code reduced to digits, leading zeros stripped;
//!   rows without a usable key are skipped and counted, never fatal
//! - ERP codes lose Excel decimal tails (`"14527.0"` becomes `"14527"`)
//! - Vendor labels are trimmed and uppercased
//! - Later rows win over earlier rows with the same key (re-exports append
//!   corrected rows at the end)
//!
//! Loads are logged with totals and skip counts so a bad export is visible
//! the moment it is pointed at.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use weft_core::catalog::field_text;
use weft_core::{Catalog, ColorMap};

use crate::error::{CatalogError, CatalogResult};

// =============================================================================
// Container Fields
// =============================================================================

/// Keys that may hold the product container inside an object-shaped file,
/// in priority order. Absent all of them, the root object itself is it.
const PRODUCT_CONTAINER_FIELDS: &[&str] = &["products", "produtos", "lookup", "mapa", "data"];

/// Keys that may hold the color override map.
const COLOR_CONTAINER_FIELDS: &[&str] = &["colors", "colorMap", "mapeamentoCores"];

// =============================================================================
// CatalogFile
// =============================================================================

/// One loaded catalog file, ready to decode against.
#[derive(Debug)]
pub struct CatalogFile {
    /// The staged catalog. Its index builds lazily on first lookup.
    pub catalog: Catalog,
    /// Color overrides found in the file, possibly empty.
    pub colors: ColorMap,
    /// Entries staged into the catalog.
    pub products: usize,
    /// Rows dropped during loading (no usable key, or not an object).
    pub skipped: usize,
    /// When this load happened.
    pub loaded_at: DateTime<Utc>,
}

// =============================================================================
// Public API
// =============================================================================

/// Load a catalog file from disk.
pub fn load_path(path: impl AsRef<Path>) -> CatalogResult<CatalogFile> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading catalog file");
    let text = fs::read_to_string(path)?;
    parse_str(&text)
}

/// Parse catalog JSON already in memory.
///
/// ## Example
/// ```rust
/// use weft_catalog::parse_str;
///
/// let file = parse_str(r#"{
///     "products": {"147100": {"erpCode": "9109", "erpName": "OXFORDINE"}},
///     "colors": {"103": "overdye lot"}
/// }"#).unwrap();
///
/// assert_eq!(file.products, 1);
/// assert!(file.catalog.find("147100").is_some());
/// assert_eq!(file.colors.get("103"), Some("overdye lot"));
/// ```
pub fn parse_str(json: &str) -> CatalogResult<CatalogFile> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(rows) => Ok(from_rows(rows, ColorMap::default())),
        Value::Object(mut object) => {
            let colors = extract_colors(&mut object);
            match extract_container(&mut object) {
                Value::Array(rows) => Ok(from_rows(rows, colors)),
                Value::Object(products) => Ok(assemble(products, colors, 0)),
                other => Err(CatalogError::unsupported_shape(format!(
                    "product container is {}, expected an object or an array",
                    json_kind(&other),
                ))),
            }
        }
        other => Err(CatalogError::unsupported_shape(format!(
            "top level is {}, expected an object or an array",
            json_kind(&other),
        ))),
    }
}

/// Load a standalone color override file (JSON object of code to name).
pub fn load_colors_path(path: impl AsRef<Path>) -> CatalogResult<ColorMap> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading color override file");
    let text = fs::read_to_string(path)?;
    parse_colors_str(&text)
}

/// Parse a color override file already in memory.
///
/// Accepts a bare `{"103": "dyed"}` object or the same wrapped under one
/// of the color container keys. Non-string values are dropped.
pub fn parse_colors_str(json: &str) -> CatalogResult<ColorMap> {
    let Value::Object(object) = serde_json::from_str::<Value>(json)? else {
        return Err(CatalogError::unsupported_shape(
            "color file must be a JSON object of code to name",
        ));
    };
    for field in COLOR_CONTAINER_FIELDS {
        if let Some(Value::Object(inner)) = object.get(*field) {
            return Ok(collect_colors(inner));
        }
    }
    Ok(collect_colors(&object))
}

// =============================================================================
// Object Shape
// =============================================================================

/// Pull the color override map out of an object-shaped file, removing the
/// container key so it never pollutes the product set.
fn extract_colors(object: &mut Map<String, Value>) -> ColorMap {
    for field in COLOR_CONTAINER_FIELDS {
        let Some(value) = object.remove(*field) else {
            continue;
        };
        match value {
            Value::Object(entries) => return collect_colors(&entries),
            other => {
                warn!(
                    field = *field,
                    kind = json_kind(&other),
                    "color container has unexpected shape, ignoring"
                );
                return ColorMap::default();
            }
        }
    }
    ColorMap::default()
}

/// The product container: the first known container key, or whatever is
/// left of the root object.
fn extract_container(object: &mut Map<String, Value>) -> Value {
    for field in PRODUCT_CONTAINER_FIELDS {
        if let Some(value) = object.remove(*field) {
            return value;
        }
    }
    Value::Object(std::mem::take(object))
}

fn collect_colors(entries: &Map<String, Value>) -> ColorMap {
    entries
        .iter()
        .filter_map(|(code, name)| name.as_str().map(|name| (code.clone(), name.to_string())))
        .collect()
}

// =============================================================================
// Array Shape (raw export rows)
// =============================================================================

/// One raw export row. Field spellings vary by export era; serde aliases
/// absorb them, and every value stays loose until cleaned.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogRow {
    #[serde(alias = "codigoprodutofornecedor")]
    vendor_code: Option<Value>,
    #[serde(alias = "codigoerp")]
    erp_code: Option<Value>,
    #[serde(alias = "nomeerp")]
    erp_name: Option<Value>,
    #[serde(alias = "fornecedor_grupo", alias = "fornecedor")]
    vendor: Option<Value>,
    #[serde(alias = "produtofornecedor")]
    vendor_product: Option<Value>,
    ncm: Option<Value>,
    #[serde(alias = "unidademedida")]
    unit: Option<Value>,
}

fn from_rows(rows: Vec<Value>, colors: ColorMap) -> CatalogFile {
    let total = rows.len();
    let mut entries = Vec::with_capacity(total);
    let mut skipped = 0usize;

    for row in rows {
        let Ok(parsed) = serde_json::from_value::<CatalogRow>(row) else {
            skipped += 1;
            continue;
        };
        match stage_record(parsed) {
            Some(entry) => entries.push(entry),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(total, skipped, "catalog rows skipped during load");
    }
    assemble(entries, colors, skipped)
}

/// Clean one parsed row into a `(key, record)` pair, or `None` when the
/// row has no usable lookup key.
fn stage_record(row: CatalogRow) -> Option<(String, Value)> {
    let key_source = row.vendor_code.as_ref().and_then(field_text)?;
    let key = digits_key(&key_source);
    if key.is_empty() {
        return None;
    }

    let mut record = Map::new();
    record.insert("vendorCode".to_string(), Value::String(key_source));
    if let Some(code) = row.erp_code.as_ref().and_then(field_text) {
        let code = clip_decimal_tail(&code).to_string();
        record.insert("erpCode".to_string(), Value::String(code));
    }
    if let Some(name) = row.erp_name.as_ref().and_then(field_text) {
        record.insert("erpName".to_string(), Value::String(name));
    }
    if let Some(vendor) = row.vendor.as_ref().and_then(field_text) {
        record.insert("vendor".to_string(), Value::String(vendor.to_ascii_uppercase()));
    }
    if let Some(product) = row.vendor_product.as_ref().and_then(field_text) {
        record.insert("vendorProduct".to_string(), Value::String(product));
    }
    if let Some(ncm) = row.ncm.as_ref().and_then(field_text) {
        record.insert("ncm".to_string(), Value::String(ncm));
    }
    if let Some(unit) = row.unit.as_ref().and_then(field_text) {
        record.insert("unit".to_string(), Value::String(unit));
    }

    Some((key, Value::Object(record)))
}

/// Reduce a vendor code to its digits and strip leading zeros. Empty means
/// the row cannot be looked up and should be skipped.
fn digits_key(text: &str) -> String {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.trim_start_matches('0').to_string()
}

/// Drop an Excel decimal tail: `"14527.0"` becomes `"14527"`.
fn clip_decimal_tail(code: &str) -> &str {
    match code.split_once('.') {
        Some((head, _)) => head,
        None => code,
    }
}

// =============================================================================
// Assembly
// =============================================================================

fn assemble(
    entries: impl IntoIterator<Item = (String, Value)>,
    colors: ColorMap,
    skipped: usize,
) -> CatalogFile {
    let catalog = Catalog::from_entries(entries);
    let products = catalog.len();
    info!(products, colors = colors.len(), skipped, "catalog ready");
    CatalogFile {
        catalog,
        colors,
        products,
        skipped,
        loaded_at: Utc::now(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::Vendor;

    #[test]
    fn test_object_shape_with_containers() {
        let file = parse_str(
            r#"{
                "products": {
                    "147100": {"erpCode": "9109", "erpName": "OXFORDINE", "vendor": "TESSUTO"}
                },
                "colors": {"103": "overdye lot"}
            }"#,
        )
        .unwrap();

        assert_eq!(file.products, 1);
        assert_eq!(file.skipped, 0);
        assert_eq!(file.colors.get("103"), Some("overdye lot"));
        let record = file.catalog.find("147100").unwrap();
        assert_eq!(record.erp_code, "9109");
        assert_eq!(record.vendor, Vendor::Tessuto);
    }

    #[test]
    fn test_object_shape_bare_root() {
        let file = parse_str(
            r#"{
                "147100": {"erpCode": "9109", "erpName": "OXFORDINE"},
                "20030005": {"erpCode": "7038", "erpName": "SAILCLOTH"}
            }"#,
        )
        .unwrap();

        assert_eq!(file.products, 2);
        assert!(file.catalog.find("147100").is_some());
        assert!(file.catalog.find("20030005").is_some());
        assert!(file.colors.is_empty());
    }

    #[test]
    fn test_legacy_container_names() {
        let file = parse_str(
            r#"{
                "produtos": {"31415": {"codigoERP": "5001", "nomeerp": "CANVAS"}},
                "mapeamentoCores": {"777": "coral"}
            }"#,
        )
        .unwrap();

        assert_eq!(file.products, 1);
        assert_eq!(file.colors.get("777"), Some("coral"));

        // "mapa" era dumps unwrap the same way
        let file = parse_str(
            r#"{"mapa": {"20030005": {"erpCode": "7038", "erpName": "SAILCLOTH"}}}"#,
        )
        .unwrap();
        assert_eq!(file.products, 1);
        assert!(file.catalog.find("20030005").is_some());
    }

    #[test]
    fn test_rows_with_legacy_fields() {
        let file = parse_str(
            r#"[{
                "codigoprodutofornecedor": "0000147100",
                "codigoerp": "14527.0",
                "nomeerp": "OXFORDINE",
                "fornecedor_grupo": " tessuto ",
                "produtofornecedor": "OXFORD 147100",
                "ncm": "5407.61.00",
                "unidademedida": "MT"
            }]"#,
        )
        .unwrap();

        assert_eq!(file.products, 1);
        assert_eq!(file.skipped, 0);
        let record = file.catalog.find("147100").unwrap();
        assert_eq!(record.erp_code, "14527");
        assert_eq!(record.erp_name, "OXFORDINE");
        assert_eq!(record.vendor, Vendor::Tessuto);
        assert_eq!(record.vendor_product, "OXFORD 147100");
    }

    #[test]
    fn test_rows_with_modern_fields() {
        let file = parse_str(
            r#"[{
                "vendorCode": 889900,
                "erpCode": 7038,
                "erpName": "SAILCLOTH",
                "vendor": "coastal"
            }]"#,
        )
        .unwrap();

        let record = file.catalog.find("889900").unwrap();
        assert_eq!(record.erp_code, "7038");
        assert_eq!(record.vendor, Vendor::Coastal);
    }

    #[test]
    fn test_rows_without_usable_key_are_skipped() {
        let file = parse_str(
            r#"[
                {"erpCode": "1", "erpName": "NO KEY AT ALL"},
                {"vendorCode": "no digits here", "erpCode": "2", "erpName": "X"},
                {"vendorCode": "0000", "erpCode": "3", "erpName": "Y"},
                "not even an object",
                {"vendorCode": "555000", "erpCode": "4", "erpName": "KEPT"}
            ]"#,
        )
        .unwrap();

        assert_eq!(file.products, 1);
        assert_eq!(file.skipped, 4);
        assert_eq!(file.catalog.find("555000").unwrap().erp_code, "4");
    }

    #[test]
    fn test_rows_last_duplicate_wins() {
        let file = parse_str(
            r#"[
                {"vendorCode": "147100", "erpCode": "OLD", "erpName": "A"},
                {"vendorCode": "0147100", "erpCode": "NEW", "erpName": "B"}
            ]"#,
        )
        .unwrap();

        assert_eq!(file.products, 1);
        assert_eq!(file.catalog.find("147100").unwrap().erp_code, "NEW");
    }

    #[test]
    fn test_rows_inside_container() {
        let file = parse_str(
            r#"{
                "data": [{"vendorCode": "31415", "erpCode": "5001", "erpName": "CANVAS"}],
                "colors": {"103": "dyed lot"}
            }"#,
        )
        .unwrap();

        assert_eq!(file.products, 1);
        assert_eq!(file.colors.get("103"), Some("dyed lot"));
        assert!(file.catalog.find("31415").is_some());
    }

    #[test]
    fn test_unsupported_shapes() {
        assert!(matches!(
            parse_str("42"),
            Err(CatalogError::UnsupportedShape { .. }),
        ));
        assert!(matches!(
            parse_str("\"catalog\""),
            Err(CatalogError::UnsupportedShape { .. }),
        ));
        assert!(matches!(
            parse_str("null"),
            Err(CatalogError::UnsupportedShape { .. }),
        ));
        assert!(matches!(
            parse_str(r#"{"products": 42}"#),
            Err(CatalogError::UnsupportedShape { .. }),
        ));
    }

    #[test]
    fn test_invalid_json_is_a_json_error() {
        assert!(matches!(parse_str("{nope"), Err(CatalogError::Json(_))));
    }

    #[test]
    fn test_parse_colors_variants() {
        let bare = parse_colors_str(r#"{"103": "dyed", "777": "coral"}"#).unwrap();
        assert_eq!(bare.get("103"), Some("dyed"));
        assert_eq!(bare.len(), 2);

        let wrapped = parse_colors_str(r#"{"colors": {"103": "dyed"}}"#).unwrap();
        assert_eq!(wrapped.get("103"), Some("dyed"));
        assert_eq!(wrapped.len(), 1);

        // Non-string values are dropped
        let mixed = parse_colors_str(r#"{"103": "dyed", "bad": 42}"#).unwrap();
        assert_eq!(mixed.len(), 1);

        assert!(matches!(
            parse_colors_str("[1, 2]"),
            Err(CatalogError::UnsupportedShape { .. }),
        ));
    }

    #[test]
    fn test_load_path_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"{"products": {"147100": {"erpCode": "9109", "erpName": "OXFORDINE"}}}"#,
        )
        .unwrap();

        let file = load_path(&path).unwrap();
        assert_eq!(file.products, 1);
        assert!(file.loaded_at <= Utc::now());

        let colors_path = dir.path().join("colors.json");
        fs::write(&colors_path, r#"{"103": "dyed"}"#).unwrap();
        let colors = load_colors_path(&colors_path).unwrap();
        assert_eq!(colors.get("103"), Some("dyed"));
    }

    #[test]
    fn test_load_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(load_path(missing), Err(CatalogError::Io(_))));
    }
}
