//! # Catalog & Reverse-Lookup Index
//!
//! The catalog is the product mapping the receiving station runs against:
//! declared keys (usually vendor codes) pointing at loose JSON records.
//! Records arrive from years of ERP exports, so field names and value types
//! vary row by row; normalization happens here, exactly once, when the
//! index is built.
//!
//! ## Lookup Flow
//! ```text
//!  find("0020030005")
//!       │
//!       ├─► exact map: declared keys verbatim ──────────► hit? done
//!       │
//!       └─► expand() variants, probed in order ─────────► first hit wins
//!                against the variant map
//! ```
//!
//! ## Why memoize the index inside the catalog?
//! Building the index walks every record and registers every `expand()`
//! variant, which is far too much work to repeat per scan. The catalog is
//! immutable after construction, so the index can never go stale: it lives
//! in a `OnceLock`, is built on first lookup, and dies with the catalog.
//! Swapping catalogs means constructing a new `Catalog`, which starts with
//! an empty cell. Two catalogs with equal content still build independent
//! indices; the index is a cache, never shared state.
//!
//! ## Collision Policy
//! - Exact declared keys always win: `find` consults the exact map before
//!   any variant, so one record's generated variant can never shadow
//!   another record's declared key
//! - Within the variant map, first registration wins; declared keys are
//!   iterated in sorted order, so the winner is deterministic

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};

use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{ProductRecord, Vendor};
use crate::variants::expand;

// =============================================================================
// Field Alias Lists
// =============================================================================
// Every spelling the ERP export history has produced, in priority order:
// the first present, non-blank field wins. The Portuguese names are the
// legacy export eras and must keep working.

const ERP_CODE_FIELDS: &[&str] = &["erpCode", "erp_code", "codigoERP", "codigoerp"];
const ERP_NAME_FIELDS: &[&str] = &["erpName", "erp_name", "nomeERP", "nomeerp"];
const VENDOR_FIELDS: &[&str] = &["vendor", "supplier", "fornecedor", "fornecedor_grupo"];
const VENDOR_PRODUCT_FIELDS: &[&str] = &[
    "vendorProduct",
    "vendor_product",
    "produtoFornecedor",
    "produtofornecedor",
];

/// Fields holding a single alternative lookup key for the record.
const ALIAS_KEY_FIELDS: &[&str] = &["vendorCode", "vendor_code", "codigoprodutofornecedor"];

/// Fields holding an explicit list of extra lookup keys.
const EXTRA_KEY_FIELDS: &[&str] = &["aliases", "extraKeys", "codigos"];

// =============================================================================
// Catalog
// =============================================================================

/// Immutable product catalog with a lazily built reverse-lookup index.
///
/// ## Example
/// ```rust
/// use weft_core::Catalog;
/// use serde_json::json;
///
/// let catalog = Catalog::from_entries([(
///     "20030005".to_string(),
///     json!({"erpCode": "7038", "erpName": "SAILCLOTH", "vendor": "COASTAL"}),
/// )]);
///
/// // Exact declared key
/// assert!(catalog.find("20030005").is_some());
/// // Zero-padded scan of the same key
/// assert!(catalog.find("0020030005").is_some());
/// // Unknown code
/// assert!(catalog.find("424242").is_none());
/// ```
#[derive(Debug, Default)]
pub struct Catalog {
    // Sorted keys make index construction order, and therefore variant
    // collision winners, deterministic.
    entries: BTreeMap<String, Value>,
    index: OnceLock<CatalogIndex>,
}

impl Catalog {
    /// Build from `(declared key, record value)` pairs.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            index: OnceLock::new(),
        }
    }

    /// Build from a parsed JSON object, keys becoming declared keys.
    pub fn from_object(object: Map<String, Value>) -> Self {
        Self::from_entries(object)
    }

    /// Number of declared entries, including ones that will not index.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a scanned or derived code.
    ///
    /// Exact declared keys are consulted first, then every [`expand`]
    /// variant of the probe in order. Builds the index on first use.
    pub fn find(&self, code: &str) -> Option<Arc<ProductRecord>> {
        let index = self.index();
        if let Some(record) = index.exact(code) {
            return Some(record);
        }
        expand(code)
            .iter()
            .find_map(|variant| index.variant(variant))
    }

    /// The memoized index, building it on first access.
    ///
    /// `OnceLock::get_or_init` makes a concurrent first decode race-free:
    /// one thread builds, the rest wait and share the result.
    pub fn index(&self) -> &CatalogIndex {
        self.index.get_or_init(|| CatalogIndex::build(&self.entries))
    }

    /// Index counters, forcing a build if none happened yet.
    pub fn index_stats(&self) -> IndexStats {
        self.index().stats()
    }
}

// =============================================================================
// CatalogIndex
// =============================================================================

/// Reverse-lookup maps derived from a catalog's entries.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    /// Declared keys verbatim. Authoritative; consulted before variants.
    exact: HashMap<String, Arc<ProductRecord>>,
    /// Every registered variant of every lookup key.
    variants: HashMap<String, Arc<ProductRecord>>,
    stats: IndexStats,
}

/// Counters from one index build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Entries that normalized into a usable record.
    pub records: usize,
    /// Entries skipped: not an object, or no ERP code and no ERP name.
    pub skipped: usize,
    /// Variant registrations that won their slot.
    pub variants: usize,
}

impl CatalogIndex {
    fn build(entries: &BTreeMap<String, Value>) -> Self {
        let mut exact = HashMap::new();
        let mut variants: HashMap<String, Arc<ProductRecord>> = HashMap::new();
        let mut stats = IndexStats::default();

        for (declared, value) in entries {
            let Some(record) = normalize_record(value) else {
                stats.skipped += 1;
                continue;
            };
            let record = Arc::new(record);
            stats.records += 1;

            exact.insert(declared.clone(), Arc::clone(&record));

            for key in lookup_keys(declared, value) {
                for variant in expand(&key) {
                    // First registration wins; later records never evict.
                    if let Entry::Vacant(slot) = variants.entry(variant) {
                        slot.insert(Arc::clone(&record));
                        stats.variants += 1;
                    }
                }
            }
        }

        debug!(
            records = stats.records,
            skipped = stats.skipped,
            variants = stats.variants,
            "catalog index built"
        );

        Self {
            exact,
            variants,
            stats,
        }
    }

    /// Exact declared-key lookup.
    pub fn exact(&self, key: &str) -> Option<Arc<ProductRecord>> {
        self.exact.get(key).cloned()
    }

    /// Variant-map lookup for one already-expanded form.
    pub fn variant(&self, key: &str) -> Option<Arc<ProductRecord>> {
        self.variants.get(key).cloned()
    }

    #[inline]
    pub const fn stats(&self) -> IndexStats {
        self.stats
    }
}

// =============================================================================
// Record Normalization
// =============================================================================

/// All lookup keys a record registers under: the declared key, any alias
/// key field, and any explicit extras list.
fn lookup_keys(declared: &str, value: &Value) -> Vec<String> {
    let mut keys = vec![declared.to_string()];
    if let Some(object) = value.as_object() {
        for field in ALIAS_KEY_FIELDS {
            if let Some(text) = object.get(*field).and_then(field_text) {
                keys.push(text);
            }
        }
        for field in EXTRA_KEY_FIELDS {
            if let Some(Value::Array(items)) = object.get(*field) {
                keys.extend(items.iter().filter_map(field_text));
            }
        }
    }
    keys
}

/// Flatten a loose catalog value into a [`ProductRecord`].
///
/// Accepts only JSON objects carrying at least an ERP code or an ERP name;
/// everything else is unusable and reported as skipped. Absent fields
/// become empty strings, never errors.
fn normalize_record(value: &Value) -> Option<ProductRecord> {
    let object = value.as_object()?;

    let erp_code = first_field(object, ERP_CODE_FIELDS);
    let erp_name = first_field(object, ERP_NAME_FIELDS);
    if erp_code.is_none() && erp_name.is_none() {
        return None;
    }

    let vendor = first_field(object, VENDOR_FIELDS)
        .map(|label| Vendor::from_label(&label))
        .unwrap_or_default();

    Some(ProductRecord {
        erp_code: erp_code.unwrap_or_default(),
        erp_name: erp_name.unwrap_or_default(),
        vendor,
        vendor_product: first_field(object, VENDOR_PRODUCT_FIELDS).unwrap_or_default(),
    })
}

fn first_field(object: &Map<String, Value>, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .find_map(|field| object.get(*field).and_then(field_text))
}

/// Render a loose JSON field value as trimmed text, blank-as-absent.
///
/// Numbers become integer strings; float values with Excel `.0` tails
/// (`14527.0`) truncate to `"14527"` so they match their string twins.
/// This is the single rendering rule for every catalog field, shared with
/// the file loader.
pub fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                Some(int.to_string())
            } else if let Some(int) = number.as_u64() {
                Some(int.to_string())
            } else {
                number.as_f64().map(|float| (float as i64).to_string())
            }
        }
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
