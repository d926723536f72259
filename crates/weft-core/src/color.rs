//! # Color Resolution
//!
//! Tessuto labels embed the roll color inside a marker segment: the tag
//! `SDE` followed by either a numeric dye code (`SDE100`) or a
//! letters-and-digits shade code (`SDEZ4005`). This module owns the dye
//! tables and the extraction logic.
//!
//! ## Resolution Order
//! ```text
//!  marker segment ──► SDE + digits?  ──► ColorMap override
//!        │                                    │ miss
//!        │                                    ▼
//!        │                              TESSUTO_COLORS
//!        │                                    │ miss
//!        │                                    ▼
//!        │                              "color{digits}"
//!        │
//!        └────────► SDE + letters+digits? ──► COASTAL_COLORS
//!                                                  │ miss
//!                                                  ▼
//!                                            lowercased code
//! ```
//!
//! A numeric suffix wins over a letters code even when the letters come
//! first in the segment; that is how the label printers behave when both
//! tags end up on one line. No marker at all resolves to the empty string.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::COLOR_MARKER;

// =============================================================================
// Dye Tables
// =============================================================================

/// Tessuto numeric dye codes. Unlisted codes resolve to `"color{code}"` so
/// a new dye lot still produces something an operator can act on.
pub const TESSUTO_COLORS: &[(&str, &str)] = &[
    ("001", "natural"),
    ("002", "greige"),
    ("100", "white"),
    ("103", "dyed"),
    ("200", "green"),
    ("300", "yellow"),
    ("408", "blue"),
    ("500", "gray"),
    ("600", "pink"),
    ("700", "beige"),
    ("800", "brown"),
    ("900", "natural"),
    ("999", "black"),
];

/// Coastal letters-and-digits shade codes. Unlisted codes fall back to the
/// lowercased raw code.
pub const COASTAL_COLORS: &[(&str, &str)] = &[
    ("AB12", "white"),
    ("AM30", "yellow"),
    ("BG15", "beige"),
    ("CZ05", "gray"),
    ("PR99", "black"),
    ("RS10", "pink"),
    ("VD20", "green"),
    ("Z4005", "blue"),
];

fn table_lookup(table: &[(&'static str, &'static str)], code: &str) -> Option<&'static str> {
    table.iter().find(|(key, _)| *key == code).map(|(_, name)| *name)
}

// =============================================================================
// ColorMap
// =============================================================================

/// Caller-supplied numeric dye-code overrides.
///
/// Consulted before [`TESSUTO_COLORS`], so a catalog file can rename a
/// built-in code or teach the engine a new one without a release. Letters
/// codes are not overridable; Coastal shade charts change with the mill's
/// releases, not per customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorMap(HashMap<String, String>);

impl ColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: impl Into<String>, name: impl Into<String>) {
        self.0.insert(code.into(), name.into());
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.0.get(code).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = (String, String)>) {
        self.0.extend(entries);
    }
}

impl From<HashMap<String, String>> for ColorMap {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, String)> for ColorMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ColorMap {
    type Item = (String, String);
    type IntoIter = std::collections::hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolve the color carried by a delimited label's trailing segments.
///
/// Scans for the first segment containing the `SDE` marker, then reads the
/// code immediately after it. Trailing junk in the segment is ignored.
///
/// ## Example
/// ```rust
/// use weft_core::{resolve_color, ColorMap};
///
/// let colors = ColorMap::default();
/// assert_eq!(resolve_color(&["0000050000", "000SDE100", "242375"], &colors), "white");
/// assert_eq!(resolve_color(&["000SDE777"], &colors), "color777");
/// assert_eq!(resolve_color(&["SDEZ4005"], &colors), "blue");
/// assert_eq!(resolve_color(&["242375", "00509"], &colors), "");
/// ```
pub fn resolve_color(segments: &[&str], overrides: &ColorMap) -> String {
    let Some(segment) = segments.iter().find(|s| s.contains(COLOR_MARKER)) else {
        return String::new();
    };

    // A numeric suffix anywhere in the segment beats a letters code, so
    // scan every marker occurrence for digits before retrying for letters.
    for suffix in marker_suffixes(segment) {
        let digits = leading_digits(suffix);
        if !digits.is_empty() {
            return numeric_color(digits, overrides);
        }
    }
    for suffix in marker_suffixes(segment) {
        if let Some(code) = letters_code(suffix) {
            return coastal_color(code);
        }
    }

    String::new()
}

fn marker_suffixes(segment: &str) -> impl Iterator<Item = &str> {
    segment
        .match_indices(COLOR_MARKER)
        .map(move |(idx, marker)| &segment[idx + marker.len()..])
}

/// Maximal run of ASCII digits at the start of `suffix`.
fn leading_digits(suffix: &str) -> &str {
    let end = suffix
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(suffix.len());
    &suffix[..end]
}

/// Uppercase letter run followed by a digit run, e.g. `Z4005` out of
/// `Z4005X`. `None` when the suffix does not start that way.
fn letters_code(suffix: &str) -> Option<&str> {
    let bytes = suffix.as_bytes();
    let letters_end = bytes
        .iter()
        .position(|b| !b.is_ascii_uppercase())
        .unwrap_or(bytes.len());
    if letters_end == 0 {
        return None;
    }
    let digit_run = bytes[letters_end..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(bytes.len() - letters_end);
    if digit_run == 0 {
        return None;
    }
    Some(&suffix[..letters_end + digit_run])
}

fn numeric_color(digits: &str, overrides: &ColorMap) -> String {
    if let Some(name) = overrides.get(digits) {
        return name.to_string();
    }
    if let Some(name) = table_lookup(TESSUTO_COLORS, digits) {
        return name.to_string();
    }
    format!("color{digits}")
}

fn coastal_color(code: &str) -> String {
    match table_lookup(COASTAL_COLORS, code) {
        Some(name) => name.to_string(),
        None => code.to_ascii_lowercase(),
    }
}

// =============================================================================
// Tests
// =============================================================================
