//! # Lookup Variant Expansion
//!
//! Scanned codes rarely match catalog keys byte-for-byte. Scanners inject
//! whitespace, labels pad with zeros, and ERP exports truncate long vendor
//! codes to whatever column width the spreadsheet had that year. This module
//! turns one code into the ordered list of normalized forms a lookup should
//! probe.
//!
//! ## Expansion Pipeline
//! ```text
//!  "  020-0300 05 "
//!        │
//!        ├─► raw                      "  020-0300 05 "
//!        ├─► trimmed                  "020-0300 05"
//!        ├─► whitespace stripped      "020-030005"
//!        ├─►   + zeros stripped       "20-030005"
//!        ├─► alphanumeric only        "020030005"   (+ zero-stripped)
//!        ├─► digits only              "020030005"   (+ zero-stripped)
//!        └─► digit windows            prefixes/suffixes, widths 14..=4
//! ```
//!
//! The output order is the probe priority: earlier variants are closer to
//! the original input, later ones are progressively more aggressive guesses.
//! Both `Catalog::find` and the index builder consume the same list, which
//! is what makes lookups and registrations agree.

use std::collections::HashSet;

// =============================================================================
// Window Widths
// =============================================================================

/// Narrowest prefix/suffix window worth probing. Below this, collisions
/// between unrelated products dominate.
const MIN_WINDOW_WIDTH: usize = 4;

/// Widest prefix/suffix window. Covers every truncated-column width seen in
/// the ERP export history.
const MAX_WINDOW_WIDTH: usize = 14;

// =============================================================================
// Public API
// =============================================================================

/// Expand a code into its ordered, deduplicated lookup variants.
///
/// ## Rules
/// - The raw input always comes first, so `expand(x)` contains `x` whenever
///   `x` is non-empty
/// - Empty forms are dropped, never emitted
/// - Each variant appears once, at its earliest position
/// - Windows run widest-first so longer (more specific) fragments are
///   probed before shorter truncations
///
/// ## Example
/// ```rust
/// use weft_core::expand;
///
/// let variants = expand("0147100");
/// assert_eq!(variants[0], "0147100");                 // raw input first
/// assert!(variants.contains(&"147100".to_string()));  // zero-stripped
/// assert!(variants.contains(&"14710".to_string()));   // width-5 prefix
/// ```
pub fn expand(code: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    push_variant(&mut out, &mut seen, code);
    push_variant(&mut out, &mut seen, code.trim());

    let compact: String = code.chars().filter(|c| !c.is_whitespace()).collect();
    push_variant(&mut out, &mut seen, &compact);
    push_variant(&mut out, &mut seen, compact.trim_start_matches('0'));

    let alnum: String = compact.chars().filter(char::is_ascii_alphanumeric).collect();
    push_variant(&mut out, &mut seen, &alnum);
    push_variant(&mut out, &mut seen, alnum.trim_start_matches('0'));

    let digits: String = compact.chars().filter(char::is_ascii_digit).collect();
    let digits_zeroless = digits.trim_start_matches('0').to_string();
    push_variant(&mut out, &mut seen, &digits);
    push_variant(&mut out, &mut seen, &digits_zeroless);

    let mut window_bases: Vec<&str> = vec![&digits];
    if digits_zeroless != digits {
        window_bases.push(&digits_zeroless);
    }
    for base in window_bases {
        for width in (MIN_WINDOW_WIDTH..=MAX_WINDOW_WIDTH).rev() {
            if width >= base.len() {
                continue;
            }
            push_variant(&mut out, &mut seen, &base[..width]);
            push_variant(&mut out, &mut seen, &base[base.len() - width..]);
        }
    }

    out
}

fn push_variant(out: &mut Vec<String>, seen: &mut HashSet<String>, candidate: &str) {
    if candidate.is_empty() {
        return;
    }
    if seen.insert(candidate.to_string()) {
        out.push(candidate.to_string());
    }
}

// =============================================================================
// Tests
// =============================================================================
