//! # Vendor Classification
//!
//! Infers which supplier printed a label purely from the *shape* of the
//! scanned string. No catalog access, no I/O.
//!
//! ## Shape Bands
//! ```text
//! ┌──────────────────────────────────────┬──────────┐
//! │ Shape of trimmed input               │ Vendor   │
//! ├──────────────────────────────────────┼──────────┤
//! │ 30-39 digits, nothing else           │ Coastal  │
//! │ 40-48 digits, nothing else           │ Tessuto  │
//! │ Exactly 7 digits                     │ Tessuto  │
//! │ Dotted, a segment carries SDE + 3+   │ Tessuto  │
//! │ digits                               │          │
//! │ 5-8 digits, nothing else             │ Coastal  │
//! │ Anything else                        │ Unknown  │
//! └──────────────────────────────────────┴──────────┘
//! ```
//!
//! ## Why the long-digit split at 40?
//! Coastal packs key + quantity + control blocks into 30-39 digits including
//! zero padding. A Tessuto label read by a numbers-only scanner loses the
//! dots and letters and comes out at 40+ digits, so the band above Coastal's
//! is attributed to Tessuto. Runs of 49+ digits match no known label and
//! fall through.
//!
//! `Unknown` is a valid terminal answer, never an error: decoding continues
//! regardless of attribution.

use crate::types::Vendor;
use crate::{CODE_DELIMITER, COLOR_MARKER};

// =============================================================================
// Length Bands
// =============================================================================

/// Packed Coastal labels: 30-39 digits including zero padding.
const COASTAL_PACKED_LEN: std::ops::RangeInclusive<usize> = 30..=39;

/// Digit-only reads of Tessuto labels land at 40-48 digits.
const TESSUTO_PACKED_LEN: std::ops::RangeInclusive<usize> = 40..=48;

/// Short bare Coastal article codes.
const COASTAL_SHORT_LEN: std::ops::RangeInclusive<usize> = 5..=8;

/// Tessuto article numbers are always exactly 7 digits.
const TESSUTO_ARTICLE_LEN: usize = 7;

/// Minimum digits required after the color marker for classification.
const MARKER_DIGITS: usize = 3;

// =============================================================================
// Public API
// =============================================================================

/// Classify a scanned code by shape alone.
///
/// Rules are applied in priority order on the trimmed input; the first band
/// that matches wins.
///
/// ## Example
/// ```rust
/// use weft_core::{identify_vendor, Vendor};
///
/// // 33 packed digits: Coastal roll label
/// assert_eq!(
///     identify_vendor("000200300050000005900025101300936"),
///     Vendor::Coastal,
/// );
/// // Dot-delimited with an SDE color marker: Tessuto roll label
/// assert_eq!(
///     identify_vendor("0000000147100.0000050000.000SDE100.242375.00509"),
///     Vendor::Tessuto,
/// );
/// // Plain 7 digits: Tessuto article number
/// assert_eq!(identify_vendor("0147100"), Vendor::Tessuto);
/// // 6 digits: short Coastal code
/// assert_eq!(identify_vendor("200300"), Vendor::Coastal);
/// // Free text classifies as Unknown but still decodes downstream
/// assert_eq!(identify_vendor("hello"), Vendor::Unknown);
/// ```
pub fn identify_vendor(code: &str) -> Vendor {
    let code = code.trim();

    if is_all_digits(code) {
        if COASTAL_PACKED_LEN.contains(&code.len()) {
            return Vendor::Coastal;
        }
        if TESSUTO_PACKED_LEN.contains(&code.len()) {
            return Vendor::Tessuto;
        }
        if code.len() == TESSUTO_ARTICLE_LEN {
            return Vendor::Tessuto;
        }
        if COASTAL_SHORT_LEN.contains(&code.len()) {
            return Vendor::Coastal;
        }
        return Vendor::Unknown;
    }

    if code.contains(CODE_DELIMITER) && has_color_marker(code) {
        return Vendor::Tessuto;
    }

    Vendor::Unknown
}

/// Structural validity check: does this look like any label we know?
///
/// Catalog-independent. Equivalent to classification not landing on
/// [`Vendor::Unknown`].
#[inline]
pub fn is_valid_format(code: &str) -> bool {
    identify_vendor(code) != Vendor::Unknown
}

// =============================================================================
// Shape Helpers
// =============================================================================

fn is_all_digits(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit())
}

/// True when any dot-separated segment contains `SDE` immediately followed
/// by at least [`MARKER_DIGITS`] digits.
fn has_color_marker(code: &str) -> bool {
    code.split(CODE_DELIMITER).any(|segment| {
        segment.match_indices(COLOR_MARKER).any(|(idx, marker)| {
            let suffix = &segment.as_bytes()[idx + marker.len()..];
            suffix.len() >= MARKER_DIGITS && suffix[..MARKER_DIGITS].iter().all(u8::is_ascii_digit)
        })
    })
}

// =============================================================================
// Tests
// =============================================================================
