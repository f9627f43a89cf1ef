//! Legal-description parsing.
//!
//! Deed records describe parcels with free text like
//! `"ABC SUBDIVISION, BLOCK 2, LOT 5, ACRES 1.5"`. The extractions are
//! independent regex searches over the same input; a missing keyword
//! yields an absent field.

use std::sync::LazyLock;

use parcel_estimate_models::LegalFields;
use regex::Regex;

/// Everything before the first structural keyword is the subdivision.
static SUBDIVISION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.*?)(BLOCK|LOT|RESERVE|ACRES)").expect("valid regex"));

/// Block label: the token after BLOCK or BLK.
static BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:BLOCK|BLK)\s+(\w+)").expect("valid regex"));

/// Reserve label, keyword included. Reserve labels are often quoted
/// (`RESERVE "A"`), hence the quote in the class.
static RESERVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bRESERVE\s+["\w]+"#).expect("valid regex"));

/// Lot label, keyword included.
static LOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bLOT\s+["\w]+"#).expect("valid regex"));

/// Acreage stated in the description text.
static ACRES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bACRES[\s:]*(\d+(?:\.\d+)?)").expect("valid regex"));

/// Extracts subdivision, block, lot/reserve, and stated acreage from a
/// legal-description string.
///
/// A reserve match takes precedence over a lot match when both keywords
/// occur. Never fails; unmatched fields come back `None`.
#[must_use]
pub fn parse_legal(legal: &str) -> LegalFields {
    let subdivision = SUBDIVISION_RE.captures(legal).and_then(|captures| {
        let name = captures
            .get(1)
            .map_or("", |m| m.as_str())
            .trim_matches([',', ' ']);
        if name.is_empty() {
            None
        } else {
            Some(title_case(name))
        }
    });

    let block = BLOCK_RE
        .captures(legal)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string());

    let lot_or_reserve = RESERVE_RE
        .find(legal)
        .or_else(|| LOT_RE.find(legal))
        .map(|m| m.as_str().trim().to_string());

    let stated_acres = ACRES_RE
        .captures(legal)
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse().ok());

    LegalFields {
        subdivision,
        block,
        lot_or_reserve,
        stated_acres,
    }
}

/// Title-cases a string: each letter that follows a non-letter is
/// uppercased, every other letter is lowercased. Punctuation passes
/// through untouched (`"ABC SUB, SEC 2"` becomes `"Abc Sub, Sec 2"`).
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_description() {
        let fields = parse_legal("ABC SUBDIVISION, BLOCK 2, LOT 5, ACRES 1.5");
        assert_eq!(fields.subdivision.as_deref(), Some("Abc Subdivision"));
        assert_eq!(fields.block.as_deref(), Some("2"));
        assert_eq!(fields.lot_or_reserve.as_deref(), Some("LOT 5"));
        assert!((fields.stated_acres.unwrap() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn extracts_block_number() {
        let fields = parse_legal("RIVER PARK SEC 1, BLOCK 3, LOT 12A");
        assert_eq!(fields.block.as_deref(), Some("3"));
    }

    #[test]
    fn extracts_blk_abbreviation() {
        let fields = parse_legal("RIVER PARK, BLK 7, LOT 1");
        assert_eq!(fields.block.as_deref(), Some("7"));
    }

    #[test]
    fn extracts_alphanumeric_lot() {
        let fields = parse_legal("RIVER PARK SEC 1, BLOCK 3, LOT 12A");
        assert_eq!(fields.lot_or_reserve.as_deref(), Some("LOT 12A"));
    }

    #[test]
    fn reserve_takes_precedence_over_lot() {
        let fields = parse_legal("COMMERCIAL PARK, LOT 4, RESERVE \"B\"");
        assert_eq!(fields.lot_or_reserve.as_deref(), Some("RESERVE \"B\""));
    }

    #[test]
    fn reserve_alone_is_extracted() {
        let fields = parse_legal("TOWN CENTER, BLOCK 1, RESERVE C");
        assert_eq!(fields.lot_or_reserve.as_deref(), Some("RESERVE C"));
    }

    #[test]
    fn subdivision_keeps_internal_punctuation() {
        let fields = parse_legal("ABC SUB, SEC 2, BLOCK 1, LOT 9");
        assert_eq!(fields.subdivision.as_deref(), Some("Abc Sub, Sec 2"));
    }

    #[test]
    fn missing_keywords_yield_absent_fields() {
        let fields = parse_legal("TRACT 9, J SMITH SURVEY A-123");
        assert_eq!(fields, LegalFields::default());
    }

    #[test]
    fn no_subdivision_before_leading_keyword() {
        let fields = parse_legal("LOT 5, BLOCK 2");
        assert_eq!(fields.subdivision, None);
        assert_eq!(fields.block.as_deref(), Some("2"));
        assert_eq!(fields.lot_or_reserve.as_deref(), Some("LOT 5"));
    }

    #[test]
    fn parses_whole_number_acreage() {
        let fields = parse_legal("SMITH TRACT, ACRES 12");
        assert!((fields.stated_acres.unwrap() - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn title_cases_hyphenated_words() {
        assert_eq!(title_case("OAK-HILL ESTATES"), "Oak-Hill Estates");
    }
}
