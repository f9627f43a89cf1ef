//! Loose situs-address parsing.
//!
//! County registries store the house number, street name, and street
//! type in separate attributes, so a free-form address has to be split
//! before it can be turned into filter predicates. Users type anything
//! from `"123 Main St"` to a bare street name, so every piece except
//! the name is optional.

use std::sync::LazyLock;

use parcel_estimate_models::ParsedAddress;
use regex::Regex;

/// Street-type abbreviations recognized as a trailing suffix token.
/// Anything else stays part of the street name.
const STREET_TYPES: &str = "RD|ST|DR|LN|BLVD|CT|AVE|HWY|WAY|TRAIL|PKWY|CIR";

/// Loose address shape: optional leading number, non-greedy name, and
/// an optional trailing recognized suffix. The name capture is lazy so
/// a trailing suffix token is not swallowed into the name.
static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:(\d+)\s*)?([\w\s]+?)(?:\s+({STREET_TYPES}))?$"
    ))
    .expect("valid regex")
});

/// Splits a free-form address into (number, street name, street type).
///
/// The input is uppercased and trimmed first. Returns `None` only when
/// no non-empty street name can be extracted; a bare street name with
/// no number and no suffix is a valid result.
#[must_use]
pub fn parse_address(raw: &str) -> Option<ParsedAddress> {
    let text = raw.trim().to_uppercase();
    let captures = ADDRESS_RE.captures(&text)?;

    let name = captures.get(2)?.as_str().trim().to_string();
    if name.is_empty() {
        return None;
    }

    Some(ParsedAddress {
        number: captures.get(1).map(|m| m.as_str().trim().to_string()),
        name,
        street_type: captures.get(3).map(|m| m.as_str().trim().to_string()),
    })
}
