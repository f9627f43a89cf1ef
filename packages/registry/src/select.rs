//! Candidate disambiguation.
//!
//! When a cascade stage returns more than one parcel the caller has to
//! put the choice to the user. Each candidate gets a deterministic
//! composite key so the interaction layer can render a stable pick
//! list, and [`SelectionContext`] keeps the previous choice alive
//! across re-renders of the same candidate set.

use parcel_estimate_models::{CountySchema, NOT_AVAILABLE, ParcelCandidate, SchemaField};

/// Legal-description prefix length used in composite keys.
const LEGAL_PREFIX_CHARS: usize = 40;

/// Outcome of inspecting a candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disambiguation {
    /// Every cascade stage came up empty. Terminal, not an error.
    NoMatch,
    /// Exactly one candidate; it is the resolved parcel.
    Single,
    /// More than one candidate; an explicit user selection is needed.
    Ambiguous,
}

/// Classifies a candidate list.
#[must_use]
pub fn disambiguate(candidates: &[ParcelCandidate]) -> Disambiguation {
    match candidates.len() {
        0 => Disambiguation::NoMatch,
        1 => Disambiguation::Single,
        _ => Disambiguation::Ambiguous,
    }
}

/// Renders a candidate as its three-part composite key:
/// `quickref | owner | first 40 characters of the legal description`.
#[must_use]
pub fn candidate_key(candidate: &ParcelCandidate, schema: &CountySchema) -> String {
    let quickref = candidate
        .prop_str(schema.attribute(SchemaField::QuickRefId))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let owner = candidate
        .prop_str(schema.attribute(SchemaField::Owner))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let legal: String = candidate
        .prop_str(schema.attribute(SchemaField::Legal))
        .unwrap_or_default()
        .chars()
        .take(LEGAL_PREFIX_CHARS)
        .collect();
    format!("{quickref} | {owner} | {legal}")
}

/// Per-session selection memory for multi-candidate disambiguation.
///
/// Holds the composite key the user last chose so the same parcel stays
/// selected when the candidate set is re-rendered. If the remembered
/// key is missing from a refreshed set, selection falls back to the
/// first candidate.
#[derive(Debug, Clone, Default)]
pub struct SelectionContext {
    selected: Option<String>,
}

impl SelectionContext {
    /// Creates an empty selection context.
    #[must_use]
    pub const fn new() -> Self {
        Self { selected: None }
    }

    /// Records the key the user chose.
    pub fn remember(&mut self, key: impl Into<String>) {
        self.selected = Some(key.into());
    }

    /// Resolves the remembered key against the current key list,
    /// falling back to index 0 when nothing (or nothing matching) is
    /// remembered.
    #[must_use]
    pub fn resolve(&self, keys: &[String]) -> usize {
        self.selected
            .as_ref()
            .and_then(|selected| keys.iter().position(|key| key == selected))
            .unwrap_or(0)
    }
}
