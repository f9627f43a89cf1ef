#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! County parcel registry access.
//!
//! A lookup is a strictly sequential cascade: [`query::build_predicates`]
//! turns a [`SearchIntent`] into filter expressions ordered from most to
//! least specific, and [`cascade::run_cascade`] executes them against a
//! [`ParcelRegistry`] until one yields candidates. The production
//! registry ([`arcgis::ArcGisRegistry`]) talks to an ArcGIS-style
//! feature service; tests swap in stubs through the same trait.

pub mod arcgis;
pub mod cascade;
pub mod query;
pub mod select;

use async_trait::async_trait;
use parcel_estimate_models::{CountySchema, ParcelCandidate, SearchIntent};

pub use arcgis::ArcGisRegistry;
pub use cascade::run_cascade;
pub use query::build_predicates;
pub use select::{Disambiguation, SelectionContext, candidate_key, disambiguate};

/// Errors that can occur while querying a parcel registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// HTTP request failed (transport error, timeout, or non-2xx).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the JSON shape we expected.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A queryable parcel registry.
///
/// The production implementation issues HTTP feature-service queries;
/// tests implement this with canned candidate lists and call counters.
#[async_trait]
pub trait ParcelRegistry: Send + Sync {
    /// Executes one filter expression and returns the matching parcel
    /// features, in registry order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the request or response decoding
    /// fails. The cascade treats a failed stage as zero candidates.
    async fn query(&self, where_clause: &str) -> Result<Vec<ParcelCandidate>, RegistryError>;
}

/// Resolves a search intent against a registry: builds the predicate
/// cascade for the county's schema and runs it to the first non-empty
/// stage.
///
/// An empty result means "no match" — a terminal outcome, not an error.
/// Transport failures along the way are logged and degraded to empty
/// stages rather than surfaced.
pub async fn lookup(
    registry: &dyn ParcelRegistry,
    intent: &SearchIntent,
    schema: &CountySchema,
) -> Vec<ParcelCandidate> {
    let predicates = query::build_predicates(intent, schema);
    if predicates.is_empty() {
        log::info!("{}: nothing searchable in the input", schema.name);
        return Vec::new();
    }
    cascade::run_cascade(registry, &predicates).await
}
