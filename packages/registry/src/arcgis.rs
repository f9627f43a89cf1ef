//! ArcGIS-style feature service client.
//!
//! Both supported counties publish their parcel layers through ArcGIS
//! REST `FeatureServer` endpoints, so one client covers them all:
//! `GET <endpoint>?where=...&outFields=*&returnGeometry=true&outSR=4326&f=geojson`.

use std::time::Duration;

use async_trait::async_trait;
use parcel_estimate_models::{CountySchema, ParcelCandidate};

use crate::{ParcelRegistry, RegistryError};

/// Per-request timeout. A stalled county endpoint fails one cascade
/// stage, not the whole session.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for one county's feature service endpoint.
pub struct ArcGisRegistry {
    client: reqwest::Client,
    endpoint: String,
}

impl ArcGisRegistry {
    /// Creates a client for the given query endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Creates a client for a county's configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the HTTP client cannot be built.
    pub fn for_county(schema: &CountySchema) -> Result<Self, RegistryError> {
        Self::new(schema.endpoint.clone())
    }
}

#[async_trait]
impl ParcelRegistry for ArcGisRegistry {
    async fn query(&self, where_clause: &str) -> Result<Vec<ParcelCandidate>, RegistryError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("where", where_clause),
                ("outFields", "*"),
                ("returnGeometry", "true"),
                ("outSR", "4326"),
                ("f", "geojson"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = response.json().await?;
        Ok(parse_features(&body))
    }
}

/// Extracts parcel candidates from a GeoJSON-ish response body.
///
/// A missing `features` key (including ArcGIS `{"error": ...}` bodies,
/// which come back with HTTP 200) means zero results. A feature whose
/// geometry fails to decode keeps its attributes; the measurement step
/// reports the missing geometry for that candidate.
fn parse_features(body: &serde_json::Value) -> Vec<ParcelCandidate> {
    let Some(features) = body.get("features").and_then(serde_json::Value::as_array) else {
        return Vec::new();
    };

    features
        .iter()
        .map(|feature| {
            let properties = feature
                .get("properties")
                .and_then(serde_json::Value::as_object)
                .cloned()
                .unwrap_or_default();
            let geometry = feature
                .get("geometry")
                .filter(|g| !g.is_null())
                .and_then(|g| serde_json::from_value::<geojson::Geometry>(g.clone()).ok());
            ParcelCandidate {
                properties,
                geometry,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_features_with_geometry() {
        let body = serde_json::json!({
            "features": [{
                "type": "Feature",
                "properties": { "quickrefid": "R123456", "ownername": "SMITH, JOHN" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [-95.70, 29.53], [-95.69, 29.53],
                        [-95.69, 29.54], [-95.70, 29.54], [-95.70, 29.53]
                    ]]
                }
            }]
        });

        let candidates = parse_features(&body);
        assert_eq!(candidates.len(), 1);
        assert_eq!(
            candidates[0].prop_str("quickrefid").as_deref(),
            Some("R123456")
        );
        assert!(candidates[0].geometry.is_some());
    }

    #[test]
    fn missing_features_key_is_zero_results() {
        let body = serde_json::json!({
            "error": { "code": 400, "message": "Invalid query" }
        });
        assert!(parse_features(&body).is_empty());
    }

    #[test]
    fn empty_features_array_is_zero_results() {
        let body = serde_json::json!({ "features": [] });
        assert!(parse_features(&body).is_empty());
    }

    #[test]
    fn bad_geometry_keeps_attributes() {
        let body = serde_json::json!({
            "features": [{
                "type": "Feature",
                "properties": { "quickrefid": "R1" },
                "geometry": { "type": "Nonsense" }
            }]
        });

        let candidates = parse_features(&body);
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].geometry.is_none());
        assert_eq!(candidates[0].prop_str("quickrefid").as_deref(), Some("R1"));
    }

    #[test]
    fn null_geometry_keeps_attributes() {
        let body = serde_json::json!({
            "features": [{
                "type": "Feature",
                "properties": { "quickrefid": "R2" },
                "geometry": null
            }]
        });

        let candidates = parse_features(&body);
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].geometry.is_none());
    }
}
