#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared data model for the parcel estimate toolchain.
//!
//! These types flow between the parsing, registry, measurement, and
//! reporting packages. They carry no behavior beyond schema lookups and
//! small accessors; all heavy lifting lives in the consuming packages.

use serde::{Deserialize, Serialize};

/// Marker rendered for any attribute that is missing or unparseable.
///
/// Result records never omit a field; they render this instead so the
/// display and export layers never hit an absent key.
pub const NOT_AVAILABLE: &str = "N/A";

/// Square feet per acre.
pub const SQ_FT_PER_ACRE: f64 = 43_560.0;

/// Semantic attribute names shared by every county registry.
///
/// Each county maps these onto its own attribute naming via
/// [`CountySchema::attribute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaField {
    /// Situs house number.
    StreetNum,
    /// Situs street name.
    StreetName,
    /// Situs street type/suffix.
    StreetType,
    /// Owner name.
    Owner,
    /// Legal description text.
    Legal,
    /// Deed/instrument reference.
    Deed,
    /// Full parcel (geo/account) identifier.
    ParcelId,
    /// Short quick-reference identifier.
    QuickRefId,
    /// Called acreage from the registry.
    Acres,
    /// Market value.
    MarketValue,
}

/// Target projected coordinate reference system for a county.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedCrs {
    /// EPSG label (e.g. `"EPSG:2278"`), used for logging only.
    pub epsg: String,
    /// proj4 definition string used for the actual transform.
    pub proj4: String,
}

/// Per-county registry configuration.
///
/// One instance per supported county, selected once per session and
/// never mutated. Adding a county means adding one constructor here,
/// not branching logic elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountySchema {
    /// Human-readable county name (e.g. `"Fort Bend"`).
    pub name: String,
    /// Feature service query endpoint.
    pub endpoint: String,
    /// Projected CRS that perimeter/area are computed in.
    pub crs: ProjectedCrs,
    /// Registry attribute carrying the situs house number.
    pub street_num: String,
    /// Registry attribute carrying the situs street name.
    pub street_name: String,
    /// Registry attribute carrying the situs street type.
    pub street_type: String,
    /// Registry attribute carrying the owner name.
    pub owner: String,
    /// Registry attribute carrying the legal description.
    pub legal: String,
    /// Registry attribute carrying the deed/instrument reference.
    pub deed: String,
    /// Registry attribute carrying the full parcel identifier.
    pub parcel_id: String,
    /// Registry attribute carrying the quick-reference identifier.
    pub quickref_id: String,
    /// Registry attribute carrying the called acreage.
    pub acres: String,
    /// Registry attribute carrying the market value.
    pub market: String,
    /// County clerk deed-search page linked from numeric deed values.
    pub deed_search_url: String,
    /// Optional property-page template with `{id}` and `{year}`
    /// placeholders (not every county exposes one).
    pub property_page_template: Option<String>,
}

/// NAD83 Texas South Central, US survey feet (`to_meter` spelled out so
/// no unit-table lookup is needed).
const EPSG_2278_PROJ4: &str = "+proj=lcc +lat_1=30.28333333333333 \
     +lat_2=28.38333333333333 +lat_0=27.83333333333333 +lon_0=-99 \
     +x_0=600000 +y_0=3999999.9998984 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 \
     +to_meter=0.3048006096012192 +no_defs";

impl CountySchema {
    /// Fort Bend County (FBCAD public data feature service).
    #[must_use]
    pub fn fort_bend() -> Self {
        Self {
            name: "Fort Bend".to_string(),
            endpoint: "https://gisweb.fbcad.org/arcgis/rest/services/Hosted/FBCAD_Public_Data/FeatureServer/0/query".to_string(),
            crs: ProjectedCrs {
                epsg: "EPSG:2278".to_string(),
                proj4: EPSG_2278_PROJ4.to_string(),
            },
            street_num: "situssno".to_string(),
            street_name: "situssnm".to_string(),
            street_type: "situsstp".to_string(),
            owner: "ownername".to_string(),
            legal: "legal".to_string(),
            deed: "instrunum".to_string(),
            parcel_id: "propnumber".to_string(),
            quickref_id: "quickrefid".to_string(),
            acres: "landsizeac".to_string(),
            market: "totalvalue".to_string(),
            deed_search_url: "https://ccweb.co.fort-bend.tx.us/RealEstate/SearchEntry.aspx".to_string(),
            property_page_template: Some(
                "https://esearch.fbcad.org/Property/View?Id={id}&year={year}".to_string(),
            ),
        }
    }

    /// Harris County (HCAD parcels feature service).
    #[must_use]
    pub fn harris() -> Self {
        Self {
            name: "Harris".to_string(),
            endpoint: "https://services.arcgis.com/su8ic9KbA7PYVxPS/ArcGIS/rest/services/Harris_County_Parcels/FeatureServer/1/query".to_string(),
            crs: ProjectedCrs {
                epsg: "EPSG:2278".to_string(),
                proj4: EPSG_2278_PROJ4.to_string(),
            },
            street_num: "site_str_num".to_string(),
            street_name: "site_str_name".to_string(),
            street_type: "site_str_sfx".to_string(),
            owner: "owner_name_1".to_string(),
            legal: "legal_desc".to_string(),
            deed: "deed_ref".to_string(),
            parcel_id: "HCAD_NUM".to_string(),
            quickref_id: "LOWPARCELID".to_string(),
            acres: "Acreage".to_string(),
            market: "MKT_VAL".to_string(),
            deed_search_url: "https://www.cclerk.hctx.net/Applications/websearch/RealProperty".to_string(),
            property_page_template: None,
        }
    }

    /// Resolves a semantic field to this county's attribute name.
    #[must_use]
    pub fn attribute(&self, field: SchemaField) -> &str {
        match field {
            SchemaField::StreetNum => &self.street_num,
            SchemaField::StreetName => &self.street_name,
            SchemaField::StreetType => &self.street_type,
            SchemaField::Owner => &self.owner,
            SchemaField::Legal => &self.legal,
            SchemaField::Deed => &self.deed,
            SchemaField::ParcelId => &self.parcel_id,
            SchemaField::QuickRefId => &self.quickref_id,
            SchemaField::Acres => &self.acres,
            SchemaField::MarketValue => &self.market,
        }
    }
}

/// What the user asked to search by. Consumed once per lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum SearchIntent {
    /// Free-form situs address text.
    Address {
        /// Raw address text as entered.
        raw: String,
    },
    /// Quick-reference identifier lookup.
    QuickRef {
        /// The quick-reference identifier.
        id: String,
    },
    /// Owner-name lookup.
    Owner {
        /// Owner last name.
        last: String,
        /// Optional owner first name.
        first: Option<String>,
    },
}

/// Structured pieces of a loosely formatted situs address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedAddress {
    /// House number, if one was present.
    pub number: Option<String>,
    /// Street name (always non-empty; parsing fails otherwise).
    pub name: String,
    /// Recognized street-type abbreviation, if one was present.
    pub street_type: Option<String>,
}

/// One stage of the lookup cascade: a SQL-like `where` filter plus a
/// label for log messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    /// Short label for log messages (e.g. `"number+name+type"`).
    pub label: &'static str,
    /// Filter expression sent as the feature service `where` parameter.
    pub where_clause: String,
}

/// A feature record returned by a county registry: the raw property
/// map plus the parcel boundary geometry in geographic coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelCandidate {
    /// Registry attributes, keyed by the county's own attribute names.
    pub properties: serde_json::Map<String, serde_json::Value>,
    /// Parcel boundary (GeoJSON Polygon/MultiPolygon, EPSG:4326).
    pub geometry: Option<geojson::Geometry>,
}

impl ParcelCandidate {
    /// Reads a property as a string, stringifying numeric values
    /// (several registries return identifiers as JSON numbers).
    #[must_use]
    pub fn prop_str(&self, attribute: &str) -> Option<String> {
        match self.properties.get(attribute)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Reads a property as an `f64`, accepting numeric strings.
    #[must_use]
    pub fn prop_f64(&self, attribute: &str) -> Option<f64> {
        match self.properties.get(attribute)? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Fields extracted from a legal-description string. Each field is
/// independently present or absent depending on whether its keyword
/// appeared in the source text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalFields {
    /// Subdivision name, title-cased.
    pub subdivision: Option<String>,
    /// Block label (token following BLOCK/BLK).
    pub block: Option<String>,
    /// Lot or reserve label, keyword included (e.g. `"LOT 12A"`).
    pub lot_or_reserve: Option<String>,
    /// Acreage stated in the description text.
    pub stated_acres: Option<f64>,
}

/// Projected measurements and the derived cost estimate for one parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementResult {
    /// Boundary perimeter in US survey feet.
    pub perimeter_ft: f64,
    /// Boundary area in square feet (exterior rings only).
    pub area_sqft: f64,
    /// Boundary area in acres.
    pub area_acres: f64,
    /// Centroid longitude (geographic, for map links).
    pub centroid_lon: f64,
    /// Centroid latitude (geographic, for map links).
    pub centroid_lat: f64,
    /// Perimeter times the linear rate.
    pub cost_estimate: f64,
}

/// How the deed reference should be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum DeedReference {
    /// Numeric instrument number paired with the county deed-search page.
    Linked {
        /// The deed/instrument value.
        value: String,
        /// County clerk search URL.
        url: String,
    },
    /// Non-numeric reference shown as plain text.
    Plain {
        /// The deed/instrument value.
        value: String,
    },
    /// No deed reference on file.
    NotAvailable,
}

/// The assembled output record: registry attributes, parsed legal
/// fields, and measurements merged into the one artifact handed to
/// rendering and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    /// County the lookup ran against.
    pub county: String,
    /// Owner name (or [`NOT_AVAILABLE`]).
    pub owner: String,
    /// Quick-reference identifier (or [`NOT_AVAILABLE`]).
    pub quickref_id: String,
    /// Full parcel/geo identifier (or [`NOT_AVAILABLE`]).
    pub parcel_id: String,
    /// Raw legal description (or [`NOT_AVAILABLE`]).
    pub legal: String,
    /// Fields parsed out of the legal description.
    pub legal_fields: LegalFields,
    /// Called acreage from the registry (or [`NOT_AVAILABLE`]).
    pub called_acres: String,
    /// Market value formatted as currency (or [`NOT_AVAILABLE`]).
    pub market_value: String,
    /// Deed reference rendering.
    pub deed: DeedReference,
    /// Projected measurements and cost estimate.
    pub measurement: MeasurementResult,
    /// Map link centered on the parcel centroid.
    pub maps_url: String,
    /// County property page, where the county exposes one.
    pub property_page_url: Option<String>,
}
