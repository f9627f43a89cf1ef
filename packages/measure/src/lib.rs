#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Geometry measurement for parcel boundaries.
//!
//! Takes a parcel's GeoJSON geometry (EPSG:4326), reprojects every
//! exterior-ring coordinate into the county's projected CRS, and
//! derives perimeter, area, acreage, centroid, and a linear-rate cost
//! estimate.
//!
//! Only exterior rings are measured. Interior holes are deliberately
//! not subtracted: boundary-survey estimates price the line a crew
//! walks, and that line is the outer boundary.

use geo::{Centroid, MultiPolygon};
use parcel_estimate_models::{MeasurementResult, ProjectedCrs, SQ_FT_PER_ACRE};
use proj4rs::proj::Proj;

/// Geographic source CRS for every registry response (EPSG:4326).
const WGS84_PROJ4: &str = "+proj=longlat +ellps=WGS84 +towgs84=0,0,0,0,0,0,0 +no_defs";

/// Errors from the measurement pipeline.
#[derive(Debug, thiserror::Error)]
pub enum MeasureError {
    /// The candidate geometry is not a polygon or multipolygon.
    #[error("unsupported geometry type: {found}")]
    UnsupportedGeometry {
        /// Geometry type that was encountered.
        found: String,
    },

    /// The geometry converted but contained no coordinates.
    #[error("geometry has no coordinates")]
    EmptyGeometry,

    /// The GeoJSON geometry did not convert to a planar geometry.
    #[error("geometry conversion failed: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },

    /// CRS setup or coordinate transform failed.
    #[error("projection failed: {message}")]
    Projection {
        /// Description of what went wrong.
        message: String,
    },
}

/// A reusable EPSG:4326 → projected-CRS transform (and its inverse).
///
/// Axis order is always x-before-y: longitude/easting first.
pub struct Reprojector {
    source: Proj,
    target: Proj,
}

impl Reprojector {
    /// Builds a transform into the given projected CRS.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::Projection`] if either CRS definition is
    /// rejected.
    pub fn new(crs: &ProjectedCrs) -> Result<Self, MeasureError> {
        let source = Proj::from_proj_string(WGS84_PROJ4).map_err(|e| MeasureError::Projection {
            message: format!("source CRS: {e}"),
        })?;
        let target =
            Proj::from_proj_string(&crs.proj4).map_err(|e| MeasureError::Projection {
                message: format!("{}: {e}", crs.epsg),
            })?;
        Ok(Self { source, target })
    }

    /// Projects a geographic coordinate (degrees) into the target CRS
    /// (linear units, here US survey feet).
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::Projection`] if the transform fails.
    pub fn project(&self, lon: f64, lat: f64) -> Result<(f64, f64), MeasureError> {
        let mut point = (lon.to_radians(), lat.to_radians(), 0.0);
        proj4rs::transform::transform(&self.source, &self.target, &mut point).map_err(|e| {
            MeasureError::Projection {
                message: format!("({lon}, {lat}): {e}"),
            }
        })?;
        Ok((point.0, point.1))
    }

    /// Inverse transform: projected coordinate back to degrees.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::Projection`] if the transform fails.
    pub fn unproject(&self, x: f64, y: f64) -> Result<(f64, f64), MeasureError> {
        let mut point = (x, y, 0.0);
        proj4rs::transform::transform(&self.target, &self.source, &mut point).map_err(|e| {
            MeasureError::Projection {
                message: format!("({x}, {y}): {e}"),
            }
        })?;
        Ok((point.0.to_degrees(), point.1.to_degrees()))
    }
}

/// Linear cost estimate: perimeter times rate. A zero rate is a valid
/// "no estimate requested" input, not an error.
#[must_use]
pub fn cost_estimate(perimeter_ft: f64, rate: f64) -> f64 {
    perimeter_ft * rate
}

/// Measures a parcel boundary.
///
/// Reprojects the geometry into `crs`, sums exterior-ring perimeter and
/// shoelace area over all constituent polygons, converts the area to
/// acres, computes the geographic centroid (not reprojected — it feeds
/// map links), and applies the linear rate.
///
/// # Errors
///
/// Returns [`MeasureError`] when the geometry is not a
/// polygon/multipolygon, converts to nothing, or fails to reproject.
pub fn measure(
    geometry: &geojson::Geometry,
    crs: &ProjectedCrs,
    rate: f64,
) -> Result<MeasurementResult, MeasureError> {
    let multi_polygon = to_multi_polygon(geometry)?;

    let centroid = multi_polygon
        .centroid()
        .ok_or(MeasureError::EmptyGeometry)?;

    let reprojector = Reprojector::new(crs)?;
    log::debug!(
        "measuring {} polygon(s) in {}",
        multi_polygon.0.len(),
        crs.epsg
    );

    let mut perimeter_ft = 0.0;
    let mut area_sqft = 0.0;
    for polygon in &multi_polygon.0 {
        let projected = project_ring(&reprojector, polygon.exterior())?;
        let (perimeter, area) = ring_metrics(&projected);
        perimeter_ft += perimeter;
        area_sqft += area;
    }

    Ok(MeasurementResult {
        perimeter_ft,
        area_sqft,
        area_acres: area_sqft / SQ_FT_PER_ACRE,
        centroid_lon: centroid.x(),
        centroid_lat: centroid.y(),
        cost_estimate: cost_estimate(perimeter_ft, rate),
    })
}

/// Converts a GeoJSON geometry into a planar multipolygon. Single
/// polygons are wrapped; anything else is rejected.
fn to_multi_polygon(geometry: &geojson::Geometry) -> Result<MultiPolygon<f64>, MeasureError> {
    let geo_geometry: geo::Geometry<f64> =
        geometry
            .clone()
            .try_into()
            .map_err(|e: geojson::Error| MeasureError::Conversion {
                message: e.to_string(),
            })?;

    match geo_geometry {
        geo::Geometry::MultiPolygon(mp) => Ok(mp),
        geo::Geometry::Polygon(p) => Ok(MultiPolygon(vec![p])),
        other => Err(MeasureError::UnsupportedGeometry {
            found: geometry_type_name(&other).to_string(),
        }),
    }
}

const fn geometry_type_name(geometry: &geo::Geometry<f64>) -> &'static str {
    match geometry {
        geo::Geometry::Point(_) => "Point",
        geo::Geometry::Line(_) => "Line",
        geo::Geometry::LineString(_) => "LineString",
        geo::Geometry::Polygon(_) => "Polygon",
        geo::Geometry::MultiPoint(_) => "MultiPoint",
        geo::Geometry::MultiLineString(_) => "MultiLineString",
        geo::Geometry::MultiPolygon(_) => "MultiPolygon",
        geo::Geometry::GeometryCollection(_) => "GeometryCollection",
        geo::Geometry::Rect(_) => "Rect",
        geo::Geometry::Triangle(_) => "Triangle",
    }
}

/// Projects every coordinate of a ring into the target CRS.
fn project_ring(
    reprojector: &Reprojector,
    ring: &geo::LineString<f64>,
) -> Result<Vec<(f64, f64)>, MeasureError> {
    ring.coords()
        .map(|coord| reprojector.project(coord.x, coord.y))
        .collect()
}

/// Perimeter (segment-length sum) and shoelace area of one ring in
/// projected units. Handles rings with or without an explicit closing
/// coordinate.
fn ring_metrics(points: &[(f64, f64)]) -> (f64, f64) {
    if points.len() < 2 {
        return (0.0, 0.0);
    }

    let mut perimeter = 0.0;
    let mut doubled_area = 0.0;
    let n = points.len();
    for i in 0..n {
        let (x1, y1) = points[i];
        let (x2, y2) = points[(i + 1) % n];
        perimeter += ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
        doubled_area += x1.mul_add(y2, -(x2 * y1));
    }

    (perimeter, doubled_area.abs() / 2.0)
}
