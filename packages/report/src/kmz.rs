//! KMZ map export.
//!
//! Emits a Google Earth bundle for one parcel: a KML document with one
//! placemark per polygon exterior ring (unfilled, red outline) and an
//! HTML description built from caller-ordered `key: value` metadata,
//! zipped as `doc.kml`.

use std::fs::File;
use std::io::Write as _;
use std::path::Path;

/// Errors from the KMZ export sink.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// File I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive writing failed.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The geometry is not a polygon or multipolygon.
    #[error("unsupported geometry type for KMZ export: {found}")]
    UnsupportedGeometry {
        /// Geometry type that was encountered.
        found: String,
    },
}

/// Writes the KMZ bundle for a parcel boundary.
///
/// `metadata` pairs land in the placemark description in the order
/// given.
///
/// # Errors
///
/// Returns [`ExportError`] if the geometry is not a
/// polygon/multipolygon or the archive cannot be written.
pub fn write_kmz(
    path: &Path,
    geometry: &geojson::Geometry,
    metadata: &[(String, String)],
) -> Result<(), ExportError> {
    let kml = kml_document(geometry, metadata)?;

    let file = File::create(path)?;
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    writer.start_file("doc.kml", options)?;
    writer.write_all(kml.as_bytes())?;
    writer.finish()?;

    log::info!("wrote KMZ to {}", path.display());
    Ok(())
}

/// Renders the KML document string.
fn kml_document(
    geometry: &geojson::Geometry,
    metadata: &[(String, String)],
) -> Result<String, ExportError> {
    let rings: Vec<(&'static str, &Vec<Vec<f64>>)> = match &geometry.value {
        geojson::Value::Polygon(rings) => rings.first().map(|r| ("Parcel", r)).into_iter().collect(),
        geojson::Value::MultiPolygon(polygons) => polygons
            .iter()
            .filter_map(|rings| rings.first().map(|r| ("Parcel Part", r)))
            .collect(),
        other => {
            return Err(ExportError::UnsupportedGeometry {
                found: value_type_name(other).to_string(),
            });
        }
    };

    let description = if metadata.is_empty() {
        String::new()
    } else {
        let html: String = metadata
            .iter()
            .map(|(key, value)| format!("<b>{key}:</b> {value}<br>"))
            .collect();
        format!(
            "<description><![CDATA[{}]]></description>",
            html.replace("]]>", "]]&gt;")
        )
    };

    let mut placemarks = String::new();
    for (name, ring) in rings {
        let coordinates: Vec<String> = ring
            .iter()
            .filter(|position| position.len() >= 2)
            .map(|position| format!("{},{},0", position[0], position[1]))
            .collect();
        placemarks.push_str(&format!(
            "<Placemark><name>{name}</name>{description}<styleUrl>#parcel</styleUrl>\
             <Polygon><outerBoundaryIs><LinearRing><coordinates>{}</coordinates>\
             </LinearRing></outerBoundaryIs></Polygon></Placemark>",
            coordinates.join(" ")
        ));
    }

    // KML colors are aabbggrr; ff0000ff is opaque red.
    Ok(format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <kml xmlns=\"http://www.opengis.net/kml/2.2\"><Document>\
         <Style id=\"parcel\"><LineStyle><color>ff0000ff</color><width>5</width></LineStyle>\
         <PolyStyle><fill>0</fill></PolyStyle></Style>\
         {placemarks}</Document></kml>"
    ))
}

const fn value_type_name(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}
