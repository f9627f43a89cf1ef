//! Merging registry attributes, legal fields, and measurements into
//! the final result record.

use chrono::{Datelike, Utc};
use parcel_estimate_models::{
    CountySchema, DeedReference, LegalFields, MeasurementResult, NOT_AVAILABLE, ParcelCandidate,
    ResultRecord, SchemaField,
};
use parcel_estimate_parse::parse_legal;

/// Builds the result record for one resolved parcel.
///
/// Attribute lookups go through the county schema and default to
/// `"N/A"` when absent. The legal description, when present, is run
/// through the legal-description parser; its fields stay independently
/// optional.
#[must_use]
pub fn assemble(
    candidate: &ParcelCandidate,
    schema: &CountySchema,
    measurement: MeasurementResult,
) -> ResultRecord {
    let attr = |field: SchemaField| {
        candidate
            .prop_str(schema.attribute(field))
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    let legal = attr(SchemaField::Legal);
    let legal_fields = if legal == NOT_AVAILABLE {
        LegalFields::default()
    } else {
        parse_legal(&legal)
    };

    let quickref_id = attr(SchemaField::QuickRefId);
    let property_page_url = property_page_url(schema, &quickref_id);

    let market_value = candidate
        .prop_f64(schema.attribute(SchemaField::MarketValue))
        .map_or_else(|| NOT_AVAILABLE.to_string(), format_currency);

    let deed = deed_reference(
        candidate.prop_str(schema.attribute(SchemaField::Deed)),
        &schema.deed_search_url,
    );

    let maps_url = maps_url(measurement.centroid_lat, measurement.centroid_lon);

    ResultRecord {
        county: schema.name.clone(),
        owner: attr(SchemaField::Owner),
        quickref_id,
        parcel_id: attr(SchemaField::ParcelId),
        legal,
        legal_fields,
        called_acres: attr(SchemaField::Acres),
        market_value,
        deed,
        measurement,
        maps_url,
        property_page_url,
    }
}

/// Classifies a deed value: purely numeric instrument numbers get the
/// county record-search link, anything else renders as plain text, and
/// an empty or absent value is "N/A".
fn deed_reference(value: Option<String>, deed_search_url: &str) -> DeedReference {
    let Some(value) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) else {
        return DeedReference::NotAvailable;
    };

    if value.chars().all(|c| c.is_ascii_digit()) {
        DeedReference::Linked {
            value,
            url: deed_search_url.to_string(),
        }
    } else {
        DeedReference::Plain { value }
    }
}

/// Google Maps link centered on the parcel centroid.
fn maps_url(lat: f64, lon: f64) -> String {
    format!("https://www.google.com/maps/search/?api=1&query={lat},{lon}")
}

/// County property page for the quick-ref id, where the county exposes
/// a template. The `{year}` placeholder gets the current year.
fn property_page_url(schema: &CountySchema, quickref_id: &str) -> Option<String> {
    if quickref_id == NOT_AVAILABLE {
        return None;
    }
    schema.property_page_template.as_ref().map(|template| {
        template
            .replace("{id}", quickref_id)
            .replace("{year}", &Utc::now().year().to_string())
    })
}

/// Formats a value as US currency with thousands separators
/// (`452100.5` → `"$452,100.50"`).
fn format_currency(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}
