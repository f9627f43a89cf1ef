#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line property lookup with deed, map, and KMZ output.
//!
//! One-shot flow per invocation: build a search intent from the
//! arguments, run the predicate cascade against the county's feature
//! service, resolve multi-candidate results (interactively, or via
//! `--select`), measure the boundary in the county's projected CRS, and
//! print the assembled record. `--kmz` additionally writes a Google
//! Earth bundle for the parcel.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use dialoguer::Select;
use parcel_estimate_measure::measure;
use parcel_estimate_models::{CountySchema, DeedReference, ResultRecord, SearchIntent};
use parcel_estimate_registry::{
    ArcGisRegistry, Disambiguation, SelectionContext, candidate_key, disambiguate, lookup,
};
use parcel_estimate_report::{assemble, write_kmz};

/// Supported counties.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum County {
    /// Fort Bend County (FBCAD).
    FortBend,
    /// Harris County (HCAD).
    Harris,
}

impl County {
    fn schema(self) -> CountySchema {
        match self {
            Self::FortBend => CountySchema::fort_bend(),
            Self::Harris => CountySchema::harris(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "parcel_estimate_cli", about = "Property lookup with deed, map & KMZ")]
struct Args {
    /// County registry to query.
    #[arg(long, value_enum, default_value = "fort-bend")]
    county: County,

    /// Linear rate in dollars per foot of boundary.
    #[arg(long, default_value_t = 0.0, value_parser = parse_rate)]
    rate: f64,

    /// Write a Google Earth KMZ of the parcel boundary to this path.
    #[arg(long)]
    kmz: Option<PathBuf>,

    /// Pre-select a candidate by its composite key
    /// (`quickref | owner | legal...`) instead of prompting.
    #[arg(long)]
    select: Option<String>,

    #[command(subcommand)]
    search: Search,
}

#[derive(Debug, Subcommand)]
enum Search {
    /// Search by situs address (number and street type optional).
    Address {
        /// Address text, e.g. "123 Main St".
        text: String,
    },
    /// Search by quick-reference identifier.
    Quickref {
        /// The quick-ref id, e.g. "R123456".
        id: String,
    },
    /// Search by owner name.
    Owner {
        /// Owner last name.
        last: String,
        /// Owner first name (optional).
        first: Option<String>,
    },
}

impl Search {
    fn intent(&self) -> SearchIntent {
        match self {
            Self::Address { text } => SearchIntent::Address { raw: text.clone() },
            Self::Quickref { id } => SearchIntent::QuickRef { id: id.clone() },
            Self::Owner { last, first } => SearchIntent::Owner {
                last: last.clone(),
                first: first.clone(),
            },
        }
    }
}

fn parse_rate(raw: &str) -> Result<f64, String> {
    let rate: f64 = raw.parse().map_err(|_| format!("not a number: {raw}"))?;
    if rate < 0.0 {
        return Err("rate must be zero or positive".to_string());
    }
    Ok(rate)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let args = Args::parse();

    let schema = args.county.schema();
    let intent = args.search.intent();
    log::info!("looking up parcel in {} county", schema.name);

    let registry = ArcGisRegistry::for_county(&schema)?;
    let candidates = lookup(&registry, &intent, &schema).await;

    let index = match disambiguate(&candidates) {
        Disambiguation::NoMatch => {
            println!("No matching parcels found.");
            return Ok(());
        }
        Disambiguation::Single => 0,
        Disambiguation::Ambiguous => {
            let keys: Vec<String> = candidates
                .iter()
                .map(|candidate| candidate_key(candidate, &schema))
                .collect();
            choose_candidate(&keys, args.select.as_deref())?
        }
    };

    let candidate = &candidates[index];
    let Some(geometry) = &candidate.geometry else {
        println!("Unable to process parcel geometry: no boundary on file.");
        return Ok(());
    };

    let measurement = match measure(geometry, &schema.crs, args.rate) {
        Ok(measurement) => measurement,
        Err(e) => {
            log::error!("geometry processing failed: {e}");
            println!("Unable to process parcel geometry: {e}");
            return Ok(());
        }
    };

    let record = assemble(candidate, &schema, measurement);
    print_record(&record, args.rate);

    if let Some(path) = &args.kmz {
        write_kmz(path, geometry, &kmz_metadata(&record))?;
        println!("KMZ written to {}", path.display());
    }

    Ok(())
}

/// Resolves a multi-candidate set to one index: `--select` (with
/// fall-back to the first candidate when the key is stale), or an
/// interactive pick list.
fn choose_candidate(
    keys: &[String],
    select: Option<&str>,
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut context = SelectionContext::new();
    if let Some(key) = select {
        context.remember(key);
        let index = context.resolve(keys);
        if keys[index] != key {
            log::warn!("selection {key:?} not in the candidate set; using the first candidate");
        }
        return Ok(index);
    }

    let index = Select::new()
        .with_prompt("Multiple parcels found. Select one")
        .items(keys)
        .default(context.resolve(keys))
        .interact()?;
    Ok(index)
}

fn print_record(record: &ResultRecord, rate: f64) {
    println!("Parcel found ({} County).", record.county);
    println!("Owner:             {}", record.owner);
    println!("Quick Ref ID:      {}", record.quickref_id);
    println!("Geo ID:            {}", record.parcel_id);
    println!("Legal Description: {}", record.legal);
    if let Some(subdivision) = &record.legal_fields.subdivision {
        println!("Subdivision:       {subdivision}");
    }
    if let Some(block) = &record.legal_fields.block {
        println!("Block:             {block}");
    }
    if let Some(lot) = &record.legal_fields.lot_or_reserve {
        println!("Lot/Reserve:       {lot}");
    }
    println!("Called Acreage:    {}", record.called_acres);
    println!("Market Value:      {}", record.market_value);

    let m = &record.measurement;
    println!("Parcel Size:       {:.2} acres", m.area_acres);
    println!("Perimeter:         {:.2} ft", m.perimeter_ft);
    if rate > 0.0 {
        println!(
            "Estimate:          ${:.2} ({:.2} ft x ${rate:.2}/ft)",
            m.cost_estimate, m.perimeter_ft
        );
    }

    match &record.deed {
        DeedReference::Linked { value, url } => {
            println!("Deed Reference:    {value} (search: {url})");
        }
        DeedReference::Plain { value } => println!("Deed Reference:    {value}"),
        DeedReference::NotAvailable => println!("Deed Reference:    N/A"),
    }

    if let Some(url) = &record.property_page_url {
        println!("Property Page:     {url}");
    }
    println!("View on Maps:      {}", record.maps_url);
}

/// Metadata pairs for the KMZ placemark description, in display order.
fn kmz_metadata(record: &ResultRecord) -> Vec<(String, String)> {
    let deed = match &record.deed {
        DeedReference::Linked { value, .. } | DeedReference::Plain { value } => value.clone(),
        DeedReference::NotAvailable => String::new(),
    };
    vec![
        ("Owner".to_string(), record.owner.clone()),
        ("Geo ID".to_string(), record.parcel_id.clone()),
        ("Legal".to_string(), record.legal.clone()),
        (
            "Subdivision".to_string(),
            record.legal_fields.subdivision.clone().unwrap_or_default(),
        ),
        (
            "Block".to_string(),
            record.legal_fields.block.clone().unwrap_or_default(),
        ),
        (
            "Lot/Reserve".to_string(),
            record
                .legal_fields
                .lot_or_reserve
                .clone()
                .unwrap_or_default(),
        ),
        ("Deed".to_string(), deed),
        (
            "Area (ac)".to_string(),
            format!("{:.2}", record.measurement.area_acres),
        ),
        (
            "Perimeter (ft)".to_string(),
            format!("{:.2}", record.measurement.perimeter_ft),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use parcel_estimate_models::{LegalFields, MeasurementResult};

    use super::*;

    fn record() -> ResultRecord {
        ResultRecord {
            county: "Fort Bend".to_string(),
            owner: "DOE, JANE".to_string(),
            quickref_id: "R123456".to_string(),
            parcel_id: "1234-56-789".to_string(),
            legal: "ABC SUBDIVISION, BLOCK 2, LOT 5".to_string(),
            legal_fields: LegalFields {
                subdivision: Some("Abc Subdivision".to_string()),
                block: Some("2".to_string()),
                lot_or_reserve: Some("LOT 5".to_string()),
                stated_acres: None,
            },
            called_acres: "1.43".to_string(),
            market_value: "$310,000.00".to_string(),
            deed: DeedReference::NotAvailable,
            measurement: MeasurementResult {
                perimeter_ft: 1000.0,
                area_sqft: 62_500.0,
                area_acres: 62_500.0 / 43_560.0,
                centroid_lon: -95.6995,
                centroid_lat: 29.5305,
                cost_estimate: 1250.0,
            },
            maps_url: String::new(),
            property_page_url: None,
        }
    }

    #[test]
    fn kmz_metadata_keeps_display_order() {
        let metadata = kmz_metadata(&record());
        let keys: Vec<&str> = metadata.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            [
                "Owner",
                "Geo ID",
                "Legal",
                "Subdivision",
                "Block",
                "Lot/Reserve",
                "Deed",
                "Area (ac)",
                "Perimeter (ft)"
            ]
        );
    }

    #[test]
    fn kmz_metadata_blanks_missing_deed() {
        let metadata = kmz_metadata(&record());
        let deed = metadata.iter().find(|(k, _)| k == "Deed").unwrap();
        assert_eq!(deed.1, "");
    }

    #[test]
    fn rate_parser_rejects_negative_values() {
        assert!(parse_rate("-1.0").is_err());
        assert!(parse_rate("abc").is_err());
        assert!((parse_rate("1.25").unwrap() - 1.25).abs() < f64::EPSILON);
        assert!(parse_rate("0").unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn county_maps_to_schema() {
        assert_eq!(County::FortBend.schema().name, "Fort Bend");
        assert_eq!(County::Harris.schema().name, "Harris");
    }
}
