#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Result assembly and export.
//!
//! [`assemble`] merges registry attributes, parsed legal-description
//! fields, and measurements into one [`ResultRecord`]; every optional
//! field that failed to parse or compute renders as an explicit `"N/A"`
//! marker so downstream rendering never hits an absent key.
//! [`kmz::write_kmz`] emits the Google Earth bundle for the parcel
//! boundary.

pub mod assemble;
pub mod kmz;

pub use assemble::assemble;
pub use kmz::{ExportError, write_kmz};
