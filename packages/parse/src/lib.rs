#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Text interpretation for parcel lookups.
//!
//! Two small parsers live here:
//! - [`parse_address`] splits loosely formatted situs addresses
//!   (`"123 Main St"`, `"Main"`, `"4500 FM 359 RD"`) into number,
//!   street name, and street type.
//! - [`parse_legal`] pulls subdivision, block, lot/reserve, and stated
//!   acreage out of free-text legal descriptions.
//!
//! Both are lossy by design: anything that does not match yields an
//! absent field, never an error.

pub mod address;
pub mod legal;

pub use address::parse_address;
pub use legal::parse_legal;
