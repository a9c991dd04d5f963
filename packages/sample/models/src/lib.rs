#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Canonical microplastics sample schema and region taxonomy.
//!
//! Every input table, whatever its original column names, is normalized into
//! [`SampleRecord`]s by the preparation crate. Downstream trend and hotspot
//! computations only ever see this shape.

pub mod profiles;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Label used for categorical fields that are absent from the input.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Coarse geographic bucket derived from a sample's coordinates.
///
/// Assigned from fixed latitude/longitude bounding boxes. Never set
/// independently of the coordinates.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Region {
    /// Tropical band, longitude -180 to -30.
    #[serde(rename = "South America Pacific")]
    #[strum(serialize = "South America Pacific")]
    SouthAmericaPacific,
    /// Tropical band, longitude -30 to 60.
    #[serde(rename = "Atlantic")]
    #[strum(serialize = "Atlantic")]
    Atlantic,
    /// Tropical band east of 60, or southern temperate band east of 20.
    #[serde(rename = "Indian Ocean")]
    #[strum(serialize = "Indian Ocean")]
    IndianOcean,
    /// Northern temperate band, longitude -180 to 0.
    #[serde(rename = "North America Pacific")]
    #[strum(serialize = "North America Pacific")]
    NorthAmericaPacific,
    /// Northern temperate band, longitude 0 to 60.
    #[serde(rename = "Europe")]
    #[strum(serialize = "Europe")]
    Europe,
    /// Northern temperate band east of 60.
    #[serde(rename = "Asia Pacific")]
    #[strum(serialize = "Asia Pacific")]
    AsiaPacific,
    /// Southern temperate band, longitude -180 to -110.
    #[serde(rename = "South Pacific")]
    #[strum(serialize = "South Pacific")]
    SouthPacific,
    /// Southern temperate band, longitude -110 to 20.
    #[serde(rename = "South Atlantic")]
    #[strum(serialize = "South Atlantic")]
    SouthAtlantic,
    /// Anything poleward of 60 degrees.
    #[serde(rename = "Polar Regions")]
    #[strum(serialize = "Polar Regions")]
    PolarRegions,
    /// Missing or non-numeric coordinates.
    #[serde(rename = "Unknown")]
    #[strum(serialize = "Unknown")]
    Unknown,
}

impl Region {
    /// Returns every region a valid coordinate pair can map to.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::SouthAmericaPacific,
            Self::Atlantic,
            Self::IndianOcean,
            Self::NorthAmericaPacific,
            Self::Europe,
            Self::AsiaPacific,
            Self::SouthPacific,
            Self::SouthAtlantic,
            Self::PolarRegions,
        ]
    }

    /// Whether this is a real geographic bucket rather than [`Region::Unknown`].
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// One observed microplastics measurement in the canonical schema.
///
/// Field names match the CSV column names so records can be written and
/// re-read without an alias step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Sequential identifier, when the source provides one.
    pub sample_id: Option<u64>,
    /// Latitude in decimal degrees, within [-90, 90].
    pub latitude: f64,
    /// Longitude in decimal degrees, within [-180, 180].
    pub longitude: f64,
    /// Particles per cubic meter. Never negative.
    pub concentration: f64,
    /// Date the sample was taken, if known.
    pub sample_date: Option<NaiveDate>,
    /// Calendar year of the sample.
    pub year: i32,
    /// Plastic material classification (e.g. "Polyethylene (PE)").
    pub polymer_type: String,
    /// Suspected pollution source (e.g. "Stormwater runoff").
    pub source: String,
    /// Region derived from `latitude`/`longitude`.
    pub region: Region,
    /// Sampling method (nets, pumps, grab samples).
    pub method: Option<String>,
    /// Sampling depth in meters.
    pub depth: Option<f64>,
    /// Water salinity in PSU.
    pub salinity: Option<f64>,
    /// Water temperature in degrees Celsius.
    pub temperature: Option<f64>,
}

/// Polymer categories with their relative frequency in field surveys.
pub const POLYMER_WEIGHTS: &[(&str, f64)] = &[
    ("Polyethylene (PE)", 0.25),
    ("Polypropylene (PP)", 0.20),
    ("Polystyrene (PS)", 0.15),
    ("Polyethylene terephthalate (PET)", 0.12),
    ("Polyvinyl chloride (PVC)", 0.10),
    ("Polycarbonate (PC)", 0.08),
    ("Polyamide (PA)", 0.05),
    ("Polyurethane (PU)", 0.05),
];

/// Pollution source categories with their relative frequency.
pub const SOURCE_WEIGHTS: &[(&str, f64)] = &[
    ("Wastewater effluent", 0.25),
    ("Stormwater runoff", 0.20),
    ("Atmospheric deposition", 0.15),
    ("Fishing gear", 0.15),
    ("Shipping", 0.10),
    ("Aquaculture", 0.08),
    ("Landfill leachate", 0.07),
];

/// Sampling methods, drawn uniformly.
pub const SAMPLING_METHODS: &[&str] = &["Nets", "Pumps", "Grab samples"];
