#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Preparation of raw microplastics sample tables.
//!
//! Raw tables arrive as loosely-typed key/value records (CSV rows, JSON
//! uploads) whose column names vary between surveys. [`load`] renames the
//! known aliases, coerces numeric fields, backfills missing columns, assigns
//! a [`Region`](microplastics_sample_models::Region) to every row, and drops
//! rows whose coordinates are out of range.
//!
//! When the input cannot be read as a table at all, a seeded synthetic
//! dataset is returned instead and the result is marked
//! [`Provenance::Synthetic`].

pub mod columns;
pub mod csv_file;
pub mod locations;
pub mod normalize;
pub mod parsing;
pub mod region;
pub mod synthetic;

use std::path::Path;

use chrono::Datelike as _;
use microplastics_sample_models::SampleRecord;
use thiserror::Error;

pub use normalize::normalize_records;
pub use region::assign_region;
pub use synthetic::{SyntheticConfig, generate_samples};

/// Errors that can occur while reading or normalizing sample tables.
#[derive(Debug, Error)]
pub enum PrepareError {
    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input is not shaped like a table of records.
    #[error("Malformed input: {message}")]
    Malformed {
        /// Description of what went wrong.
        message: String,
    },
}

/// Where the records of a [`SampleTable`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Records were normalized from the caller's input.
    Observed,
    /// The input was unusable and every record is synthetic.
    Synthetic,
}

/// A prepared table of canonical sample records.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTable {
    /// Validated records, each with a derived region.
    pub records: Vec<SampleRecord>,
    /// Origin of the records.
    pub provenance: Provenance,
}

impl SampleTable {
    /// Whether the table is a synthetic stand-in rather than real data.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.provenance == Provenance::Synthetic
    }

    /// Number of records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn synthetic(config: &SyntheticConfig) -> Self {
        Self {
            records: generate_samples(config),
            provenance: Provenance::Synthetic,
        }
    }
}

/// Knobs for [`load`] and [`load_dataset`].
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Generator settings used when falling back to synthetic data.
    pub synthetic: SyntheticConfig,
    /// Seed for concentrations drawn when the column is entirely absent.
    pub concentration_seed: u64,
    /// Year assigned to records with a missing or unparseable year.
    pub current_year: i32,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            synthetic: SyntheticConfig::default(),
            concentration_seed: 42,
            current_year: chrono::Utc::now().year(),
        }
    }
}

/// Normalizes raw key/value records into a [`SampleTable`].
///
/// Never fails: input that is not a sequence of objects degrades to a
/// synthetic table. Empty input yields an empty, non-degraded table.
#[must_use]
pub fn load(records: &[serde_json::Value], options: &LoadOptions) -> SampleTable {
    match normalize_records(records, options) {
        Ok(records) => SampleTable {
            records,
            provenance: Provenance::Observed,
        },
        Err(e) => {
            log::warn!("Input could not be read as a table ({e}), using synthetic samples");
            SampleTable::synthetic(&options.synthetic)
        }
    }
}

/// Parses a JSON document (an array of objects) and normalizes it.
///
/// Unparseable JSON degrades to a synthetic table like any other
/// non-tabular input.
#[must_use]
pub fn load_json(json: &str, options: &LoadOptions) -> SampleTable {
    match serde_json::from_str::<serde_json::Value>(json) {
        Ok(serde_json::Value::Array(rows)) => load(&rows, options),
        Ok(other) => load(&[other], options),
        Err(e) => {
            log::warn!("Failed to parse JSON samples ({e}), using synthetic samples");
            SampleTable::synthetic(&options.synthetic)
        }
    }
}

/// Loads a CSV dataset from `path`.
///
/// If the file does not exist, a synthetic dataset is generated and written
/// to `path` so later runs reuse it. Read failures degrade to synthetic data.
#[must_use]
pub fn load_dataset(path: &Path, options: &LoadOptions) -> SampleTable {
    if !path.exists() {
        let table = SampleTable::synthetic(&options.synthetic);
        match csv_file::write_csv(path, &table.records) {
            Ok(()) => log::info!(
                "Generated {} synthetic samples and saved them to {}",
                table.len(),
                path.display()
            ),
            Err(e) => log::warn!("Failed to save synthetic samples to {}: {e}", path.display()),
        }
        return table;
    }

    match csv_file::read_csv(path) {
        Ok(rows) => {
            log::info!("Read {} rows from {}", rows.len(), path.display());
            load(&rows, options)
        }
        Err(e) => {
            log::warn!(
                "Error loading {} ({e}), using synthetic samples",
                path.display()
            );
            SampleTable::synthetic(&options.synthetic)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn options() -> LoadOptions {
        LoadOptions {
            synthetic: SyntheticConfig {
                samples: 25,
                ..SyntheticConfig::default()
            },
            concentration_seed: 7,
            current_year: 2024,
        }
    }

    #[test]
    fn empty_input_is_empty_table() {
        let table = load(&[], &options());
        assert!(table.is_empty());
        assert!(!table.is_degraded());
    }

    #[test]
    fn non_object_rows_fall_back_to_synthetic() {
        let table = load(&[json!(1), json!("x")], &options());
        assert!(table.is_degraded());
        assert_eq!(table.len(), 25);
    }

    #[test]
    fn invalid_json_falls_back_to_synthetic() {
        let table = load_json("{not json", &options());
        assert!(table.is_degraded());
    }

    #[test]
    fn json_array_is_normalized() {
        let table = load_json(
            r#"[{"lat": 45.0, "lon": 10.0, "conc": 12.5, "sample_year": 2019}]"#,
            &options(),
        );
        assert!(!table.is_degraded());
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].year, 2019);
    }

    #[test]
    fn missing_file_generates_and_saves_dataset() {
        let dir = std::env::temp_dir().join(format!(
            "microplastics_prepare_missing_{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("samples.csv");
        let _ = std::fs::remove_file(&path);

        let first = load_dataset(&path, &options());
        assert!(first.is_degraded());
        assert!(path.exists());

        let second = load_dataset(&path, &options());
        assert!(!second.is_degraded());
        assert_eq!(second.len(), first.len());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
