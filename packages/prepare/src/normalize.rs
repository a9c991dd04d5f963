//! Normalization of raw rows into canonical [`SampleRecord`]s.
//!
//! Columns are backfilled independently: a column missing from every row
//! gets its column-specific default, while individual missing cells are
//! imputed per field. Rows whose coordinates fail range validation are
//! dropped last.

use std::collections::BTreeMap;

use microplastics_sample_models::{SampleRecord, UNKNOWN_LABEL};
use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng as _};
use serde_json::Value;

use crate::columns::{
    self, CONCENTRATION, LATITUDE, LONGITUDE, POLYMER_TYPE, SAMPLE_DATE, SAMPLE_ID, SOURCE, YEAR,
};
use crate::parsing::{parse_sample_date, value_as_f64, value_as_string, value_as_year};
use crate::region::{assign_region, in_range};
use crate::{LoadOptions, PrepareError};

/// Bounds for concentrations drawn when the column is absent entirely.
const DRAWN_CONCENTRATION_RANGE: std::ops::Range<f64> = 1.0..200.0;

type Row = BTreeMap<String, Value>;

/// Normalizes raw records into validated [`SampleRecord`]s.
///
/// # Errors
///
/// Returns [`PrepareError::Malformed`] if any record is not a key/value
/// object, i.e. the input is not a table.
pub fn normalize_records(
    records: &[Value],
    options: &LoadOptions,
) -> Result<Vec<SampleRecord>, PrepareError> {
    let rows = records
        .iter()
        .enumerate()
        .map(|(i, record)| rename_columns(i, record))
        .collect::<Result<Vec<_>, _>>()?;

    if rows.is_empty() {
        return Ok(Vec::new());
    }

    for col in columns::REQUIRED {
        if !has_column(&rows, col) {
            log::debug!("Column '{col}' missing from every row, backfilling defaults");
        }
    }

    let concentrations = concentrations(&rows, options.concentration_seed);

    let total = rows.len();
    let records: Vec<SampleRecord> = rows
        .iter()
        .zip(concentrations)
        .filter_map(|(row, concentration)| {
            let latitude = field_f64(row, LATITUDE).unwrap_or(f64::NAN);
            let longitude = field_f64(row, LONGITUDE).unwrap_or(f64::NAN);
            let region = assign_region(latitude, longitude);

            if !in_range(latitude, longitude) {
                return None;
            }

            Some(SampleRecord {
                sample_id: row.get(SAMPLE_ID).and_then(value_as_f64).and_then(sample_id),
                latitude,
                longitude,
                concentration,
                sample_date: row
                    .get(SAMPLE_DATE)
                    .and_then(Value::as_str)
                    .and_then(parse_sample_date),
                year: row
                    .get(YEAR)
                    .and_then(value_as_year)
                    .unwrap_or(options.current_year),
                polymer_type: categorical(row, POLYMER_TYPE),
                source: categorical(row, SOURCE),
                region,
                method: row.get("method").and_then(value_as_string),
                depth: field_f64(row, "depth"),
                salinity: field_f64(row, "salinity"),
                temperature: field_f64(row, "temperature"),
            })
        })
        .collect();

    if records.len() < total {
        log::debug!(
            "Dropped {} of {total} rows with missing or out-of-range coordinates",
            total - records.len()
        );
    }

    Ok(records)
}

/// Renames aliased columns. A canonical column already present wins over its
/// alias.
fn rename_columns(index: usize, record: &Value) -> Result<Row, PrepareError> {
    let Some(object) = record.as_object() else {
        return Err(PrepareError::Malformed {
            message: format!("record {index} is not a key/value object"),
        });
    };

    let mut row = Row::new();
    for (key, value) in object {
        let canonical = columns::canonical_name(key.trim());
        if canonical != key.trim() && object.contains_key(canonical) {
            continue;
        }
        row.insert(canonical.to_string(), value.clone());
    }
    Ok(row)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn sample_id(raw: f64) -> Option<u64> {
    (raw >= 0.0 && raw.fract() == 0.0 && raw <= 9_007_199_254_740_992.0).then(|| raw as u64)
}

fn has_column(rows: &[Row], column: &str) -> bool {
    rows.iter().any(|row| row.contains_key(column))
}

fn field_f64(row: &Row, column: &str) -> Option<f64> {
    row.get(column).and_then(value_as_f64)
}

fn categorical(row: &Row, column: &str) -> String {
    row.get(column)
        .and_then(value_as_string)
        .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
}

/// Resolves the concentration of every row.
///
/// With no concentration column at all, values are drawn from a bounded
/// uniform distribution. Otherwise invalid or negative cells are imputed
/// with the median of the valid ones (zero if there are none).
fn concentrations(rows: &[Row], seed: u64) -> Vec<f64> {
    if !has_column(rows, CONCENTRATION) {
        let mut rng = StdRng::seed_from_u64(seed);
        return rows
            .iter()
            .map(|_| rng.gen_range(DRAWN_CONCENTRATION_RANGE))
            .collect();
    }

    let parsed: Vec<Option<f64>> = rows
        .iter()
        .map(|row| field_f64(row, CONCENTRATION).filter(|c| *c >= 0.0))
        .collect();

    let mut valid: Vec<f64> = parsed.iter().flatten().copied().collect();
    let fill = median(&mut valid).unwrap_or(0.0);

    parsed.into_iter().map(|c| c.unwrap_or(fill)).collect()
}

/// Median of finite values. Sorts `values` in place.
fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some(f64::midpoint(values[mid - 1], values[mid]))
    } else {
        Some(values[mid])
    }
}

#[cfg(test)]
mod tests {
    use microplastics_sample_models::Region;
    use serde_json::json;

    use super::*;
    use crate::SyntheticConfig;

    fn options() -> LoadOptions {
        LoadOptions {
            synthetic: SyntheticConfig::default(),
            concentration_seed: 11,
            current_year: 2024,
        }
    }

    #[test]
    fn applies_aliases() {
        let records = vec![json!({
            "lat": "40.7",
            "lon": "-74.0",
            "conc": "150.5",
            "sample_year": "2021",
            "poly_type": "Polystyrene (PS)",
            "source_type": "Shipping",
        })];
        let out = normalize_records(&records, &options()).unwrap();
        assert_eq!(out.len(), 1);
        let r = &out[0];
        assert!((r.latitude - 40.7).abs() < f64::EPSILON);
        assert!((r.longitude - -74.0).abs() < f64::EPSILON);
        assert!((r.concentration - 150.5).abs() < f64::EPSILON);
        assert_eq!(r.year, 2021);
        assert_eq!(r.polymer_type, "Polystyrene (PS)");
        assert_eq!(r.source, "Shipping");
        assert_eq!(r.region, Region::NorthAmericaPacific);
    }

    #[test]
    fn canonical_column_wins_over_alias() {
        let records = vec![json!({"lat": 5.0, "latitude": 45.0, "longitude": 10.0, "concentration": 1.0})];
        let out = normalize_records(&records, &options()).unwrap();
        assert!((out[0].latitude - 45.0).abs() < f64::EPSILON);
        assert_eq!(out[0].region, Region::Europe);
    }

    #[test]
    fn missing_categoricals_default_to_unknown() {
        let records = vec![json!({"latitude": 0.0, "longitude": 0.0, "concentration": 3.0})];
        let out = normalize_records(&records, &options()).unwrap();
        assert_eq!(out[0].polymer_type, "Unknown");
        assert_eq!(out[0].source, "Unknown");
        assert_eq!(out[0].year, 2024);
    }

    #[test]
    fn invalid_concentrations_use_median() {
        let records = vec![
            json!({"latitude": 1.0, "longitude": 1.0, "concentration": 10.0}),
            json!({"latitude": 1.0, "longitude": 1.0, "concentration": "n/a"}),
            json!({"latitude": 1.0, "longitude": 1.0, "concentration": 30.0}),
            json!({"latitude": 1.0, "longitude": 1.0, "concentration": -4.0}),
            json!({"latitude": 1.0, "longitude": 1.0}),
        ];
        let out = normalize_records(&records, &options()).unwrap();
        let values: Vec<f64> = out.iter().map(|r| r.concentration).collect();
        assert_eq!(values, vec![10.0, 20.0, 30.0, 20.0, 20.0]);
    }

    #[test]
    fn unrecoverable_concentration_is_zero() {
        let records = vec![json!({"latitude": 1.0, "longitude": 1.0, "concentration": "bad"})];
        let out = normalize_records(&records, &options()).unwrap();
        assert!(out[0].concentration.abs() < f64::EPSILON);
    }

    #[test]
    fn absent_concentration_column_is_drawn_deterministically() {
        let records: Vec<Value> = (0..20)
            .map(|_| json!({"latitude": 12.0, "longitude": 30.0}))
            .collect();
        let a = normalize_records(&records, &options()).unwrap();
        let b = normalize_records(&records, &options()).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|r| (1.0..200.0).contains(&r.concentration)));
    }

    #[test]
    fn drops_invalid_coordinates() {
        let records = vec![
            json!({"latitude": 95.0, "longitude": 0.0, "concentration": 1.0}),
            json!({"latitude": 0.0, "longitude": -181.0, "concentration": 1.0}),
            json!({"latitude": "north", "longitude": 0.0, "concentration": 1.0}),
            json!({"longitude": 0.0, "concentration": 1.0}),
            json!({"latitude": -20.0, "longitude": 0.0, "concentration": 1.0}),
        ];
        let out = normalize_records(&records, &options()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].region, Region::SouthAtlantic);
    }

    #[test]
    fn every_record_has_a_known_region() {
        let records: Vec<Value> = (-8..=8)
            .map(|i| json!({"latitude": f64::from(i) * 10.0, "longitude": f64::from(i) * 20.0, "concentration": 5.0}))
            .collect();
        let out = normalize_records(&records, &options()).unwrap();
        assert_eq!(out.len(), records.len());
        assert!(out.iter().all(|r| r.region.is_known()));
    }

    #[test]
    fn parses_optional_fields() {
        let records = vec![json!({
            "sample_id": "17",
            "latitude": 1.0,
            "longitude": 1.0,
            "concentration": 2.0,
            "sample_date": "2020-03-04",
            "method": "Pumps",
            "depth": "12.5",
        })];
        let out = normalize_records(&records, &options()).unwrap();
        assert_eq!(out[0].sample_id, Some(17));
        assert_eq!(
            out[0].sample_date,
            chrono::NaiveDate::from_ymd_opt(2020, 3, 4)
        );
        assert_eq!(out[0].method.as_deref(), Some("Pumps"));
        assert_eq!(out[0].depth, Some(12.5));
        assert_eq!(out[0].salinity, None);
    }

    #[test]
    fn rejects_non_object_rows() {
        let records = vec![json!({"latitude": 1.0}), json!([1, 2, 3])];
        assert!(matches!(
            normalize_records(&records, &options()),
            Err(PrepareError::Malformed { .. })
        ));
    }

    #[test]
    fn median_of_even_and_odd() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&mut []), None);
    }
}
