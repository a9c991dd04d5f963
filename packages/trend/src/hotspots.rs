//! Grid-cell hotspot detection.
//!
//! Samples above the threshold are snapped to a 0.1-degree grid; cells with
//! a mean above the threshold and at least [`MIN_CELL_SAMPLES`] samples
//! become alerts, ranked by risk score.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use microplastics_sample_models::{SampleRecord, UNKNOWN_LABEL};
use microplastics_trend_models::{HotspotAlert, Outcome, Urgency};

use crate::TrendError;
use crate::stats::{mean, mode, round_to};

/// Default concentration threshold, particles/m³.
pub const DEFAULT_THRESHOLD: f64 = 100.0;

/// Most alerts returned per call.
pub const MAX_ALERTS: usize = 10;

/// Fewest samples a cell needs to count as a hotspot.
pub const MIN_CELL_SAMPLES: usize = 2;

/// Ceiling of [`HotspotAlert::risk_score`].
pub const MAX_RISK_SCORE: f64 = 10.0;

type CellKey = (i64, i64);

/// Finds the top hotspot cells in `records`.
///
/// Never fails: an invalid threshold yields an empty
/// [`Outcome::Fallback`] list.
#[must_use]
pub fn detect_hotspots(
    records: &[SampleRecord],
    threshold: f64,
    now: DateTime<Utc>,
) -> Outcome<Vec<HotspotAlert>> {
    match try_detect(records, threshold, now) {
        Ok(alerts) => Outcome::Computed(alerts),
        Err(e) => {
            log::warn!("Hotspot detection failed: {e}");
            Outcome::Fallback {
                value: Vec::new(),
                reason: e.to_string(),
            }
        }
    }
}

/// Tenth-of-a-degree cell of a sample. Halves round to even, so 0.25 falls
/// in the 0.2 cell and 0.75 in the 0.8 cell.
#[allow(clippy::cast_possible_truncation)]
fn cell_of(record: &SampleRecord) -> CellKey {
    (
        (record.latitude * 10.0).round_ties_even() as i64,
        (record.longitude * 10.0).round_ties_even() as i64,
    )
}

#[allow(clippy::cast_precision_loss)]
fn cell_coordinate(key: i64) -> f64 {
    key as f64 / 10.0
}

fn try_detect(
    records: &[SampleRecord],
    threshold: f64,
    now: DateTime<Utc>,
) -> Result<Vec<HotspotAlert>, TrendError> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(TrendError::InvalidParameter {
            name: "threshold",
            message: format!("{threshold} is not a positive concentration"),
        });
    }

    let mut cells: BTreeMap<CellKey, Vec<&SampleRecord>> = BTreeMap::new();
    for record in records.iter().filter(|r| r.concentration > threshold) {
        if !(record.latitude.is_finite() && record.longitude.is_finite()) {
            continue;
        }
        cells.entry(cell_of(record)).or_default().push(record);
    }

    let mut alerts: Vec<HotspotAlert> = cells
        .into_iter()
        .filter(|(_, samples)| samples.len() >= MIN_CELL_SAMPLES)
        .filter_map(|((lat_key, lon_key), samples)| {
            let concentrations: Vec<f64> = samples.iter().map(|s| s.concentration).collect();
            let avg = round_to(mean(&concentrations)?, 2);
            if avg <= threshold {
                return None;
            }
            let max = concentrations.iter().copied().fold(f64::MIN, f64::max);
            let lat = cell_coordinate(lat_key);
            let lon = cell_coordinate(lon_key);

            Some(HotspotAlert {
                location: format!("{lat:.1}, {lon:.1}"),
                lat,
                lon,
                avg_concentration: avg,
                max_concentration: round_to(max, 2),
                sample_count: samples.len(),
                dominant_polymer: mode(samples.iter().map(|s| s.polymer_type.as_str()))
                    .unwrap_or(UNKNOWN_LABEL)
                    .to_string(),
                risk_score: (avg / threshold * 5.0).min(MAX_RISK_SCORE),
                urgency: if avg > threshold * 2.0 {
                    Urgency::Immediate
                } else {
                    Urgency::High
                },
                last_detected: now,
            })
        })
        .collect();

    alerts.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
    alerts.truncate(MAX_ALERTS);

    log::debug!("Found {} hotspot cells above {threshold}", alerts.len());
    Ok(alerts)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use microplastics_sample_models::Region;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn sample(lat: f64, lon: f64, concentration: f64, polymer: &str) -> SampleRecord {
        SampleRecord {
            sample_id: None,
            latitude: lat,
            longitude: lon,
            concentration,
            sample_date: None,
            year: 2023,
            polymer_type: polymer.to_string(),
            source: "Industrial Discharge".to_string(),
            region: Region::Europe,
            method: None,
            depth: None,
            salinity: None,
            temperature: None,
        }
    }

    #[test]
    fn groups_samples_into_cells() {
        let records = vec![
            sample(45.01, 5.02, 140.0, "PE"),
            sample(44.98, 4.99, 150.0, "PP"),
            sample(45.03, 5.04, 160.0, "PE"),
            sample(10.0, 10.0, 500.0, "PS"),
        ];
        let alerts = detect_hotspots(&records, 100.0, now()).into_value();

        assert_eq!(alerts.len(), 1);
        let a = &alerts[0];
        assert_eq!(a.location, "45.0, 5.0");
        assert_eq!(a.sample_count, 3);
        assert!((a.avg_concentration - 150.0).abs() < 1e-9);
        assert!((a.max_concentration - 160.0).abs() < 1e-9);
        assert_eq!(a.dominant_polymer, "PE");
        assert!((a.risk_score - 7.5).abs() < 1e-9);
        assert_eq!(a.urgency, Urgency::High);
        assert_eq!(a.last_detected, now());
    }

    #[test]
    fn half_tenths_round_to_even_cells() {
        let records = vec![
            sample(0.25, 0.75, 150.0, "PE"),
            sample(0.2, 0.8, 150.0, "PE"),
            sample(0.35, 0.65, 300.0, "PP"),
            sample(0.4, 0.6, 300.0, "PP"),
        ];
        let alerts = detect_hotspots(&records, 100.0, now()).into_value();

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].location, "0.4, 0.6");
        assert_eq!(alerts[1].location, "0.2, 0.8");
        assert!(alerts.iter().all(|a| a.sample_count == 2));
    }

    #[test]
    fn samples_at_or_below_threshold_are_ignored() {
        let records = vec![
            sample(1.0, 1.0, 100.0, "PE"),
            sample(1.0, 1.0, 100.0, "PE"),
            sample(1.0, 1.0, 101.0, "PE"),
        ];
        assert!(detect_hotspots(&records, 100.0, now()).into_value().is_empty());
    }

    #[test]
    fn immediate_urgency_and_capped_score() {
        let records = vec![
            sample(-20.0, 30.0, 450.0, "PET"),
            sample(-20.0, 30.0, 550.0, "PET"),
        ];
        let alerts = detect_hotspots(&records, 100.0, now()).into_value();
        assert_eq!(alerts[0].urgency, Urgency::Immediate);
        assert!((alerts[0].risk_score - MAX_RISK_SCORE).abs() < f64::EPSILON);
        assert_eq!(alerts[0].location, "-20.0, 30.0");
    }

    #[test]
    fn returns_top_ten_by_risk() {
        let records: Vec<SampleRecord> = (0..15)
            .flat_map(|i| {
                let c = 110.0 + f64::from(i) * 5.0;
                let lat = f64::from(i);
                [sample(lat, 0.0, c, "PE"), sample(lat, 0.0, c, "PE")]
            })
            .collect();
        let alerts = detect_hotspots(&records, 100.0, now()).into_value();

        assert_eq!(alerts.len(), MAX_ALERTS);
        assert!(alerts.windows(2).all(|w| w[0].risk_score >= w[1].risk_score));
        assert!((alerts[0].avg_concentration - 180.0).abs() < 1e-9);
        assert!(alerts.iter().all(|a| a.sample_count >= MIN_CELL_SAMPLES));
    }

    #[test]
    fn invalid_threshold_is_an_empty_fallback() {
        let records = vec![sample(1.0, 1.0, 150.0, "PE"), sample(1.0, 1.0, 150.0, "PE")];
        for threshold in [0.0, -5.0, f64::NAN] {
            let outcome = detect_hotspots(&records, threshold, now());
            assert!(outcome.is_fallback());
            assert!(outcome.value().is_empty());
        }
    }
}
