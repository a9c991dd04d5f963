//! Feature engineering for the concentration regressors.

use chrono::{Datelike as _, NaiveDate};
use microplastics_sample_models::SampleRecord;

use crate::TrendError;

/// Number of regression features: year, latitude, longitude, season.
pub const FEATURE_COUNT: usize = 4;

/// Number of equal-width year buckets.
pub const YEAR_BUCKETS: usize = 5;

/// Season assumed when no sample carries a date.
pub const DEFAULT_SEASON: f64 = 2.0;

/// One row of regression features.
pub type Features = [f64; FEATURE_COUNT];

/// Regression inputs derived from a set of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    /// `[year, latitude, longitude, season]` per sample.
    pub rows: Vec<Features>,
    /// Concentration per sample.
    pub targets: Vec<f64>,
    /// Equal-width year bucket per sample, `0..YEAR_BUCKETS`.
    pub year_buckets: Vec<usize>,
}

impl FeatureMatrix {
    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Coarse season index 1-4 from a calendar month (Dec-Feb is 1).
#[must_use]
pub fn season(date: NaiveDate) -> u32 {
    date.month() % 12 / 3 + 1
}

/// Assigns each year to one of `bins` equal-width buckets spanning the
/// observed range. Bucket edges are right-inclusive.
///
/// When every year is the same, all fall into the middle bucket.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn year_buckets(years: &[i32], bins: usize) -> Vec<usize> {
    let (Some(min), Some(max)) = (years.iter().min(), years.iter().max()) else {
        return Vec::new();
    };
    if bins == 0 {
        return vec![0; years.len()];
    }
    if min == max {
        return vec![bins / 2; years.len()];
    }

    let min = f64::from(*min);
    let width = (f64::from(*max) - min) / bins as f64;
    years
        .iter()
        .map(|year| {
            let offset = (f64::from(*year) - min) / width;
            (offset.ceil() as usize).saturating_sub(1).min(bins - 1)
        })
        .collect()
}

/// Builds the feature matrix for `records`.
///
/// Missing seasons are imputed with the mean of the known ones.
///
/// # Errors
///
/// * If `records` is empty
/// * If any coordinate or concentration is not finite
pub fn build(records: &[&SampleRecord]) -> Result<FeatureMatrix, TrendError> {
    if records.is_empty() {
        return Err(TrendError::EmptyDataset);
    }

    let seasons: Vec<Option<f64>> = records
        .iter()
        .map(|r| r.sample_date.map(|d| f64::from(season(d))))
        .collect();
    let known: Vec<f64> = seasons.iter().flatten().copied().collect();
    let fill = crate::stats::mean(&known).unwrap_or(DEFAULT_SEASON);

    let mut rows = Vec::with_capacity(records.len());
    let mut targets = Vec::with_capacity(records.len());
    for (record, season) in records.iter().zip(seasons) {
        if !(record.latitude.is_finite()
            && record.longitude.is_finite()
            && record.concentration.is_finite())
        {
            return Err(TrendError::Arithmetic {
                message: format!(
                    "non-finite value in sample at ({}, {})",
                    record.latitude, record.longitude
                ),
            });
        }
        rows.push([
            f64::from(record.year),
            record.latitude,
            record.longitude,
            season.unwrap_or(fill),
        ]);
        targets.push(record.concentration);
    }

    let years: Vec<i32> = records.iter().map(|r| r.year).collect();

    Ok(FeatureMatrix {
        rows,
        targets,
        year_buckets: year_buckets(&years, YEAR_BUCKETS),
    })
}
