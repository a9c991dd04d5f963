//! Per-region concentration forecasts.
//!
//! A regression model is fitted on the selected samples, but the published
//! forecast compounds the current mean concentration by a fixed
//! [`GROWTH_FACTOR`] per year. The model's own projection is only logged.

use chrono::{DateTime, Utc};
use microplastics_sample_models::SampleRecord;
use microplastics_trend_models::{
    EnsembleConfig, ModelTier, ModelUsed, Outcome, Prediction, RiskLevel, TrendConfig,
    YearlyProjection,
};

use crate::features::{self, DEFAULT_SEASON};
use crate::recommendations::recommendations;
use crate::stats::{mean, round_to};
use crate::{TrendError, regression};

/// Annual growth multiplier applied to the current mean.
pub const GROWTH_FACTOR: f64 = 1.05;

/// Regions with fewer samples than this are forecast from the whole dataset.
pub const MIN_REGIONAL_SAMPLES: usize = 5;

/// Region label used when the whole dataset backs a forecast.
pub const GLOBAL_REGION: &str = "Global";

/// What to forecast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRequest {
    /// Region label to filter on.
    pub region: String,
    /// Years to project forward. Must be positive.
    pub horizon: u32,
    /// Requested model tier.
    pub model: ModelTier,
}

impl PredictionRequest {
    /// A two-year simple forecast for `region`.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            horizon: 2,
            model: ModelTier::Simple,
        }
    }

    /// A forecast for `region` using the configured horizon and tier.
    #[must_use]
    pub fn from_config(region: impl Into<String>, config: &TrendConfig) -> Self {
        Self {
            region: region.into(),
            horizon: config.horizon,
            model: config.model,
        }
    }

    /// Overrides the horizon.
    #[must_use]
    pub const fn with_horizon(mut self, horizon: u32) -> Self {
        self.horizon = horizon;
        self
    }

    /// Overrides the model tier.
    #[must_use]
    pub const fn with_model(mut self, model: ModelTier) -> Self {
        self.model = model;
        self
    }
}

/// Forecasts concentration for the requested region.
///
/// Never fails: on any internal error the fixed [`fallback_prediction`] is
/// returned as [`Outcome::Fallback`].
///
/// `model_used` and `confidence` describe the tier that was actually fitted.
/// An `advanced` request with fewer than
/// [`MIN_ADVANCED_SAMPLES`](crate::regression::MIN_ADVANCED_SAMPLES) points
/// is fitted, reported and scored as `simple`, not as the tier requested.
#[must_use]
pub fn predict(
    records: &[SampleRecord],
    request: &PredictionRequest,
    ensemble: &EnsembleConfig,
    now: DateTime<Utc>,
) -> Outcome<Prediction> {
    match try_predict(records, request, ensemble, now) {
        Ok(prediction) => Outcome::Computed(prediction),
        Err(e) => {
            log::warn!(
                "Prediction for '{}' failed, using fallback: {e}",
                request.region
            );
            Outcome::Fallback {
                value: fallback_prediction(&request.region, now),
                reason: e.to_string(),
            }
        }
    }
}

/// The fixed record returned when a forecast cannot be computed.
#[must_use]
pub fn fallback_prediction(region: &str, now: DateTime<Utc>) -> Prediction {
    Prediction {
        region: region.to_string(),
        current_concentration: 50.0,
        current_year: 2024,
        prediction_year: 2026,
        predicted_concentration: 58.5,
        percentage_increase: 17.0,
        absolute_increase: 8.5,
        confidence: 60,
        risk_level: RiskLevel::Moderate,
        recommendations: vec![
            "Monitor closely".to_string(),
            "Consider preventive measures".to_string(),
        ],
        model_used: ModelUsed::Fallback,
        data_points_used: 0,
        yearly: Vec::new(),
        last_calculated: now,
    }
}

/// Risk level for a percentage increase: above 10 is high, above 5 moderate.
#[must_use]
pub fn risk_level(percentage_increase: f64) -> RiskLevel {
    if percentage_increase > 10.0 {
        RiskLevel::High
    } else if percentage_increase > 5.0 {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}

/// Fixed confidence score of a model tier.
#[must_use]
pub const fn tier_confidence(tier: ModelTier) -> u8 {
    match tier {
        ModelTier::Simple => 75,
        ModelTier::Advanced => 85,
    }
}

fn select<'a>(records: &'a [SampleRecord], region: &str) -> (Vec<&'a SampleRecord>, String) {
    let regional: Vec<&SampleRecord> = records
        .iter()
        .filter(|r| r.region.as_ref() == region)
        .collect();

    if regional.len() >= MIN_REGIONAL_SAMPLES {
        return (regional, region.to_string());
    }

    log::warn!(
        "Only {} samples in '{region}', forecasting from all {} samples",
        regional.len(),
        records.len()
    );
    (records.iter().collect(), GLOBAL_REGION.to_string())
}

fn try_predict(
    records: &[SampleRecord],
    request: &PredictionRequest,
    ensemble: &EnsembleConfig,
    now: DateTime<Utc>,
) -> Result<Prediction, TrendError> {
    if request.horizon == 0 {
        return Err(TrendError::InvalidParameter {
            name: "horizon",
            message: "must be at least one year".to_string(),
        });
    }

    let (selected, label) = select(records, &request.region);
    let matrix = features::build(&selected)?;
    let (model, tier) = regression::fit(request.model, &matrix, ensemble)?;

    let current_year = selected
        .iter()
        .map(|r| r.year)
        .max()
        .ok_or(TrendError::EmptyDataset)?;
    let current = mean(&matrix.targets).ok_or(TrendError::EmptyDataset)?;
    if current.abs() < f64::EPSILON {
        return Err(TrendError::Arithmetic {
            message: "current mean concentration is zero".to_string(),
        });
    }

    let latitudes: Vec<f64> = matrix.rows.iter().map(|r| r[1]).collect();
    let longitudes: Vec<f64> = matrix.rows.iter().map(|r| r[2]).collect();
    let lat = mean(&latitudes).ok_or(TrendError::EmptyDataset)?;
    let lon = mean(&longitudes).ok_or(TrendError::EmptyDataset)?;

    let mut yearly = Vec::new();
    let mut projected = current;
    for offset in 1..=request.horizon {
        let year = i32::try_from(offset)
            .ok()
            .and_then(|o| current_year.checked_add(o))
            .ok_or_else(|| TrendError::InvalidParameter {
                name: "horizon",
                message: format!("{} years past {current_year} overflows", request.horizon),
            })?;

        let fitted = model.predict(&[f64::from(year), lat, lon, DEFAULT_SEASON]);
        projected *= GROWTH_FACTOR;
        log::debug!("{label} {year}: model projects {fitted:.2}, publishing {projected:.2}");

        yearly.push(YearlyProjection {
            year,
            predicted_concentration: round_to(projected, 2),
            change_from_current: round_to(percent_change(projected, current), 1),
        });
    }

    let percentage = percent_change(projected, current);
    if !percentage.is_finite() {
        return Err(TrendError::Arithmetic {
            message: format!("non-finite percentage increase from {current}"),
        });
    }

    let predicted = round_to(projected, 2);
    let prediction_year = yearly
        .last()
        .map(|y| y.year)
        .ok_or(TrendError::EmptyDataset)?;

    Ok(Prediction {
        region: label,
        current_concentration: round_to(current, 2),
        current_year,
        prediction_year,
        predicted_concentration: predicted,
        percentage_increase: round_to(percentage, 1),
        absolute_increase: round_to(predicted - current, 2),
        confidence: tier_confidence(tier),
        risk_level: risk_level(percentage),
        recommendations: recommendations(percentage),
        model_used: tier.into(),
        data_points_used: matrix.len(),
        yearly,
        last_calculated: now,
    })
}

fn percent_change(value: f64, base: f64) -> f64 {
    (value - base) / base * 100.0
}
