#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types produced by the trend and hotspot engine.
//!
//! Every value here is created fresh per request and handed to reporting or
//! alert-dispatch collaborators; nothing is persisted or mutated after it
//! is returned.

pub mod config;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use config::{AlertThresholds, ConfigError, EnsembleConfig, TrendConfig};

/// Regression tier requested for a prediction.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ModelTier {
    /// Ordinary least-squares linear fit.
    #[default]
    Simple,
    /// Feature-standardized tree ensemble. Needs at least 20 data points.
    Advanced,
}

/// Which path produced a [`Prediction`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ModelUsed {
    /// Linear fit.
    Simple,
    /// Tree ensemble.
    Advanced,
    /// Fixed fallback record; nothing was fitted.
    Fallback,
}

impl From<ModelTier> for ModelUsed {
    fn from(tier: ModelTier) -> Self {
        match tier {
            ModelTier::Simple => Self::Simple,
            ModelTier::Advanced => Self::Advanced,
        }
    }
}

/// Risk classification of a forecast.
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
pub enum RiskLevel {
    /// Increase of 5% or less.
    Low,
    /// Increase above 5%.
    Moderate,
    /// Increase above 10%.
    High,
}

/// How quickly a hotspot should be acted on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum Urgency {
    /// Mean concentration above twice the threshold.
    Immediate,
    /// Mean concentration above the threshold.
    High,
}

/// Either a computed value or a well-formed stand-in produced on a
/// degradation path.
///
/// Callers can tell the two apart without inspecting string fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// The value was computed from the input.
    Computed(T),
    /// Computation failed; `value` is the documented fallback.
    Fallback {
        /// The fallback value.
        value: T,
        /// Why the computation failed.
        reason: String,
    },
}

impl<T> Outcome<T> {
    /// Borrows the value regardless of how it was produced.
    #[must_use]
    pub const fn value(&self) -> &T {
        match self {
            Self::Computed(value) | Self::Fallback { value, .. } => value,
        }
    }

    /// Takes the value regardless of how it was produced.
    #[must_use]
    pub fn into_value(self) -> T {
        match self {
            Self::Computed(value) | Self::Fallback { value, .. } => value,
        }
    }

    /// Whether this is the fallback variant.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Applies `f` to the value, keeping the variant and reason.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Computed(value) => Outcome::Computed(f(value)),
            Self::Fallback { value, reason } => Outcome::Fallback {
                value: f(value),
                reason,
            },
        }
    }

    /// The failure reason, for fallback outcomes.
    #[must_use]
    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            Self::Computed(_) => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }
}

/// Projected concentration for one future year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyProjection {
    /// Calendar year.
    pub year: i32,
    /// Projected concentration, rounded to 2 decimals.
    pub predicted_concentration: f64,
    /// Percentage change from the current concentration, rounded to 1 decimal.
    pub change_from_current: f64,
}

/// Per-region concentration forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Requested region, or `"Global"` when the whole dataset was used.
    pub region: String,
    /// Mean concentration of the data used, rounded to 2 decimals.
    pub current_concentration: f64,
    /// Latest observed year.
    pub current_year: i32,
    /// Final year of the forecast horizon.
    pub prediction_year: i32,
    /// Concentration forecast for `prediction_year`, rounded to 2 decimals.
    pub predicted_concentration: f64,
    /// Percentage increase over the horizon, rounded to 1 decimal.
    pub percentage_increase: f64,
    /// Absolute increase over the horizon, rounded to 2 decimals.
    pub absolute_increase: f64,
    /// Confidence score, 0-100. Fixed per model tier.
    pub confidence: u8,
    /// Risk classification.
    pub risk_level: RiskLevel,
    /// Ordered action phrases.
    pub recommendations: Vec<String>,
    /// Which model produced this record.
    pub model_used: ModelUsed,
    /// Number of samples the model was fitted on.
    pub data_points_used: usize,
    /// Year-by-year projections across the horizon.
    pub yearly: Vec<YearlyProjection>,
    /// When the prediction was computed.
    pub last_calculated: DateTime<Utc>,
}

/// A grid cell whose concentrations exceed the hotspot threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotAlert {
    /// `"lat, lon"` of the cell, one decimal each.
    pub location: String,
    /// Cell latitude, snapped to one decimal.
    pub lat: f64,
    /// Cell longitude, snapped to one decimal.
    pub lon: f64,
    /// Mean concentration of qualifying samples, rounded to 2 decimals.
    pub avg_concentration: f64,
    /// Peak concentration, rounded to 2 decimals.
    pub max_concentration: f64,
    /// Number of qualifying samples. Always at least 2.
    pub sample_count: usize,
    /// Most frequent polymer among the samples.
    pub dominant_polymer: String,
    /// `min(10, mean / threshold * 5)`.
    pub risk_score: f64,
    /// Urgency band.
    pub urgency: Urgency,
    /// When the cell was evaluated.
    pub last_detected: DateTime<Utc>,
}

/// Direction of a concentration trend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum TrendDirection {
    /// Slope of yearly means above 1.
    #[strum(serialize = "Strongly Increasing")]
    StronglyIncreasing,
    /// Positive slope.
    Increasing,
    /// Flat.
    Stable,
    /// Negative slope.
    Decreasing,
    /// Slope of yearly means below -1.
    #[strum(serialize = "Strongly Decreasing")]
    StronglyDecreasing,
    /// Too few samples to tell.
    #[strum(serialize = "Insufficient Data")]
    InsufficientData,
}

/// Trend over the most recent years of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentTrend {
    /// Direction from the least-squares slope.
    pub direction: TrendDirection,
    /// Percentage change of the recent mean against the earlier mean.
    pub change_percent: f64,
    /// Least-squares slope of concentration against year.
    pub slope: f64,
    /// Heuristic confidence, 0-90.
    pub confidence: f64,
}

/// Risk band of a dataset's mean concentration.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SummaryRisk {
    /// Mean at most 50.
    Low,
    /// Mean above 50.
    Moderate,
    /// Mean above 100.
    High,
    /// Mean above 200.
    Critical,
}

/// Number of samples attributed to one pollution source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCount {
    /// Source label.
    pub source: String,
    /// Sample count.
    pub count: usize,
}

/// Statistics for a region, used as report input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSummary {
    /// Region label, or `"All Regions"`.
    pub region: String,
    /// Number of samples.
    pub total_samples: usize,
    /// Earliest sample year.
    pub first_year: i32,
    /// Latest sample year.
    pub last_year: i32,
    /// Mean concentration.
    pub avg_concentration: f64,
    /// Peak concentration.
    pub max_concentration: f64,
    /// Lowest concentration.
    pub min_concentration: f64,
    /// Most frequent polymer.
    pub dominant_polymer: String,
    /// Up to three most frequent sources.
    pub top_sources: Vec<SourceCount>,
    /// Number of distinct sampling latitudes.
    pub spatial_coverage: usize,
    /// Direction of the yearly-mean trend.
    pub trend_direction: TrendDirection,
    /// Trend over the last few years.
    pub recent_trend: RecentTrend,
    /// Risk band of the mean concentration.
    pub risk_level: SummaryRisk,
}

/// Kind of alert an external dispatcher should send.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlertKind {
    /// A sample peak far above the threshold.
    Hotspot,
    /// Regional mean above the threshold.
    Threshold,
    /// Forecast increase above the trend threshold.
    Trend,
    /// A newly contributed citizen sample.
    NewUpload,
}

/// Dispatch priority of an alert.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertPriority {
    /// Informational.
    Low,
    /// Needs follow-up.
    Medium,
    /// Needs immediate action.
    High,
}

impl AlertKind {
    /// Returns the dispatch priority for this kind of alert.
    #[must_use]
    pub const fn priority(self) -> AlertPriority {
        match self {
            Self::Hotspot => AlertPriority::High,
            Self::Threshold | Self::Trend => AlertPriority::Medium,
            Self::NewUpload => AlertPriority::Low,
        }
    }
}

/// An alert decision, ready to be formatted and delivered elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    /// What triggered the alert.
    pub kind: AlertKind,
    /// Dispatch priority.
    pub priority: AlertPriority,
    /// Human-readable location.
    pub location: String,
    /// Concentration (or percentage, for trend alerts) that triggered it.
    pub concentration: f64,
    /// Region label.
    pub region: String,
    /// Additional detail.
    pub details: String,
    /// When the decision was made.
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_labels() {
        assert_eq!(ModelTier::Advanced.to_string(), "advanced");
        assert_eq!("simple".parse::<ModelTier>().unwrap(), ModelTier::Simple);
        assert_eq!(ModelUsed::Fallback.as_ref(), "fallback");
        assert_eq!(ModelUsed::from(ModelTier::Advanced), ModelUsed::Advanced);
    }

    #[test]
    fn outcome_accessors() {
        let computed: Outcome<u8> = Outcome::Computed(3);
        assert_eq!(*computed.value(), 3);
        assert!(!computed.is_fallback());
        assert_eq!(computed.fallback_reason(), None);

        let fallback: Outcome<u8> = Outcome::Fallback {
            value: 0,
            reason: "empty".to_string(),
        };
        assert!(fallback.is_fallback());
        assert_eq!(fallback.fallback_reason(), Some("empty"));
        assert_eq!(fallback.clone().into_value(), 0);
        assert_eq!(fallback.clone().map(|v| v + 1).into_value(), 1);
        assert!(fallback.map(u32::from).is_fallback());
        assert_eq!(computed.map(|v| v * 2), Outcome::Computed(6));
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let fallback: Outcome<Vec<u8>> = Outcome::Fallback {
            value: vec![],
            reason: "bad threshold".to_string(),
        };
        let json = serde_json::to_value(&fallback).unwrap();
        assert_eq!(json["status"], "fallback");
        assert_eq!(json["result"]["reason"], "bad threshold");

        let computed: Outcome<Vec<u8>> = Outcome::Computed(vec![1]);
        let json = serde_json::to_value(&computed).unwrap();
        assert_eq!(json["status"], "computed");
        assert_eq!(json["result"][0], 1);
    }

    #[test]
    fn trend_direction_labels() {
        assert_eq!(
            TrendDirection::StronglyIncreasing.to_string(),
            "Strongly Increasing"
        );
        assert_eq!(TrendDirection::Stable.to_string(), "Stable");
    }

    #[test]
    fn alert_priorities() {
        assert_eq!(AlertKind::Hotspot.priority(), AlertPriority::High);
        assert_eq!(AlertKind::Threshold.priority(), AlertPriority::Medium);
        assert_eq!(AlertKind::Trend.priority(), AlertPriority::Medium);
        assert_eq!(AlertKind::NewUpload.priority(), AlertPriority::Low);
        assert_eq!(AlertPriority::High.to_string(), "HIGH");
    }
}
