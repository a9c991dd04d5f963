//! Alert decisions.
//!
//! These functions only decide whether an alert is warranted and describe
//! it; formatting and delivery belong to an external dispatcher.

use chrono::{DateTime, Utc};
use microplastics_sample_models::SampleRecord;
use microplastics_trend_models::{
    AlertEvent, AlertKind, AlertThresholds, HotspotAlert, Prediction,
};

use crate::stats::mean;

fn event(
    kind: AlertKind,
    location: String,
    concentration: f64,
    region: &str,
    details: String,
    now: DateTime<Utc>,
) -> AlertEvent {
    AlertEvent {
        kind,
        priority: kind.priority(),
        location,
        concentration,
        region: region.to_string(),
        details,
        timestamp: now,
    }
}

/// Checks a region's samples against the concentration threshold.
///
/// A mean above the threshold raises a [`AlertKind::Threshold`] event;
/// otherwise a peak above twice the threshold raises a
/// [`AlertKind::Hotspot`] event. Empty input raises nothing.
#[must_use]
pub fn check_thresholds(
    records: &[SampleRecord],
    region: &str,
    thresholds: &AlertThresholds,
    now: DateTime<Utc>,
) -> Option<AlertEvent> {
    let concentrations: Vec<f64> = records.iter().map(|r| r.concentration).collect();
    let avg = mean(&concentrations)?;
    let max = concentrations.iter().copied().fold(f64::MIN, f64::max);
    let limit = thresholds.concentration;

    if avg > limit {
        log::info!("Threshold alert for {region}: mean {avg:.1} > {limit}");
        Some(event(
            AlertKind::Threshold,
            format!("{region} (avg: {avg:.1})"),
            avg,
            region,
            format!(
                "Regional average exceeds threshold by {:.1} particles/m³",
                avg - limit
            ),
            now,
        ))
    } else if max > limit * 2.0 {
        log::info!("Peak alert for {region}: max {max:.1} > {}", limit * 2.0);
        Some(event(
            AlertKind::Hotspot,
            format!("{region} (peak: {max:.1})"),
            max,
            region,
            "Critical peak concentration detected".to_string(),
            now,
        ))
    } else {
        None
    }
}

/// Raises a [`AlertKind::Trend`] event when a forecast increase exceeds the
/// trend threshold. The event's concentration field carries the percentage.
#[must_use]
pub fn trend_alert(
    prediction: &Prediction,
    thresholds: &AlertThresholds,
    now: DateTime<Utc>,
) -> Option<AlertEvent> {
    if prediction.percentage_increase <= thresholds.trend_increase {
        return None;
    }
    Some(event(
        AlertKind::Trend,
        prediction.region.clone(),
        prediction.percentage_increase,
        &prediction.region,
        format!(
            "{:.1}% by {} ({} model)",
            prediction.percentage_increase, prediction.prediction_year, prediction.model_used
        ),
        now,
    ))
}

/// Raises a [`AlertKind::Hotspot`] event when a region has more hotspot
/// cells than the configured count. The event carries the hottest cell.
#[must_use]
pub fn hotspot_count_alert(
    hotspots: &[HotspotAlert],
    region: &str,
    thresholds: &AlertThresholds,
    now: DateTime<Utc>,
) -> Option<AlertEvent> {
    if hotspots.len() <= thresholds.hotspot_count {
        return None;
    }
    let hottest = hotspots
        .iter()
        .max_by(|a, b| a.avg_concentration.total_cmp(&b.avg_concentration))?;
    Some(event(
        AlertKind::Hotspot,
        hottest.location.clone(),
        hottest.avg_concentration,
        region,
        format!(
            "{} hotspot cells detected (limit {})",
            hotspots.len(),
            thresholds.hotspot_count
        ),
        now,
    ))
}

/// Describes a newly contributed sample for the dispatcher.
#[must_use]
pub fn new_upload_alert(sample: &SampleRecord, now: DateTime<Utc>) -> AlertEvent {
    event(
        AlertKind::NewUpload,
        format!("{:.4}, {:.4}", sample.latitude, sample.longitude),
        sample.concentration,
        sample.region.as_ref(),
        sample.polymer_type.clone(),
        now,
    )
}
