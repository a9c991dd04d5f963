//! Region statistics used as report input.

use std::collections::{BTreeMap, HashSet};

use microplastics_sample_models::{SampleRecord, UNKNOWN_LABEL};
use microplastics_trend_models::{
    RecentTrend, RegionSummary, SourceCount, SummaryRisk, TrendDirection,
};

use crate::stats::{counts, mean, mode, slope};

/// Label used when summarizing every region together.
pub const ALL_REGIONS: &str = "All Regions";

/// Years before the latest one included in the recent trend.
pub const RECENT_YEARS: i32 = 3;

/// Number of sources listed in [`RegionSummary::top_sources`].
pub const TOP_SOURCES: usize = 3;

/// Summarizes `records`, optionally restricted to one region label.
///
/// Returns `None` when no sample matches.
#[must_use]
pub fn summarize(records: &[SampleRecord], region: Option<&str>) -> Option<RegionSummary> {
    let selected: Vec<&SampleRecord> = records
        .iter()
        .filter(|r| region.is_none_or(|label| r.region.as_ref() == label))
        .collect();
    if selected.is_empty() {
        return None;
    }

    let concentrations: Vec<f64> = selected.iter().map(|r| r.concentration).collect();
    let avg = mean(&concentrations)?;

    Some(RegionSummary {
        region: region.unwrap_or(ALL_REGIONS).to_string(),
        total_samples: selected.len(),
        first_year: selected.iter().map(|r| r.year).min()?,
        last_year: selected.iter().map(|r| r.year).max()?,
        avg_concentration: avg,
        max_concentration: concentrations.iter().copied().fold(f64::MIN, f64::max),
        min_concentration: concentrations.iter().copied().fold(f64::MAX, f64::min),
        dominant_polymer: mode(selected.iter().map(|r| r.polymer_type.as_str()))
            .unwrap_or(UNKNOWN_LABEL)
            .to_string(),
        top_sources: top_sources(&selected),
        spatial_coverage: selected
            .iter()
            .map(|r| r.latitude.to_bits())
            .collect::<HashSet<_>>()
            .len(),
        trend_direction: trend_direction(&selected),
        recent_trend: recent_trend(&selected),
        risk_level: summary_risk(avg),
    })
}

/// Risk band of a mean concentration.
#[must_use]
pub fn summary_risk(avg_concentration: f64) -> SummaryRisk {
    if avg_concentration > 200.0 {
        SummaryRisk::Critical
    } else if avg_concentration > 100.0 {
        SummaryRisk::High
    } else if avg_concentration > 50.0 {
        SummaryRisk::Moderate
    } else {
        SummaryRisk::Low
    }
}

fn top_sources(records: &[&SampleRecord]) -> Vec<SourceCount> {
    let mut sources: Vec<SourceCount> = counts(records.iter().map(|r| r.source.as_str()))
        .into_iter()
        .map(|(source, count)| SourceCount {
            source: source.to_string(),
            count,
        })
        .collect();
    sources.sort_by(|a, b| b.count.cmp(&a.count));
    sources.truncate(TOP_SOURCES);
    sources
}

/// Direction of the least-squares line through the yearly means.
#[must_use]
pub fn trend_direction(records: &[&SampleRecord]) -> TrendDirection {
    if records.len() < 3 {
        return TrendDirection::InsufficientData;
    }

    let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for r in records {
        by_year.entry(r.year).or_default().push(r.concentration);
    }
    if by_year.len() < 3 {
        return TrendDirection::Stable;
    }

    let points: Vec<(f64, f64)> = by_year
        .iter()
        .filter_map(|(year, values)| Some((f64::from(*year), mean(values)?)))
        .collect();

    match slope(&points) {
        Some(s) if s > 1.0 => TrendDirection::StronglyIncreasing,
        Some(s) if s > 0.0 => TrendDirection::Increasing,
        Some(s) if s < -1.0 => TrendDirection::StronglyDecreasing,
        Some(s) if s < 0.0 => TrendDirection::Decreasing,
        _ => TrendDirection::Stable,
    }
}

/// Trend over the latest [`RECENT_YEARS`] years plus the latest year itself,
/// compared against the mean of everything earlier.
#[must_use]
pub fn recent_trend(records: &[&SampleRecord]) -> RecentTrend {
    let flat = |direction, confidence| RecentTrend {
        direction,
        change_percent: 0.0,
        slope: 0.0,
        confidence,
    };

    if records.len() < 2 {
        return flat(TrendDirection::InsufficientData, 0.0);
    }
    let Some(latest) = records.iter().map(|r| r.year).max() else {
        return flat(TrendDirection::InsufficientData, 0.0);
    };

    let cutoff = latest.saturating_sub(RECENT_YEARS);
    let recent: Vec<(f64, f64)> = records
        .iter()
        .filter(|r| r.year >= cutoff)
        .map(|r| (f64::from(r.year), r.concentration))
        .collect();
    if recent.len() < 2 {
        return flat(TrendDirection::Stable, 50.0);
    }

    let first_recent = recent.iter().map(|(y, _)| *y).fold(f64::MAX, f64::min);
    let recent_values: Vec<f64> = recent.iter().map(|(_, c)| *c).collect();
    let earlier_values: Vec<f64> = records
        .iter()
        .filter(|r| f64::from(r.year) < first_recent)
        .map(|r| r.concentration)
        .collect();

    let current_avg = mean(&recent_values).unwrap_or(0.0);
    let past_avg = mean(&earlier_values).unwrap_or(current_avg);
    let change_percent = if past_avg.abs() < f64::EPSILON {
        0.0
    } else {
        (current_avg - past_avg) / past_avg * 100.0
    };

    let slope = slope(&recent).unwrap_or(0.0);
    let direction = if slope > 0.5 {
        TrendDirection::Increasing
    } else if slope < -0.5 {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };

    RecentTrend {
        direction,
        change_percent,
        slope,
        confidence: (50.0 + (slope * 10.0).abs()).min(90.0),
    }
}
