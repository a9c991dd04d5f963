//! Seeded synthetic sample generation.
//!
//! Produces survey-shaped data for demos and for the degraded path of
//! [`crate::load`]. All randomness flows from [`SyntheticConfig::seed`], so
//! the same config always yields the same records.

use chrono::{Days, NaiveDate};
use microplastics_sample_models::{
    POLYMER_WEIGHTS, SAMPLING_METHODS, SOURCE_WEIGHTS, SampleRecord,
};
use rand::distributions::{Distribution as _, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng as _};

use crate::region::assign_region;

/// Settings for [`generate_samples`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticConfig {
    /// Number of records to produce.
    pub samples: usize,
    /// RNG seed.
    pub seed: u64,
    /// First sampling year (inclusive).
    pub first_year: i32,
    /// Last sampling year (inclusive). Later years are sampled more often.
    pub last_year: i32,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            samples: 1000,
            seed: 42,
            first_year: 2010,
            last_year: 2024,
        }
    }
}

/// Generates `config.samples` synthetic records.
///
/// Coordinates cluster around the equator and prime meridian with a small
/// poleward coastal bias, concentrations are log-normal and clipped to
/// [0.1, 500], and polymer/source categories follow their survey weights.
#[must_use]
pub fn generate_samples(config: &SyntheticConfig) -> Vec<SampleRecord> {
    let mut rng = StdRng::seed_from_u64(config.seed);

    let years: Vec<i32> = (config.first_year..=config.last_year.max(config.first_year)).collect();
    let year_weights = WeightedIndex::new(linspace(0.05, 0.25, years.len())).ok();
    let polymer_weights = WeightedIndex::new(POLYMER_WEIGHTS.iter().map(|(_, w)| *w)).ok();
    let source_weights = WeightedIndex::new(SOURCE_WEIGHTS.iter().map(|(_, w)| *w)).ok();

    (1..=config.samples)
        .map(|id| {
            let longitude = loop {
                let lon = normal(&mut rng, 0.0, 60.0);
                if (-180.0..=180.0).contains(&lon) {
                    break lon;
                }
            };
            let raw_lat = normal(&mut rng, 0.0, 30.0);
            let coastal_bias = exponential(&mut rng);
            let direction = if raw_lat == 0.0 { 0.0 } else { raw_lat.signum() };
            let latitude = coastal_bias.mul_add(direction * 0.1, raw_lat).clamp(-90.0, 90.0);

            let year = years[pick(&mut rng, year_weights.as_ref(), years.len())];
            let concentration = normal(&mut rng, 3.0, 1.0).exp().clamp(0.1, 500.0);
            let polymer_type =
                POLYMER_WEIGHTS[pick(&mut rng, polymer_weights.as_ref(), POLYMER_WEIGHTS.len())].0;
            let source =
                SOURCE_WEIGHTS[pick(&mut rng, source_weights.as_ref(), SOURCE_WEIGHTS.len())].0;
            let sample_date = NaiveDate::from_ymd_opt(year, 1, 1)
                .and_then(|start| start.checked_add_days(Days::new(rng.gen_range(0..365))));
            let method = SAMPLING_METHODS[rng.gen_range(0..SAMPLING_METHODS.len())];

            SampleRecord {
                sample_id: Some(id as u64),
                latitude,
                longitude,
                concentration,
                sample_date,
                year,
                polymer_type: polymer_type.to_string(),
                source: source.to_string(),
                region: assign_region(latitude, longitude),
                method: Some(method.to_string()),
                depth: Some(rng.gen_range(0.0..200.0)),
                salinity: Some(rng.gen_range(25.0..38.0)),
                temperature: Some(normal(&mut rng, 15.0, 8.0)),
            }
        })
        .collect()
}

/// Draws from N(`mean`, `std_dev`^2) using the Box-Muller transform.
pub(crate) fn normal<R: Rng>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = 1.0 - rng.r#gen::<f64>();
    let u2: f64 = rng.r#gen::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    std_dev.mul_add(z, mean)
}

/// Draws from the unit-rate exponential distribution.
fn exponential<R: Rng>(rng: &mut R) -> f64 {
    -(1.0 - rng.r#gen::<f64>()).ln()
}

/// Picks an index with `weights`, or uniformly when no weights are available.
fn pick<R: Rng>(rng: &mut R, weights: Option<&WeightedIndex<f64>>, len: usize) -> usize {
    match weights {
        Some(w) => w.sample(rng),
        None => rng.gen_range(0..len),
    }
}

/// `count` evenly spaced values from `start` to `end` inclusive.
#[allow(clippy::cast_precision_loss)]
fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| step.mul_add(i as f64, start)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Datelike as _;
    use rand::SeedableRng as _;

    use super::*;

    fn small() -> SyntheticConfig {
        SyntheticConfig {
            samples: 300,
            ..SyntheticConfig::default()
        }
    }

    #[test]
    fn same_seed_same_samples() {
        assert_eq!(generate_samples(&small()), generate_samples(&small()));
    }

    #[test]
    fn different_seed_different_samples() {
        let other = SyntheticConfig {
            seed: 7,
            ..small()
        };
        assert_ne!(generate_samples(&small()), generate_samples(&other));
    }

    #[test]
    fn respects_sample_count_and_ids() {
        let samples = generate_samples(&small());
        assert_eq!(samples.len(), 300);
        assert_eq!(samples[0].sample_id, Some(1));
        assert_eq!(samples[299].sample_id, Some(300));
    }

    #[test]
    fn values_stay_in_bounds() {
        for s in generate_samples(&small()) {
            assert!((-90.0..=90.0).contains(&s.latitude));
            assert!((-180.0..=180.0).contains(&s.longitude));
            assert!((0.1..=500.0).contains(&s.concentration));
            assert!((2010..=2024).contains(&s.year));
            assert!(s.region.is_known());
            assert_eq!(s.region, assign_region(s.latitude, s.longitude));
            let date = s.sample_date.unwrap();
            assert_eq!(date.year(), s.year);
            assert!((0.0..200.0).contains(&s.depth.unwrap()));
            assert!((25.0..38.0).contains(&s.salinity.unwrap()));
        }
    }

    #[test]
    fn categories_come_from_vocabularies() {
        for s in generate_samples(&small()) {
            assert!(POLYMER_WEIGHTS.iter().any(|(p, _)| *p == s.polymer_type));
            assert!(SOURCE_WEIGHTS.iter().any(|(p, _)| *p == s.source));
            assert!(SAMPLING_METHODS.contains(&s.method.as_deref().unwrap()));
        }
    }

    #[test]
    fn later_years_are_more_common() {
        let samples = generate_samples(&SyntheticConfig {
            samples: 3000,
            ..SyntheticConfig::default()
        });
        let early = samples.iter().filter(|s| s.year <= 2012).count();
        let late = samples.iter().filter(|s| s.year >= 2022).count();
        assert!(late > early, "late={late} early={early}");
    }

    #[test]
    fn pick_uses_weights_when_present() {
        let mut rng = StdRng::seed_from_u64(3);
        let only_last = WeightedIndex::new([0.0, 0.0, 1.0]).unwrap();
        for _ in 0..50 {
            assert_eq!(pick(&mut rng, Some(&only_last), 3), 2);
            assert!(pick(&mut rng, None, 3) < 3);
        }
    }

    #[test]
    fn linspace_endpoints() {
        let v = linspace(0.05, 0.25, 15);
        assert_eq!(v.len(), 15);
        assert!((v[0] - 0.05).abs() < 1e-12);
        assert!((v[14] - 0.25).abs() < 1e-12);
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
    }
}
