//! Concentration regressors.
//!
//! Both tiers implement [`Regressor`]. The predictor fits one to confirm the
//! data supports a model at all; see [`crate::predictor`].

pub mod ensemble;
pub mod linear;

use microplastics_trend_models::{EnsembleConfig, ModelTier};

use crate::TrendError;
use crate::features::{FeatureMatrix, Features};

pub use ensemble::EnsembleRegressor;
pub use linear::LinearRegressor;

/// Minimum samples before the ensemble tier is used.
pub const MIN_ADVANCED_SAMPLES: usize = 20;

/// A fitted model mapping a feature row to a concentration.
pub trait Regressor: std::fmt::Debug {
    /// Predicts the concentration for one feature row.
    fn predict(&self, features: &Features) -> f64;
}

/// Fits the regressor for `tier`.
///
/// The ensemble is only fitted when `tier` is [`ModelTier::Advanced`] and
/// there are at least [`MIN_ADVANCED_SAMPLES`] samples; otherwise a linear
/// fit is used. The tier actually fitted is returned alongside the model.
///
/// # Errors
///
/// * If the matrix is empty
/// * If the fit is degenerate
pub fn fit(
    tier: ModelTier,
    matrix: &FeatureMatrix,
    ensemble: &EnsembleConfig,
) -> Result<(Box<dyn Regressor>, ModelTier), TrendError> {
    if tier == ModelTier::Advanced && matrix.len() >= MIN_ADVANCED_SAMPLES {
        let model = EnsembleRegressor::fit(&matrix.rows, &matrix.targets, ensemble)?;
        return Ok((Box::new(model), ModelTier::Advanced));
    }

    if tier == ModelTier::Advanced {
        log::debug!(
            "Only {} samples (need {MIN_ADVANCED_SAMPLES}), fitting linear model instead",
            matrix.len()
        );
    }

    let model = LinearRegressor::fit(&matrix.rows, &matrix.targets)?;
    Ok((Box::new(model), ModelTier::Simple))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::cast_precision_loss)]
    fn matrix(n: usize) -> FeatureMatrix {
        let rows: Vec<Features> = (0..n)
            .map(|i| [2010.0 + (i % 10) as f64, i as f64, -(i as f64), 2.0])
            .collect();
        let targets = rows.iter().map(|r| r[0] - 2000.0).collect();
        FeatureMatrix {
            rows,
            targets,
            year_buckets: vec![0; n],
        }
    }

    #[test]
    fn advanced_needs_enough_samples() {
        let config = EnsembleConfig {
            trees: 5,
            ..EnsembleConfig::default()
        };
        let (_, tier) = fit(ModelTier::Advanced, &matrix(19), &config).unwrap();
        assert_eq!(tier, ModelTier::Simple);
        let (_, tier) = fit(ModelTier::Advanced, &matrix(20), &config).unwrap();
        assert_eq!(tier, ModelTier::Advanced);
    }

    #[test]
    fn simple_is_always_linear() {
        let (_, tier) = fit(ModelTier::Simple, &matrix(50), &EnsembleConfig::default()).unwrap();
        assert_eq!(tier, ModelTier::Simple);
    }
}
