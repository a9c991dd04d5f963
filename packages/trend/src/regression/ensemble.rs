//! Feature-standardized ensemble of bagged regression trees.
//!
//! Each tree is grown on a bootstrap resample by greedy variance-reduction
//! splits over every feature. Predictions average the trees.

use microplastics_trend_models::EnsembleConfig;
use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng as _};

use crate::TrendError;
use crate::features::{FEATURE_COUNT, Features};
use crate::regression::Regressor;

/// Per-feature standardization to zero mean and unit variance.
///
/// Zero-variance features are left centred but unscaled.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    means: Features,
    scales: Features,
}

impl StandardScaler {
    /// Computes per-feature means and population standard deviations.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fit(rows: &[Features]) -> Self {
        let n = rows.len().max(1) as f64;
        let means: Features =
            std::array::from_fn(|j| rows.iter().map(|r| r[j]).sum::<f64>() / n);
        let scales: Features = std::array::from_fn(|j| {
            let var = rows.iter().map(|r| (r[j] - means[j]).powi(2)).sum::<f64>() / n;
            let sd = var.sqrt();
            if sd > 0.0 && sd.is_finite() { sd } else { 1.0 }
        });
        Self { means, scales }
    }

    /// Standardizes one row.
    #[must_use]
    pub fn transform(&self, row: &Features) -> Features {
        std::array::from_fn(|j| (row[j] - self.means[j]) / self.scales[j])
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn predict(&self, row: &Features) -> f64 {
        let mut node = self;
        loop {
            match node {
                Self::Leaf(value) => return *value,
                Self::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        &**left
                    } else {
                        &**right
                    };
                }
            }
        }
    }
}

struct Split {
    feature: usize,
    threshold: f64,
    sse: f64,
}

/// Bagged regression trees over standardized features.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleRegressor {
    scaler: StandardScaler,
    trees: Vec<Node>,
}

impl EnsembleRegressor {
    /// Fits `config.trees` trees, each on a bootstrap resample drawn from an
    /// RNG seeded with `config.seed`.
    ///
    /// # Errors
    ///
    /// * If `rows` is empty or its length differs from `targets`
    /// * If `config.trees` is zero
    pub fn fit(
        rows: &[Features],
        targets: &[f64],
        config: &EnsembleConfig,
    ) -> Result<Self, TrendError> {
        if rows.is_empty() {
            return Err(TrendError::EmptyDataset);
        }
        if rows.len() != targets.len() {
            return Err(TrendError::DegenerateFit {
                message: format!("{} feature rows but {} targets", rows.len(), targets.len()),
            });
        }
        if config.trees == 0 {
            return Err(TrendError::InvalidParameter {
                name: "trees",
                message: "ensemble needs at least one tree".to_string(),
            });
        }

        let scaler = StandardScaler::fit(rows);
        let scaled: Vec<Features> = rows.iter().map(|r| scaler.transform(r)).collect();
        let mut rng = StdRng::seed_from_u64(config.seed);

        let trees = (0..config.trees)
            .map(|_| {
                let sample: Vec<usize> = (0..rows.len())
                    .map(|_| rng.gen_range(0..rows.len()))
                    .collect();
                grow(&scaled, targets, sample, config.max_depth)
            })
            .collect();

        Ok(Self { scaler, trees })
    }

    /// Number of fitted trees.
    #[must_use]
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for EnsembleRegressor {
    #[allow(clippy::cast_precision_loss)]
    fn predict(&self, features: &Features) -> f64 {
        let row = self.scaler.transform(features);
        self.trees.iter().map(|t| t.predict(&row)).sum::<f64>() / self.trees.len() as f64
    }
}

#[allow(clippy::cast_precision_loss)]
fn leaf_value(targets: &[f64], indices: &[usize]) -> f64 {
    indices.iter().map(|&i| targets[i]).sum::<f64>() / indices.len() as f64
}

fn grow(rows: &[Features], targets: &[f64], indices: Vec<usize>, depth_left: usize) -> Node {
    let value = leaf_value(targets, &indices);
    if depth_left == 0 || indices.len() < 2 {
        return Node::Leaf(value);
    }

    let Some(split) = best_split(rows, targets, &indices) else {
        return Node::Leaf(value);
    };

    let (left, right): (Vec<usize>, Vec<usize>) = indices
        .into_iter()
        .partition(|&i| rows[i][split.feature] <= split.threshold);

    Node::Split {
        feature: split.feature,
        threshold: split.threshold,
        left: Box::new(grow(rows, targets, left, depth_left - 1)),
        right: Box::new(grow(rows, targets, right, depth_left - 1)),
    }
}

/// Finds the split minimizing the summed squared error of both children.
/// Returns `None` when no split improves on the parent.
#[allow(clippy::cast_precision_loss)]
fn best_split(rows: &[Features], targets: &[f64], indices: &[usize]) -> Option<Split> {
    let n = indices.len() as f64;
    let total: f64 = indices.iter().map(|&i| targets[i]).sum();
    let total_sq: f64 = indices.iter().map(|&i| targets[i] * targets[i]).sum();
    let parent_sse = total.mul_add(-total / n, total_sq);

    let mut best: Option<Split> = None;
    let mut sorted = indices.to_vec();

    for feature in 0..FEATURE_COUNT {
        sorted.sort_by(|&a, &b| rows[a][feature].total_cmp(&rows[b][feature]));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for k in 0..sorted.len() - 1 {
            let y = targets[sorted[k]];
            left_sum += y;
            left_sq = y.mul_add(y, left_sq);

            let here = rows[sorted[k]][feature];
            let next = rows[sorted[k + 1]][feature];
            if next <= here {
                continue;
            }

            let left_n = (k + 1) as f64;
            let right_n = n - left_n;
            let right_sum = total - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = left_sum.mul_add(-left_sum / left_n, left_sq)
                + right_sum.mul_add(-right_sum / right_n, right_sq);

            if best.as_ref().is_none_or(|b| sse < b.sse) {
                best = Some(Split {
                    feature,
                    threshold: f64::midpoint(here, next),
                    sse,
                });
            }
        }
    }

    best.filter(|b| b.sse < parent_sse - 1e-12 * parent_sse.abs().max(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_data() -> (Vec<Features>, Vec<f64>) {
        let rows: Vec<Features> = (0..40)
            .map(|i| [2000.0 + f64::from(i), 1.0, 1.0, 2.0])
            .collect();
        let targets = rows
            .iter()
            .map(|r| if r[0] < 2020.0 { 10.0 } else { 100.0 })
            .collect();
        (rows, targets)
    }

    #[test]
    fn learns_a_step_function() {
        let (rows, targets) = step_data();
        let model = EnsembleRegressor::fit(&rows, &targets, &EnsembleConfig::default()).unwrap();
        assert_eq!(model.tree_count(), 100);
        assert!(model.predict(&[2005.0, 1.0, 1.0, 2.0]) < 30.0);
        assert!(model.predict(&[2035.0, 1.0, 1.0, 2.0]) > 80.0);
    }

    #[test]
    fn same_seed_same_model() {
        let (rows, targets) = step_data();
        let config = EnsembleConfig {
            trees: 10,
            ..EnsembleConfig::default()
        };
        let a = EnsembleRegressor::fit(&rows, &targets, &config).unwrap();
        let b = EnsembleRegressor::fit(&rows, &targets, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn constant_target_is_a_single_leaf() {
        let rows: Vec<Features> = (0..25).map(|i| [f64::from(i), 0.0, 0.0, 1.0]).collect();
        let targets = vec![42.0; 25];
        let model = EnsembleRegressor::fit(&rows, &targets, &EnsembleConfig::default()).unwrap();
        assert!((model.predict(&[3.0, 0.0, 0.0, 1.0]) - 42.0).abs() < 1e-9);
    }

    #[test]
    fn scaler_handles_constant_columns() {
        let scaler = StandardScaler::fit(&[[1.0, 5.0, 0.0, 0.0], [3.0, 5.0, 0.0, 0.0]]);
        let t = scaler.transform(&[3.0, 5.0, 0.0, 0.0]);
        assert!((t[0] - 1.0).abs() < 1e-12);
        assert!(t[1].abs() < 1e-12);
    }

    #[test]
    fn rejects_zero_trees() {
        let (rows, targets) = step_data();
        let config = EnsembleConfig {
            trees: 0,
            ..EnsembleConfig::default()
        };
        assert!(matches!(
            EnsembleRegressor::fit(&rows, &targets, &config),
            Err(TrendError::InvalidParameter { .. })
        ));
    }
}
