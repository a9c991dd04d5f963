//! Ordinary least-squares linear regression.

use crate::TrendError;
use crate::features::{FEATURE_COUNT, Features};
use crate::regression::Regressor;

/// Relative ridge term that keeps rank-deficient systems solvable (for
/// example a constant latitude column) without visibly biasing the fit.
const RIDGE: f64 = 1e-9;

/// Linear model `y = intercept + coefficients · x`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegressor {
    /// Per-feature coefficients.
    pub coefficients: Features,
    /// Intercept.
    pub intercept: f64,
}

impl LinearRegressor {
    /// Fits by least squares on mean-centred data.
    ///
    /// # Errors
    ///
    /// * If `rows` is empty or its length differs from `targets`
    /// * If the normal equations cannot be solved or produce non-finite
    ///   coefficients
    #[allow(clippy::cast_precision_loss)]
    pub fn fit(rows: &[Features], targets: &[f64]) -> Result<Self, TrendError> {
        if rows.is_empty() {
            return Err(TrendError::EmptyDataset);
        }
        if rows.len() != targets.len() {
            return Err(TrendError::DegenerateFit {
                message: format!("{} feature rows but {} targets", rows.len(), targets.len()),
            });
        }

        let n = rows.len() as f64;
        let mut x_mean = [0.0; FEATURE_COUNT];
        for row in rows {
            for (m, v) in x_mean.iter_mut().zip(row) {
                *m += v / n;
            }
        }
        let y_mean = targets.iter().sum::<f64>() / n;

        let mut gram = [[0.0; FEATURE_COUNT]; FEATURE_COUNT];
        let mut moment = [0.0; FEATURE_COUNT];
        for (row, y) in rows.iter().zip(targets) {
            let centred: Features = std::array::from_fn(|j| row[j] - x_mean[j]);
            let dy = y - y_mean;
            for i in 0..FEATURE_COUNT {
                moment[i] = centred[i].mul_add(dy, moment[i]);
                for j in 0..FEATURE_COUNT {
                    gram[i][j] = centred[i].mul_add(centred[j], gram[i][j]);
                }
            }
        }

        let scale = (0..FEATURE_COUNT).map(|i| gram[i][i]).sum::<f64>() / FEATURE_COUNT as f64;
        let ridge = RIDGE * scale.max(1.0);
        for (i, row) in gram.iter_mut().enumerate() {
            row[i] += ridge;
        }

        let coefficients = solve(gram, moment)?;
        let intercept = coefficients
            .iter()
            .zip(&x_mean)
            .fold(y_mean, |acc, (c, m)| c.mul_add(-m, acc));

        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(TrendError::DegenerateFit {
                message: "non-finite regression coefficients".to_string(),
            });
        }

        Ok(Self {
            coefficients,
            intercept,
        })
    }
}

impl Regressor for LinearRegressor {
    fn predict(&self, features: &Features) -> f64 {
        self.coefficients
            .iter()
            .zip(features)
            .fold(self.intercept, |acc, (c, x)| c.mul_add(*x, acc))
    }
}

/// Solves `a · x = b` by Gaussian elimination with partial pivoting.
fn solve(
    mut a: [[f64; FEATURE_COUNT]; FEATURE_COUNT],
    mut b: Features,
) -> Result<Features, TrendError> {
    for col in 0..FEATURE_COUNT {
        let pivot = (col..FEATURE_COUNT)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < f64::MIN_POSITIVE {
            return Err(TrendError::DegenerateFit {
                message: format!("singular normal equations at feature {col}"),
            });
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..FEATURE_COUNT {
            let factor = a[row][col] / a[col][col];
            for k in col..FEATURE_COUNT {
                a[row][k] = factor.mul_add(-a[col][k], a[row][k]);
            }
            b[row] = factor.mul_add(-b[col], b[row]);
        }
    }

    let mut x = [0.0; FEATURE_COUNT];
    for row in (0..FEATURE_COUNT).rev() {
        let tail = (row + 1..FEATURE_COUNT).fold(b[row], |acc, k| a[row][k].mul_add(-x[k], acc));
        x[row] = tail / a[row][row];
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_exact_linear_relationship() {
        let rows: Vec<Features> = (0..30)
            .map(|i| {
                let i = f64::from(i);
                [2000.0 + i, (i * 0.7).sin() * 10.0, (i * 1.3).cos() * 20.0, (i % 4.0) + 1.0]
            })
            .collect();
        let targets: Vec<f64> = rows
            .iter()
            .map(|r| 3.0f64.mul_add(r[0] - 2000.0, 2.0 * r[1]) - 0.5 * r[2] + r[3] + 7.0)
            .collect();

        let model = LinearRegressor::fit(&rows, &targets).unwrap();
        assert!((model.coefficients[0] - 3.0).abs() < 1e-4);
        assert!((model.coefficients[1] - 2.0).abs() < 1e-4);
        assert!((model.coefficients[2] + 0.5).abs() < 1e-4);
        for (row, y) in rows.iter().zip(&targets) {
            assert!((model.predict(row) - y).abs() < 1e-3);
        }
    }

    #[test]
    fn constant_features_predict_the_mean() {
        let rows = vec![[2020.0, 5.0, 5.0, 2.0]; 5];
        let targets = [120.0, 95.0, 150.0, 80.0, 200.0];
        let model = LinearRegressor::fit(&rows, &targets).unwrap();
        assert!((model.predict(&rows[0]) - 129.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_empty_and_mismatched_input() {
        assert!(matches!(
            LinearRegressor::fit(&[], &[]),
            Err(TrendError::EmptyDataset)
        ));
        assert!(matches!(
            LinearRegressor::fit(&[[0.0; FEATURE_COUNT]], &[1.0, 2.0]),
            Err(TrendError::DegenerateFit { .. })
        ));
    }
}
