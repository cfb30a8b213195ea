//! Logistic regression fitted by batch gradient descent

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, WdbcError};

/// Binary logistic-regression classifier.
///
/// Minimises the L2-regularized log-loss by full-batch gradient descent.
/// Stopping within `max_iter` is not required; the model keeps whatever
/// weights the final iteration produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    weights: Option<Array1<f64>>,
    bias: f64,
    /// Maximum iterations
    pub max_iter: usize,
    /// Gradient-descent step size
    pub learning_rate: f64,
    /// L2 regularization strength
    pub alpha: f64,
    /// Convergence tolerance on the gradient norm
    pub tol: f64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self {
            weights: None,
            bias: 0.0,
            max_iter: 1000,
            learning_rate: 0.1,
            alpha: 0.01,
            tol: 1e-6,
        }
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the step size
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the L2 strength
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Fitted coefficient vector, if trained.
    pub fn weights(&self) -> Option<&Array1<f64>> {
        self.weights.as_ref()
    }

    fn sigmoid(z: &Array1<f64>) -> Array1<f64> {
        z.mapv(|v| 1.0 / (1.0 + (-v).exp()))
    }

    /// Fit on a feature matrix and a 0/1 target vector.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(WdbcError::Shape {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(WdbcError::Training("empty training set".to_string()));
        }

        let mut weights: Array1<f64> = Array1::zeros(n_features);
        let mut bias = 0.0;
        let mut iterations = self.max_iter;

        for iter in 0..self.max_iter {
            let linear = x.dot(&weights) + bias;
            let predictions = Self::sigmoid(&linear);
            let errors = &predictions - y;

            let dw = (x.t().dot(&errors) / n_samples as f64) + (self.alpha * &weights);
            let db = errors.mean().unwrap_or(0.0);

            let grad_norm = (dw.mapv(|v| v * v).sum() + db * db).sqrt();
            if grad_norm < self.tol {
                iterations = iter;
                break;
            }

            weights -= &(self.learning_rate * &dw);
            bias -= self.learning_rate * db;
        }

        // Hitting the cap is logged, not an error.
        debug!(iterations, max_iter = self.max_iter, "gradient descent finished");

        self.weights = Some(weights);
        self.bias = bias;

        Ok(self)
    }

    /// Probability of the positive class for each row.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let weights = self.weights.as_ref().ok_or(WdbcError::ModelNotFitted)?;

        if x.ncols() != weights.len() {
            return Err(WdbcError::Shape {
                expected: format!("{} features", weights.len()),
                actual: format!("{} features", x.ncols()),
            });
        }

        let linear = x.dot(weights) + self.bias;
        Ok(Self::sigmoid(&linear))
    }

    /// Class labels (0.0 / 1.0) at the 0.5 threshold.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let proba = self.predict_proba(x)?;
        Ok(proba.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn separable() -> (Array2<f64>, Array1<f64>) {
        let x = array![
            [-2.0, -1.5],
            [-1.8, -2.2],
            [-2.5, -1.0],
            [-1.2, -1.9],
            [2.0, 1.5],
            [1.8, 2.2],
            [2.5, 1.0],
            [1.2, 1.9],
        ];
        let y = array![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
        (x, y)
    }

    #[test]
    fn test_fit_separable() {
        let (x, y) = separable();
        let mut model = LogisticRegression::new().with_max_iter(2000);
        model.fit(&x, &y).unwrap();

        let predictions = model.predict(&x).unwrap();
        assert_eq!(predictions, y);
    }

    #[test]
    fn test_proba_bounds() {
        let (x, y) = separable();
        let mut model = LogisticRegression::new();
        model.fit(&x, &y).unwrap();

        for p in model.predict_proba(&x).unwrap() {
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let model = LogisticRegression::new();
        let x = Array2::zeros((1, 2));
        assert!(matches!(
            model.predict(&x),
            Err(WdbcError::ModelNotFitted)
        ));
    }

    #[test]
    fn test_feature_count_mismatch() {
        let (x, y) = separable();
        let mut model = LogisticRegression::new();
        model.fit(&x, &y).unwrap();

        let wrong = Array2::zeros((1, 3));
        assert!(matches!(
            model.predict_proba(&wrong),
            Err(WdbcError::Shape { .. })
        ));
    }

    #[test]
    fn test_fit_mismatched_lengths() {
        let x = Array2::zeros((4, 2));
        let y = Array1::zeros(3);
        let mut model = LogisticRegression::new();
        assert!(model.fit(&x, &y).is_err());
    }
}
