//! Training configuration

use serde::{Deserialize, Serialize};

/// Configuration for a training run.
///
/// Defaults reproduce the canonical run: 80/20 split with seed 42 and a
/// generous iteration cap so gradient descent converges on the
/// standardized WDBC features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Name of the target column in the training DataFrame
    pub target_column: String,
    /// Fraction of samples held out for evaluation
    pub test_split: f64,
    /// Shuffle seed for the train/test split
    pub seed: u64,
    /// Maximum gradient-descent iterations
    pub max_iter: usize,
    /// Gradient-descent step size
    pub learning_rate: f64,
    /// L2 regularization strength
    pub alpha: f64,
    /// Convergence tolerance on the gradient norm
    pub tol: f64,
}

impl TrainingConfig {
    pub fn new(target_column: impl Into<String>) -> Self {
        Self {
            target_column: target_column.into(),
            test_split: 0.2,
            seed: 42,
            max_iter: 5000,
            learning_rate: 0.1,
            alpha: 0.01,
            tol: 1e-6,
        }
    }

    /// Set the shuffle seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the held-out fraction
    pub fn with_test_split(mut self, test_split: f64) -> Self {
        self.test_split = test_split;
        self
    }

    /// Set the iteration cap
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }
}
