//! Classification metrics

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Evaluation metrics for a binary classifier.
///
/// The positive class is label 1 (malignant).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// Training time in seconds
    pub training_time_secs: f64,
    /// Number of training samples
    pub n_samples: usize,
    /// Number of features
    pub n_features: usize,
}

impl ModelMetrics {
    /// Compute metrics from true and predicted 0/1 labels.
    pub fn classification(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Self {
        let (tp, fp, tn, fn_) = confusion_counts(y_true, y_pred);
        let total = tp + fp + tn + fn_;

        let accuracy = if total > 0 {
            (tp + tn) as f64 / total as f64
        } else {
            0.0
        };
        let precision = if tp + fp > 0 {
            tp as f64 / (tp + fp) as f64
        } else {
            0.0
        };
        let recall = if tp + fn_ > 0 {
            tp as f64 / (tp + fn_) as f64
        } else {
            0.0
        };
        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            accuracy,
            precision,
            recall,
            f1_score,
            ..Default::default()
        }
    }
}

fn confusion_counts(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> (usize, usize, usize, usize) {
    let mut tp = 0;
    let mut fp = 0;
    let mut tn = 0;
    let mut fn_ = 0;

    for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
        let truth = t >= 0.5;
        let guess = p >= 0.5;
        match (truth, guess) {
            (true, true) => tp += 1,
            (false, true) => fp += 1,
            (false, false) => tn += 1,
            (true, false) => fn_ += 1,
        }
    }

    (tp, fp, tn, fn_)
}
