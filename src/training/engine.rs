//! Training engine implementation

use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{LogisticRegression, ModelMetrics, TrainingConfig};
use crate::error::{Result, WdbcError};

/// Per-feature standardization fitted on the training split.
///
/// The parameters are serialized with the engine so the service applies
/// the same transform at inference time.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Scaler {
    mean: Array1<f64>,
    std: Array1<f64>,
}

impl Scaler {
    fn fit(x: &Array2<f64>) -> Self {
        let n = x.nrows().max(1) as f64;
        let n_cols = x.ncols();

        let mut mean = Array1::zeros(n_cols);
        for j in 0..n_cols {
            mean[j] = x.column(j).sum() / n;
        }

        let mut std = Array1::zeros(n_cols);
        for j in 0..n_cols {
            let var = x.column(j).iter().map(|v| (v - mean[j]).powi(2)).sum::<f64>() / n;
            // Constant columns keep a unit denominator instead of dividing by zero.
            std[j] = var.sqrt().max(1e-12);
        }

        Self { mean, std }
    }

    fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        Array2::from_shape_fn(x.dim(), |(i, j)| (x[[i, j]] - self.mean[j]) / self.std[j])
    }
}

/// Trains, evaluates and persists the classifier.
///
/// The serialized engine is the model artifact: feature names, scaler
/// parameters, fitted weights, evaluation metrics and the training
/// timestamp all round-trip through [`TrainEngine::save`] /
/// [`TrainEngine::load`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainEngine {
    config: TrainingConfig,
    feature_names: Vec<String>,
    scaler: Option<Scaler>,
    model: Option<LogisticRegression>,
    metrics: Option<ModelMetrics>,
    trained_at: Option<DateTime<Utc>>,
}

impl TrainEngine {
    /// Create a new training engine
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            feature_names: Vec::new(),
            scaler: None,
            model: None,
            metrics: None,
            trained_at: None,
        }
    }

    /// Fit the model to the data
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        let start = Instant::now();

        let (x, y) = self.prepare_data(df)?;
        let (x_train, x_test, y_train, y_test) = self.shuffled_split(&x, &y)?;
        info!(
            train_samples = x_train.nrows(),
            test_samples = x_test.nrows(),
            "Data split"
        );

        let scaler = Scaler::fit(&x_train);
        let x_train = scaler.transform(&x_train);
        let x_test = scaler.transform(&x_test);

        let mut model = LogisticRegression::new()
            .with_max_iter(self.config.max_iter)
            .with_learning_rate(self.config.learning_rate)
            .with_alpha(self.config.alpha);
        model.tol = self.config.tol;
        model.fit(&x_train, &y_train)?;

        let y_pred = model.predict(&x_test)?;
        let mut metrics = ModelMetrics::classification(&y_test, &y_pred);
        metrics.training_time_secs = start.elapsed().as_secs_f64();
        metrics.n_samples = x.nrows();
        metrics.n_features = x.ncols();

        self.scaler = Some(scaler);
        self.model = Some(model);
        self.metrics = Some(metrics);
        self.trained_at = Some(Utc::now());

        Ok(self)
    }

    /// Make predictions on new data, selecting columns by training names
    pub fn predict(&self, df: &DataFrame) -> Result<Array1<f64>> {
        let x = Self::columns_to_array2(df, &self.feature_names)?;
        self.predict_array(&x)
    }

    /// Class labels (0.0 / 1.0) for a raw feature matrix in training
    /// column order.
    pub fn predict_array(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let (model, scaler) = self.fitted()?;
        self.check_width(x)?;
        model.predict(&scaler.transform(x))
    }

    /// Positive-class probabilities for a raw feature matrix.
    pub fn predict_proba_array(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let (model, scaler) = self.fitted()?;
        self.check_width(x)?;
        model.predict_proba(&scaler.transform(x))
    }

    /// Get training metrics
    pub fn metrics(&self) -> Option<&ModelMetrics> {
        self.metrics.as_ref()
    }

    /// Get feature names
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Expected feature count
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// When the artifact was produced
    pub fn trained_at(&self) -> Option<DateTime<Utc>> {
        self.trained_at
    }

    /// Save the engine to a file, creating the parent directory if absent.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load an engine from a file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let engine: Self = serde_json::from_str(&json)?;
        if engine.model.is_none() || engine.scaler.is_none() {
            return Err(WdbcError::ModelNotFitted);
        }
        Ok(engine)
    }

    fn fitted(&self) -> Result<(&LogisticRegression, &Scaler)> {
        match (&self.model, &self.scaler) {
            (Some(model), Some(scaler)) => Ok((model, scaler)),
            _ => Err(WdbcError::ModelNotFitted),
        }
    }

    fn check_width(&self, x: &Array2<f64>) -> Result<()> {
        if x.ncols() != self.feature_names.len() {
            return Err(WdbcError::Shape {
                expected: format!("{} features", self.feature_names.len()),
                actual: format!("{} features", x.ncols()),
            });
        }
        Ok(())
    }

    fn prepare_data(&mut self, df: &DataFrame) -> Result<(Array2<f64>, Array1<f64>)> {
        let feature_cols: Vec<String> = df
            .get_column_names()
            .into_iter()
            .filter(|name| name.as_str() != self.config.target_column)
            .map(|s| s.to_string())
            .collect();

        if feature_cols.is_empty() {
            return Err(WdbcError::Data("no feature columns".to_string()));
        }
        self.feature_names = feature_cols.clone();

        let target = df
            .column(&self.config.target_column)
            .map_err(|_| WdbcError::FeatureNotFound(self.config.target_column.clone()))?;
        let target_f64 = target.cast(&DataType::Float64)?;
        let y: Array1<f64> = target_f64
            .as_materialized_series()
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(0.0))
            .collect();

        let x = Self::columns_to_array2(df, &feature_cols)?;

        Ok((x, y))
    }

    /// Extract named columns from a DataFrame into a row-major Array2<f64>.
    fn columns_to_array2(df: &DataFrame, col_names: &[String]) -> Result<Array2<f64>> {
        let n_rows = df.height();
        let n_cols = col_names.len();

        let col_data: Vec<Vec<f64>> = col_names
            .iter()
            .map(|col_name| {
                let column = df
                    .column(col_name)
                    .map_err(|_| WdbcError::FeatureNotFound(col_name.clone()))?;
                let column_f64 = column.cast(&DataType::Float64)?;
                let values: Vec<f64> = column_f64
                    .as_materialized_series()
                    .f64()?
                    .into_iter()
                    .map(|v| v.unwrap_or(0.0))
                    .collect();
                Ok(values)
            })
            .collect::<Result<Vec<Vec<f64>>>>()?;

        Ok(Array2::from_shape_fn((n_rows, n_cols), |(r, c)| {
            col_data[c][r]
        }))
    }

    /// Deterministic shuffled train/test split.
    fn shuffled_split(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
    ) -> Result<(Array2<f64>, Array2<f64>, Array1<f64>, Array1<f64>)> {
        let n = x.nrows();
        let test_size = ((n as f64) * self.config.test_split).round() as usize;
        if test_size == 0 || test_size >= n {
            return Err(WdbcError::Data(format!(
                "cannot split {} samples with test fraction {}",
                n, self.config.test_split
            )));
        }

        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        indices.shuffle(&mut rng);
        let (test_idx, train_idx) = indices.split_at(test_size);

        let n_cols = x.ncols();
        let x_train =
            Array2::from_shape_fn((train_idx.len(), n_cols), |(i, j)| x[[train_idx[i], j]]);
        let x_test =
            Array2::from_shape_fn((test_idx.len(), n_cols), |(i, j)| x[[test_idx[i], j]]);
        let y_train = Array1::from_iter(train_idx.iter().map(|&i| y[i]));
        let y_test = Array1::from_iter(test_idx.iter().map(|&i| y[i]));

        Ok((x_train, x_test, y_train, y_test))
    }
}
