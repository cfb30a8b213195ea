//! Model training module
//!
//! Provides the logistic-regression training engine used by the training
//! job and loaded by the prediction service.

mod config;
mod engine;
mod metrics;
pub mod linear;

pub use config::TrainingConfig;
pub use engine::TrainEngine;
pub use linear::LogisticRegression;
pub use metrics::ModelMetrics;
