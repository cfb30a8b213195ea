//! Breast Cancer Wisconsin prediction service
//!
//! This crate trains a logistic-regression classifier on the WDBC dataset
//! and serves it over a minimal HTTP API.
//!
//! # Modules
//!
//! - [`dataset`] - WDBC dataset acquisition and loading
//! - [`training`] - Logistic-regression training engine and metrics
//! - [`server`] - HTTP server with health-check and predict endpoints
//! - [`smoke`] - Observational smoke-test client
//! - [`cli`] - Command-line interface and interactive launcher

// Core error handling
pub mod error;

// Training pipeline
pub mod dataset;
pub mod training;

// Services
pub mod server;
pub mod smoke;
pub mod cli;

// Logging setup shared by all commands
pub mod logging;

pub use error::{Result, WdbcError};
