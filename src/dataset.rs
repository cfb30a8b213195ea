//! WDBC dataset acquisition and loading
//!
//! The Breast Cancer Wisconsin Diagnostic dataset (569 samples, 30 numeric
//! features, binary diagnosis) is fetched from the UCI repository on first
//! use and cached as a headered CSV under the data directory. Subsequent
//! runs load the cached file.

use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::info;

use crate::error::{Result, WdbcError};

/// Number of feature columns in a sample.
pub const N_FEATURES: usize = 30;

/// Name of the target column in the cached CSV. Encoded malignant = 1,
/// benign = 0, so predicted class code 1 maps to "Malignant".
pub const TARGET_COLUMN: &str = "diagnosis";

/// Canonical feature column order. Request vectors in the positional form
/// must follow this order; it matches the raw UCI column layout.
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "radius_mean",
    "texture_mean",
    "perimeter_mean",
    "area_mean",
    "smoothness_mean",
    "compactness_mean",
    "concavity_mean",
    "concave_points_mean",
    "symmetry_mean",
    "fractal_dimension_mean",
    "radius_se",
    "texture_se",
    "perimeter_se",
    "area_se",
    "smoothness_se",
    "compactness_se",
    "concavity_se",
    "concave_points_se",
    "symmetry_se",
    "fractal_dimension_se",
    "radius_worst",
    "texture_worst",
    "perimeter_worst",
    "area_worst",
    "smoothness_worst",
    "compactness_worst",
    "concavity_worst",
    "concave_points_worst",
    "symmetry_worst",
    "fractal_dimension_worst",
];

const DATASET_URL: &str =
    "https://archive.ics.uci.edu/ml/machine-learning-databases/breast-cancer-wisconsin/wdbc.data";

const CACHE_FILE: &str = "wdbc.csv";

/// Returns the path of the cached dataset, downloading it first if absent.
pub async fn ensure_cached(data_dir: &Path) -> Result<PathBuf> {
    let path = data_dir.join(CACHE_FILE);
    if path.exists() {
        return Ok(path);
    }

    std::fs::create_dir_all(data_dir)?;

    info!(url = DATASET_URL, "Downloading WDBC dataset");
    let raw = reqwest::get(DATASET_URL)
        .await?
        .error_for_status()?
        .text()
        .await?;

    let csv = rewrite_raw(&raw)?;
    std::fs::write(&path, csv)?;
    info!(path = %path.display(), "Dataset cached");

    Ok(path)
}

/// Loads the cached dataset into a DataFrame.
pub fn load(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(1000))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    info!(
        samples = df.height(),
        columns = df.width(),
        "Breast Cancer Wisconsin dataset loaded"
    );

    Ok(df)
}

/// Rewrites the raw UCI file (`id,diagnosis,30 values`, no header) into a
/// headered CSV with the diagnosis encoded as 1 (M) / 0 (B).
fn rewrite_raw(raw: &str) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    out.push_str(TARGET_COLUMN);
    for name in FEATURE_NAMES {
        out.push(',');
        out.push_str(name);
    }
    out.push('\n');

    for (line_no, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split(',');
        let _id = fields
            .next()
            .ok_or_else(|| WdbcError::Data(format!("line {}: missing id field", line_no + 1)))?;
        let label = match fields.next() {
            Some("M") => "1",
            Some("B") => "0",
            other => {
                return Err(WdbcError::Data(format!(
                    "line {}: unexpected diagnosis {:?}",
                    line_no + 1,
                    other
                )))
            }
        };

        let values: Vec<&str> = fields.collect();
        if values.len() != N_FEATURES {
            return Err(WdbcError::Shape {
                expected: format!("{} feature values", N_FEATURES),
                actual: format!("{} on line {}", values.len(), line_no + 1),
            });
        }

        out.push_str(label);
        for value in values {
            out.push(',');
            out.push_str(value);
        }
        out.push('\n');
    }

    Ok(out)
}
