//! HTTP request handlers

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use ndarray::Array2;
use serde_json::{json, Value};
use tracing::info;

use super::error::{ApiError, Result};
use super::state::AppState;
use crate::dataset::N_FEATURES;
use crate::error::WdbcError;

/// `GET /` — liveness payload, independent of model state.
pub async fn health_check() -> Json<Value> {
    info!("Health check requested");
    Json(json!({
        "status": "OK",
        "message": "API online and waiting",
    }))
}

/// `POST /predict`
///
/// Accepts either `{"features": [v1..v30]}` (positional) or a flat
/// mapping with exactly 30 entries (values taken in document order,
/// keys not validated).
pub async fn predict(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<Value>> {
    let features = parse_features(&body)?;
    let engine = state.model().await?;

    let x = Array2::from_shape_vec((1, N_FEATURES), features)
        .map_err(|e| ApiError::Inference(WdbcError::Data(e.to_string())))?;
    let proba = engine
        .predict_proba_array(&x)
        .map_err(ApiError::Inference)?;

    // Class code 1 is malignant; report the probability of the
    // predicted class.
    let p_malignant = proba[0];
    let (label, p) = if p_malignant >= 0.5 {
        ("Malignant", p_malignant)
    } else {
        ("Benign", 1.0 - p_malignant)
    };
    let probability = round4(p);

    info!(prediction = label, probability, "Prediction served");
    Ok(Json(json!({
        "prediction": label,
        "probability": probability,
    })))
}

/// Validate the request body and extract the feature vector.
///
/// Count validation happens before element conversion, so a correct-length
/// list with a non-numeric element surfaces as an inference error (500),
/// not a validation error.
fn parse_features(body: &[u8]) -> Result<Vec<f64>> {
    let data: Value = serde_json::from_slice(body).map_err(|_| ApiError::EmptyBody)?;
    let object = match data.as_object() {
        Some(object) if !object.is_empty() => object,
        _ => return Err(ApiError::EmptyBody),
    };

    if let Some(features) = object.get("features") {
        let list = match features.as_array() {
            Some(list) if list.len() == N_FEATURES => list,
            _ => return Err(ApiError::FeatureList),
        };
        numeric_values(list.iter())
    } else {
        if object.len() != N_FEATURES {
            return Err(ApiError::NamedFeatures);
        }
        numeric_values(object.values())
    }
}

fn numeric_values<'a>(values: impl Iterator<Item = &'a Value>) -> Result<Vec<f64>> {
    values
        .map(|value| {
            value.as_f64().ok_or_else(|| {
                ApiError::Inference(WdbcError::Inference(format!(
                    "non-numeric feature value: {}",
                    value
                )))
            })
        })
        .collect()
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_parse_positional_features() {
        let values: Vec<f64> = (0..N_FEATURES).map(|i| i as f64).collect();
        let parsed = parse_features(&body(json!({ "features": values }))).unwrap();
        assert_eq!(parsed.len(), N_FEATURES);
        assert_eq!(parsed[3], 3.0);
    }

    #[test]
    fn test_parse_named_features_document_order() {
        let mut map = serde_json::Map::new();
        // Keys deliberately out of alphabetical order.
        for i in (0..N_FEATURES).rev() {
            map.insert(format!("col{}", i), json!(i as f64));
        }
        let parsed = parse_features(&body(Value::Object(map))).unwrap();
        assert_eq!(parsed[0], (N_FEATURES - 1) as f64);
        assert_eq!(parsed[N_FEATURES - 1], 0.0);
    }

    #[test]
    fn test_parse_empty_object() {
        assert!(matches!(
            parse_features(&body(json!({}))),
            Err(ApiError::EmptyBody)
        ));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse_features(b"not json"),
            Err(ApiError::EmptyBody)
        ));
    }

    #[test]
    fn test_parse_short_feature_list() {
        assert!(matches!(
            parse_features(&body(json!({ "features": [1.0, 2.0, 3.0] }))),
            Err(ApiError::FeatureList)
        ));
    }

    #[test]
    fn test_parse_non_list_features() {
        assert!(matches!(
            parse_features(&body(json!({ "features": "incorrect_data" }))),
            Err(ApiError::FeatureList)
        ));
    }

    #[test]
    fn test_parse_wrong_named_count() {
        assert!(matches!(
            parse_features(&body(json!({ "a": 1.0, "b": 2.0 }))),
            Err(ApiError::NamedFeatures)
        ));
    }

    #[test]
    fn test_parse_non_numeric_element_is_inference_error() {
        let mut values: Vec<Value> = (0..N_FEATURES).map(|i| json!(i as f64)).collect();
        values[23] = json!("a");
        assert!(matches!(
            parse_features(&body(json!({ "features": values }))),
            Err(ApiError::Inference(_))
        ));
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.123_456), 0.1235);
        assert_eq!(round4(1.0), 1.0);
        assert_eq!(round4(0.0), 0.0);
    }
}
