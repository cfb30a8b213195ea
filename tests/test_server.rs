//! Integration test: server API endpoints

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use polars::prelude::*;
use serde_json::{json, Value};
use tower::ServiceExt;
use wdbc_api::dataset::{FEATURE_NAMES, N_FEATURES, TARGET_COLUMN};
use wdbc_api::server::{create_router, AppState, LoadStrategy, ServerConfig, MODEL_FILE_NAME};
use wdbc_api::training::{TrainEngine, TrainingConfig};

/// Two linearly separable classes across all 30 feature columns.
fn synthetic_df(n: usize) -> DataFrame {
    let mut columns: Vec<Column> = FEATURE_NAMES
        .iter()
        .enumerate()
        .map(|(j, name)| {
            let values: Vec<f64> = (0..n)
                .map(|i| (i % 2) as f64 * 5.0 + 0.1 * j as f64 + 0.01 * i as f64)
                .collect();
            Column::new((*name).into(), values)
        })
        .collect();
    let target: Vec<f64> = (0..n).map(|i| (i % 2) as f64).collect();
    columns.push(Column::new(TARGET_COLUMN.into(), target));
    DataFrame::new(columns).unwrap()
}

fn trained_engine() -> TrainEngine {
    let df = synthetic_df(40);
    let mut engine = TrainEngine::new(TrainingConfig::new(TARGET_COLUMN).with_max_iter(500));
    engine.fit(&df).unwrap();
    engine
}

fn test_config(models_dir: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        models_dir: models_dir.to_string(),
    }
}

/// Router over a state that already holds a fitted model.
fn ready_app() -> axum::Router {
    let state = Arc::new(AppState::with_model(test_config("/nonexistent"), trained_engine()));
    create_router(state)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_response(response).await
}

async fn post_json(app: axum::Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    read_response(response).await
}

async fn read_response(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn valid_features() -> Vec<f64> {
    (0..N_FEATURES).map(|i| i as f64 * 0.5).collect()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = get(ready_app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["message"], "API online and waiting");
}

#[tokio::test]
async fn test_predict_valid_feature_list() {
    let body = json!({ "features": valid_features() });
    let (status, body) = post_json(ready_app(), "/predict", &body).await;
    assert_eq!(status, StatusCode::OK);

    let prediction = body["prediction"].as_str().unwrap();
    assert!(prediction == "Benign" || prediction == "Malignant");

    let probability = body["probability"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&probability));
    // Rounded to 4 decimal places.
    let scaled = probability * 10_000.0;
    assert!((scaled - scaled.round()).abs() < 1e-9);
}

#[tokio::test]
async fn test_predict_valid_named_mapping() {
    let mut map = serde_json::Map::new();
    for (i, name) in FEATURE_NAMES.iter().enumerate() {
        map.insert((*name).to_string(), json!(i as f64 * 0.5));
    }
    let (status, body) = post_json(ready_app(), "/predict", &Value::Object(map)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["prediction"].is_string());
}

#[tokio::test]
async fn test_predict_empty_object() {
    let (status, body) = post_json(ready_app(), "/predict", &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Expected JSON with data");
}

#[tokio::test]
async fn test_predict_empty_body() {
    let response = ready_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let (status, body) = read_response(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Expected JSON with data");
}

#[tokio::test]
async fn test_predict_wrong_length_list() {
    let body = json!({ "features": [1, 2, 3] });
    let (status, body) = post_json(ready_app(), "/predict", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Expected 30 values in 'features' list");
}

#[tokio::test]
async fn test_predict_features_not_a_list() {
    let body = json!({ "features": "incorrect_data" });
    let (status, body) = post_json(ready_app(), "/predict", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Expected 30 values in 'features' list");
}

#[tokio::test]
async fn test_predict_wrong_named_count() {
    let body = json!({ "key_test": [1, 2, 3] });
    let (status, body) = post_json(ready_app(), "/predict", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Expected 30 named features");
}

#[tokio::test]
async fn test_predict_non_numeric_element() {
    let mut values: Vec<Value> = valid_features().into_iter().map(|v| json!(v)).collect();
    values[23] = json!("a");
    let body = json!({ "features": values });
    let (status, body) = post_json(ready_app(), "/predict", &body).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn test_lazy_predict_without_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let state = Arc::new(AppState::new(
        test_config(dir.path().to_str().unwrap()),
        LoadStrategy::Lazy,
    ));
    let app = create_router(state);

    let body = json!({ "features": valid_features() });
    let (status, body) = post_json(app.clone(), "/predict", &body).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Model not loaded yet");

    // The health check does not depend on model state.
    let (status, body) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
async fn test_lazy_load_on_first_request() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join(MODEL_FILE_NAME);
    trained_engine().save(&artifact).unwrap();

    let state = Arc::new(AppState::new(
        test_config(dir.path().to_str().unwrap()),
        LoadStrategy::Lazy,
    ));
    let app = create_router(state);

    let body = json!({ "features": valid_features() });
    let (status, body) = post_json(app.clone(), "/predict", &body).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["prediction"].is_string());

    // Second request hits the already-loaded model.
    let body = json!({ "features": valid_features() });
    let (status, _) = post_json(app, "/predict", &body).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, _) = get(ready_app(), "/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_predict_wrong_method() {
    let (status, _) = get(ready_app(), "/predict").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
