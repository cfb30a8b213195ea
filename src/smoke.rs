//! Observational smoke test against a running instance
//!
//! Fires a fixed sequence of requests — one healthy, one valid prediction
//! and four deliberately malformed predictions — and logs each response.
//! Nothing is asserted; the output is for visual inspection.

use reqwest::Client;
use serde_json::{json, Value};
use tracing::info;

/// The valid example vector (30 values in canonical column order).
const VALID_FEATURES: [f64; 30] = [
    14.2, 20.3, 92.4, 600.5, 0.1, 0.2, 0.3, 0.1, 0.2, 0.05, //
    0.3, 1.0, 2.0, 30.0, 0.01, 0.1, 0.05, 0.01, 0.05, 0.01, //
    15.0, 25.0, 100.0, 700.0, 0.12, 0.4, 0.6, 0.2, 0.3, 0.08,
];

/// Run the six-request smoke sequence against `base_url`.
pub async fn run(base_url: &str) -> anyhow::Result<()> {
    let client = Client::new();
    info!("Starting REST API smoke test");

    // 1. Health check
    let response = client.get(format!("{}/", base_url)).send().await?;
    log_response("GET /", response).await?;

    // 2. Valid prediction
    let body = json!({ "features": VALID_FEATURES });
    let response = client
        .post(format!("{}/predict", base_url))
        .json(&body)
        .send()
        .await?;
    log_response("POST /predict (valid)", response).await?;

    // 3. Wrong key
    let body = json!({ "key_test": [1, 2, 3] });
    let response = client
        .post(format!("{}/predict", base_url))
        .json(&body)
        .send()
        .await?;
    log_response("POST /predict (wrong key)", response).await?;

    // 4. Wrong data type
    let body = json!({ "features": "incorrect_data" });
    let response = client
        .post(format!("{}/predict", base_url))
        .json(&body)
        .send()
        .await?;
    log_response("POST /predict (wrong type)", response).await?;

    // 5. Empty JSON
    let response = client
        .post(format!("{}/predict", base_url))
        .json(&json!({}))
        .send()
        .await?;
    log_response("POST /predict (empty)", response).await?;

    // 6. Corrupted data (non-numeric element)
    let mut corrupted: Vec<Value> = VALID_FEATURES.iter().map(|&v| json!(v)).collect();
    corrupted[23] = json!("a");
    let body = json!({ "features": corrupted });
    let response = client
        .post(format!("{}/predict", base_url))
        .json(&body)
        .send()
        .await?;
    log_response("POST /predict (corrupted)", response).await?;

    info!("Smoke test complete");
    Ok(())
}

async fn log_response(label: &str, response: reqwest::Response) -> anyhow::Result<()> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    info!(status, body = %body.trim(), "{}", label);
    Ok(())
}
