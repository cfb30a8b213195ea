//! Error types for the server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::WdbcError;

/// Request-handling errors, each mapped to a fixed status and message.
///
/// Internal causes are logged server-side and never exposed to callers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Expected JSON with data")]
    EmptyBody,

    #[error("Expected 30 values in 'features' list")]
    FeatureList,

    #[error("Expected 30 named features")]
    NamedFeatures,

    #[error("Model not loaded yet")]
    ModelUnavailable,

    #[error("Internal server error")]
    Inference(#[source] WdbcError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::EmptyBody | ApiError::FeatureList | ApiError::NamedFeatures => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Inference(cause) => {
                tracing::error!(detail = %cause, "Prediction error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_contract() {
        assert_eq!(ApiError::EmptyBody.to_string(), "Expected JSON with data");
        assert_eq!(
            ApiError::FeatureList.to_string(),
            "Expected 30 values in 'features' list"
        );
        assert_eq!(
            ApiError::NamedFeatures.to_string(),
            "Expected 30 named features"
        );
        assert_eq!(ApiError::ModelUnavailable.to_string(), "Model not loaded yet");
        assert_eq!(
            ApiError::Inference(WdbcError::ModelNotFitted).to_string(),
            "Internal server error"
        );
    }
}
