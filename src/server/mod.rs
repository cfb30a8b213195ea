//! Prediction service module
//!
//! Single-process HTTP server exposing a health check and a predict
//! endpoint over the persisted classifier.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ApiError;
pub use state::{AppState, LoadStrategy, ModelState, MODEL_FILE_NAME};

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub models_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            models_dir: std::env::var("MODELS_DIR").unwrap_or_else(|_| "models".to_string()),
        }
    }
}

/// Start the server with the given configuration.
///
/// With [`LoadStrategy::Eager`] the model artifact is loaded before the
/// listener binds; a missing artifact is fatal. With
/// [`LoadStrategy::Lazy`] the first predict request triggers the load.
pub async fn run_server(config: ServerConfig, strategy: LoadStrategy) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config.clone(), strategy));

    if strategy == LoadStrategy::Eager {
        state.load_eager().await.with_context(|| {
            format!(
                "model artifact not loadable: {} (run `wdbc-api train` first)",
                state.artifact_path().display()
            )
        })?;
    }

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        host = %config.host,
        port = config.port,
        pid = std::process::id(),
        "API online and waiting"
    );

    let shutdown_signal = async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received, stopping server gracefully");
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.models_dir, "models");
    }
}
