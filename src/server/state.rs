//! Application state management

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info};

use super::error::ApiError;
use super::ServerConfig;
use crate::training::TrainEngine;

/// File name of the model artifact under the models directory.
pub const MODEL_FILE_NAME: &str = "model_breast_cancer.json";

/// When the model artifact is read from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStrategy {
    /// Load at startup; a missing artifact aborts the process.
    Eager,
    /// Load on the first predict request; answer 503 until ready.
    Lazy,
}

/// Load state of the model, tracked explicitly instead of a nullable
/// global.
pub enum ModelState {
    Unloaded,
    Ready(Arc<TrainEngine>),
    Failed(String),
}

/// Application state shared across handlers.
///
/// The engine is immutable once loaded; the lock only serializes the
/// load itself.
pub struct AppState {
    pub config: ServerConfig,
    strategy: LoadStrategy,
    model: RwLock<ModelState>,
}

impl AppState {
    pub fn new(config: ServerConfig, strategy: LoadStrategy) -> Self {
        Self {
            config,
            strategy,
            model: RwLock::new(ModelState::Unloaded),
        }
    }

    /// Build a state that already holds a fitted engine.
    pub fn with_model(config: ServerConfig, engine: TrainEngine) -> Self {
        Self {
            config,
            strategy: LoadStrategy::Eager,
            model: RwLock::new(ModelState::Ready(Arc::new(engine))),
        }
    }

    /// Path of the model artifact.
    pub fn artifact_path(&self) -> PathBuf {
        PathBuf::from(&self.config.models_dir).join(MODEL_FILE_NAME)
    }

    /// Load the artifact now. Used by the eager strategy at startup, where
    /// a missing artifact is fatal.
    pub async fn load_eager(&self) -> crate::Result<()> {
        let path = self.artifact_path();
        let engine = TrainEngine::load(&path)?;
        info!(path = %path.display(), "Classification model loaded into memory");
        *self.model.write().await = ModelState::Ready(Arc::new(engine));
        Ok(())
    }

    /// The engine, if ready. With the lazy strategy an Unloaded or Failed
    /// state triggers a load attempt; the artifact may appear on disk
    /// after the server starts, so failures are retried on later requests.
    pub async fn model(&self) -> Result<Arc<TrainEngine>, ApiError> {
        if let ModelState::Ready(engine) = &*self.model.read().await {
            return Ok(Arc::clone(engine));
        }

        if self.strategy == LoadStrategy::Eager {
            // Eager startup either succeeded or aborted the process.
            return Err(ApiError::ModelUnavailable);
        }

        let mut state = self.model.write().await;
        // Another request may have finished the load while we waited.
        if let ModelState::Ready(engine) = &*state {
            return Ok(Arc::clone(engine));
        }

        let path = self.artifact_path();
        match TrainEngine::load(&path) {
            Ok(engine) => {
                info!(path = %path.display(), "Classification model loaded into memory");
                let engine = Arc::new(engine);
                *state = ModelState::Ready(Arc::clone(&engine));
                Ok(engine)
            }
            Err(cause) => {
                error!(path = %path.display(), detail = %cause, "Model load failed");
                *state = ModelState::Failed(cause.to_string());
                Err(ApiError::ModelUnavailable)
            }
        }
    }
}
