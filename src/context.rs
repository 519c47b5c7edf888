// src/context.rs

use crate::aggregator::Aggregator;
use crate::config::AppConfig;
use crate::dataset::DatasetStore;
use crate::errors::AppError;
use crate::sources::{HttpClient, ReqwestClient};
use std::sync::Arc;

/// Process-wide state, built once at startup and shared read-only by every
/// request.
pub struct AppContext {
    pub store: DatasetStore,
    pub aggregator: Aggregator,
}

impl AppContext {
    pub fn new(store: DatasetStore, aggregator: Aggregator) -> Self {
        Self { store, aggregator }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let store = DatasetStore::load(&config.dataset_path)?;

        let http: Arc<dyn HttpClient> = Arc::new(
            ReqwestClient::new(config.http_timeout())
                .map_err(|e| AppError::HttpClient(e.to_string()))?,
        );

        Ok(Self::new(store, Aggregator::from_config(config, http)))
    }
}
