use std::sync::Arc;

use crate::config::HubConfig;
use crate::error::HubError;
use crate::kv::KvStore;

/// Shared application state, passed to all route handlers via `axum::extract::State`.
pub struct AppState {
    pub config: HubConfig,
    pub kv: KvStore,
}

impl AppState {
    pub fn new(config: HubConfig) -> Result<Arc<Self>, HubError> {
        let kv = KvStore::connect(&config.kv_url)?;
        Ok(Arc::new(Self { config, kv }))
    }
}
