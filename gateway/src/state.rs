use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state
///
/// Built once at startup and handed to every handler through axum's `State`
/// extractor. Nothing in it changes after construction.
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Arc<Self> {
        Arc::new(Self { config })
    }
}
