use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::hod::JobApi;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub hod: Arc<dyn JobApi>,
}

impl AppState {
    pub fn new(config: AppConfig, hod: Arc<dyn JobApi>) -> Self {
        Self {
            config: Arc::new(config),
            hod,
        }
    }
}
