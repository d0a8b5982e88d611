use std::sync::Arc;

use crate::config::Config;
use crate::service::{ChatService, ExecutorFactory};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Configuration read once at startup.
    pub config: Arc<Config>,
    /// Builds a fresh agent executor per request.
    pub executors: Arc<dyn ExecutorFactory>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let executors = Arc::new(ChatService::new(config.clone()));
        Self { config, executors }
    }

    pub fn with_executors(config: Config, executors: Arc<dyn ExecutorFactory>) -> Self {
        Self {
            config: Arc::new(config),
            executors,
        }
    }
}
