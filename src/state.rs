use std::sync::Arc;

use crate::config::Config;
use crate::error::AppResult;
use crate::services::backend::{BackendClient, SummarySource};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Where transactions and categories come from; the backend client in
    /// production, an in-memory source in tests.
    pub source: Arc<dyn SummarySource>,
}

impl AppState {
    pub fn new(config: Config, source: Arc<dyn SummarySource>) -> Self {
        Self {
            config: Arc::new(config),
            source,
        }
    }

    /// State backed by the REST backend named in `config`.
    pub fn from_config(config: Config) -> AppResult<Self> {
        let client = BackendClient::new(&config.backend_url, config.backend_timeout)?;
        Ok(Self::new(config, Arc::new(client)))
    }
}
