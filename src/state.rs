use std::sync::Arc;

use crate::config::Config;
use crate::session::SessionRegistry;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub max_relay_body_bytes: usize,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            registry: Arc::new(SessionRegistry::from_config(config)),
            max_relay_body_bytes: config.max_relay_body_bytes,
        }
    }
}
