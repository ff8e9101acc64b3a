use crate::config::Config;
use crate::storage::Loader;
use std::sync::Arc;

/// Read-only per-process state. Each request loads its own copy of the
/// documents it needs; nothing is cached or shared between pages.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub loader: Loader,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let loader = Loader::from_config(&config);
        Self {
            config: Arc::new(config),
            loader,
        }
    }
}
