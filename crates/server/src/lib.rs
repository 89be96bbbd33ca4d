use std::sync::Arc;

use db::DBService;

use crate::config::ServerConfig;

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod password;
pub mod routes;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_support;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DBService,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: DBService, config: ServerConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}
