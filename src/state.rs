//! Shared application state for request handlers.

use std::sync::Arc;
use tera::Tera;

use crate::config::{AppConfig, Deployment};
use crate::db::DatabaseProbe;
use crate::host::HostInfo;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Built once in `main` and handed to the router; nothing in it changes after
/// startup except the database connection, which is closed on shutdown.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tera: Arc<Tera>,
    pub host: Arc<HostInfo>,
    pub db: Arc<dyn DatabaseProbe>,
}

impl AppState {
    pub fn new(config: AppConfig, tera: Tera, host: HostInfo, db: Arc<dyn DatabaseProbe>) -> Self {
        Self {
            config: Arc::new(config),
            tera: Arc::new(tera),
            host: Arc::new(host),
            db,
        }
    }

    pub fn deployment(&self) -> &Deployment {
        &self.config.deployment
    }
}
