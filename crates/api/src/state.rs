use std::sync::Arc;

use backoffice_core::storage::ObjectStore;
use backoffice_db::PgAdminStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: backoffice_db::DbPool,
    /// Transactional store the workflows run against (shares `pool`).
    pub store: PgAdminStore,
    /// Object store for uploaded assets.
    pub objects: Arc<dyn ObjectStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(
        pool: backoffice_db::DbPool,
        objects: Arc<dyn ObjectStore>,
        config: ServerConfig,
    ) -> Self {
        Self {
            store: PgAdminStore::new(pool.clone()),
            pool,
            objects,
            config: Arc::new(config),
        }
    }
}
