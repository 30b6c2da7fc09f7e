use std::sync::Arc;

use enki_core::uploads::UploadStore;
use enki_events::ContactNotifier;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: enki_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Public upload area for project thumbnails.
    pub uploads: Arc<UploadStore>,
    /// Best-effort admin notifications for new contact messages.
    pub notifier: ContactNotifier,
}

impl AppState {
    pub fn new(pool: enki_db::DbPool, config: ServerConfig, notifier: ContactNotifier) -> Self {
        let uploads = UploadStore::new(&config.upload_dir, &config.public_storage_path);
        Self {
            pool,
            config: Arc::new(config),
            uploads: Arc::new(uploads),
            notifier,
        }
    }
}
