use crate::{config::Config, db::DbPool, uploads::UploadStore};

/// Shared application context, constructed once in `main` and cloned into
/// every handler. Replaces process-wide singletons so tests can run against
/// scoped pools and upload directories.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Config,
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config, uploads: UploadStore) -> Self {
        Self {
            pool,
            config,
            uploads,
        }
    }
}
