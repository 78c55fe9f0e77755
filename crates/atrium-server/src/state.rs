use atrium_core::AppConfig;
use atrium_db::Database;

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    pub db: Database,
    pub config: AppConfig,
}
