//! REST API server — bootstrap, routing, authorization, and OpenAPI documentation.

use std::sync::Arc;

use atrium_core::AppConfig;
use atrium_db::{Database, DatabaseConfig};
use axum::Router;

pub mod auth;
pub mod controllers;
pub mod dto;
pub mod error;
pub mod extract;
pub mod openapi;
pub mod routes;
pub mod state;

use state::AppState;

/// Load the database and assemble the application router.
///
/// This is the second and third step of startup (after configuration):
/// connect to the database, run migrations, then build the route table.
/// If the database is unreachable this fails before any listener exists.
pub async fn init(config: &AppConfig, db_config: &DatabaseConfig) -> anyhow::Result<Router> {
    let db = Database::connect(db_config).await?;
    db.migrate().await?;

    let state = Arc::new(AppState {
        db,
        config: config.clone(),
    });

    Ok(routes::router(state))
}
