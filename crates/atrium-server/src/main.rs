use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use atrium_core::AppConfig;
use atrium_db::DatabaseConfig;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("atrium=info")),
        )
        .with_target(false)
        .init();

    if let Err(err) = run().await {
        tracing::error!("Startup failed: {err:#}");
        std::process::exit(1);
    }
}

/// Startup is strictly sequential: configuration, then database, then listener.
/// Any failure aborts the process; the listener is never bound after a
/// failed step.
async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;

    let app = atrium_server::init(&config, &db_config)
        .await?
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {addr}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    tracing::info!("Shutdown signal received");
}
