//! Freight back office server.
//!
//! Serves the company, user, order and payment API over HTTP. Order
//! attachments are written under `MEDIA_ROOT` and served back from `/media`.
//!
//! On startup the server loads its settings, connects to PostgreSQL, applies
//! pending migrations (the bank registry seed is one of them), makes sure the
//! media directory exists and then binds the listener.

use freight_back_office::{app, config, db, services::media::MediaStore, state::AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let media = MediaStore::new(&config.media_root, &config.media_base_url)?;
    tokio::fs::create_dir_all(media.root()).await?;
    tracing::info!(root = %config.media_root, "Media storage ready");

    let app = app::build_router(AppState::new(pool, media), config.max_upload_bytes);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
