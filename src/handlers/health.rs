//! Health check endpoint for service monitoring.

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{db::DbPool, error::AppError, services::media::MediaStore};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Database connection status
    pub database: String,

    /// Whether the media root exists yet (it is created on first upload)
    pub media_root: bool,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "database": "connected",
///   "media_root": true,
///   "timestamp": "2025-06-01T09:30:00Z"
/// }
/// ```
///
/// If the database is unreachable the standard 500 error body is returned.
pub async fn health_check(
    State(pool): State<DbPool>,
    State(media): State<Arc<MediaStore>>,
) -> Result<Json<HealthResponse>, AppError> {
    sqlx::query("SELECT 1").execute(&pool).await?;
    let media_root = tokio::fs::try_exists(media.root()).await.unwrap_or(false);

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        database: "connected".to_string(),
        media_root,
        timestamp: Utc::now(),
    }))
}
