//! Shared application state handed to every handler.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{db::DbPool, services::media::MediaStore};

/// State shared by all routes.
///
/// `FromRef` lets handlers and middleware extract just the part they need,
/// e.g. `State<DbPool>`.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: DbPool,
    pub media: Arc<MediaStore>,
}

impl AppState {
    pub fn new(pool: DbPool, media: MediaStore) -> Self {
        Self {
            pool,
            media: Arc::new(media),
        }
    }
}
