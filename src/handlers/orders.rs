//! Order HTTP handlers.
//!
//! - POST /api/v1/orders - Create an order (multipart form with files)
//! - GET /api/v1/orders - List the caller's orders
//! - GET /api/v1/orders/{id} - Get one of the caller's orders

use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension, Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    extract::{ValidPath, ValidQuery},
    middleware::auth::AuthContext,
    models::{order::OrderResponse, pagination::Pagination},
    services::{
        media::MediaStore,
        order_service::{self, UploadedFile},
    },
};

/// Name of the multipart field carrying attachments.
const FILES_FIELD: &str = "files";

/// Create an order.
///
/// # Endpoint
///
/// `POST /api/v1/orders` with `multipart/form-data`.
///
/// Every part except `files` is a text field (`shipper_company_vat`,
/// `transportation_type`, `weight`, ...). `files` may repeat, one part per
/// attachment.
///
/// # Response
///
/// - **201 Created**: the order with file URLs
/// - **400**: validation failed, or shipper/carrier not found
/// - **403**: the caller is not attached to a company
pub async fn create_order(
    State(pool): State<DbPool>,
    State(media): State<Arc<MediaStore>>,
    Extension(auth): Extension<AuthContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    let mut multipart = multipart?;
    let mut fields = HashMap::new();
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == FILES_FIELD {
            let original_name = field.file_name().unwrap_or("file").to_string();
            let content = field.bytes().await?;
            if !content.is_empty() {
                files.push(UploadedFile {
                    original_name,
                    content,
                });
            }
        } else {
            fields.insert(name, field.text().await?);
        }
    }

    let order =
        order_service::create_order(&pool, &media, auth.company_id, &fields, files).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// List orders forwarded by the caller's company, newest first.
///
/// `GET /api/v1/orders?page=1&per_page=20`
pub async fn list_orders(
    State(pool): State<DbPool>,
    State(media): State<Arc<MediaStore>>,
    Extension(auth): Extension<AuthContext>,
    ValidQuery(pagination): ValidQuery<Pagination>,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let orders = order_service::list_orders(&pool, &media, auth.company_id, pagination).await?;
    Ok(Json(orders))
}

/// Get one order. Orders of other companies are reported as not found.
pub async fn get_order(
    State(pool): State<DbPool>,
    State(media): State<Arc<MediaStore>>,
    Extension(auth): Extension<AuthContext>,
    ValidPath(order_id): ValidPath<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = order_service::get_order(&pool, &media, auth.company_id, order_id).await?;
    Ok(Json(order))
}
