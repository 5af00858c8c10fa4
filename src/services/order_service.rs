//! Order service - shipment orders and their attached files.
//!
//! This service handles:
//! - Resolving shipper and carrier companies by VAT number
//! - Storing uploaded files in media storage
//! - Writing an order and its file records in one database transaction
//!
//! Files are written before the transaction starts. If anything fails
//! afterwards they are removed again, so no orphaned uploads stay behind.

use std::collections::HashMap;

use axum::body::Bytes;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        choices::OrderStatus,
        order::{CreateOrderRequest, Order, OrderFile, OrderRecord, OrderResponse},
        pagination::Pagination,
    },
    services::{company_service::find_company_by_vat, media::MediaStore},
};

const ORDER_SELECT: &str = r#"
    SELECT o.*,
           s.vat_number AS shipper_company_vat,
           c.vat_number AS carrier_company_vat
    FROM orders o
    LEFT JOIN companies s ON s.id = o.shipper_id
    LEFT JOIN companies c ON c.id = o.carrier_id
"#;

/// A file part of the order upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub content: Bytes,
}

/// A file already written to media storage.
struct StoredFile {
    relative_path: String,
    original_name: String,
}

/// Create an order for the caller's company.
///
/// # Process
///
/// 1. Parse and validate the text fields
/// 2. Resolve the forwarder (caller's company), shipper and carrier
/// 3. Store the uploaded files
/// 4. Insert the order and its file records in one transaction
///
/// # Errors
///
/// - `InvalidRequest`: field or transport rule validation failed
/// - `CompanyNotAttached`: the caller has no company
/// - `CompanyNotFound`: shipper or carrier VAT number is unknown
pub async fn create_order(
    pool: &DbPool,
    media: &MediaStore,
    caller_company_id: Option<Uuid>,
    fields: &HashMap<String, String>,
    files: Vec<UploadedFile>,
) -> Result<OrderResponse, AppError> {
    let request = CreateOrderRequest::from_fields(fields)?;
    let forwarder_id = caller_company_id.ok_or(AppError::CompanyNotAttached)?;

    let shipper = find_company_by_vat(pool, &request.shipper_company_vat)
        .await?
        .ok_or_else(|| AppError::CompanyNotFound("Shipper company not found.".to_string()))?;
    let carrier = find_company_by_vat(pool, &request.carrier_company_vat)
        .await?
        .ok_or_else(|| AppError::CompanyNotFound("Carrier company not found.".to_string()))?;

    let mut stored = Vec::with_capacity(files.len());
    for file in &files {
        match media.save_order_file(&file.original_name, &file.content).await {
            Ok(relative_path) => stored.push(StoredFile {
                relative_path,
                original_name: file.original_name.clone(),
            }),
            Err(e) => {
                discard_files(media, &stored).await;
                return Err(e.into());
            }
        }
    }

    let result = insert_order(pool, forwarder_id, shipper.id, carrier.id, &request, &stored).await;
    let (order, order_files) = match result {
        Ok(inserted) => inserted,
        Err(e) => {
            discard_files(media, &stored).await;
            return Err(e);
        }
    };

    tracing::info!(
        order_id = %order.id,
        forwarder_id = %forwarder_id,
        files = order_files.len(),
        "Order created"
    );

    let record = OrderRecord {
        order,
        shipper_company_vat: shipper.vat_number,
        carrier_company_vat: carrier.vat_number,
    };
    let urls = order_files
        .iter()
        .map(|f| media.url_for(&f.file_path))
        .collect();
    Ok(OrderResponse::new(record, urls))
}

async fn insert_order(
    pool: &DbPool,
    forwarder_id: Uuid,
    shipper_id: Uuid,
    carrier_id: Uuid,
    request: &CreateOrderRequest,
    stored: &[StoredFile],
) -> Result<(Order, Vec<OrderFile>), AppError> {
    let mut tx = pool.begin().await?;

    let order = sqlx::query_as::<_, Order>(
        r#"
        INSERT INTO orders (
            forwarder_id, shipper_id, carrier_id,
            start_location, end_location,
            transportation_type, container_type, loading_type,
            cargo_type, cargo_category, cargo_name,
            weight, price, currency, dimension,
            insurance, comments, status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
        RETURNING *
        "#,
    )
    .bind(forwarder_id)
    .bind(shipper_id)
    .bind(carrier_id)
    .bind(&request.start_location)
    .bind(&request.end_location)
    .bind(request.transportation_type.as_str())
    .bind(request.container_type.key())
    .bind(request.loading_type.map(|l| l.as_str()))
    .bind(request.cargo_type.as_str())
    .bind(request.cargo_category.as_str())
    .bind(&request.cargo_name)
    .bind(request.weight)
    .bind(request.price)
    .bind(request.currency.as_str())
    .bind(&request.dimension)
    .bind(request.insurance)
    .bind(&request.comments)
    .bind(OrderStatus::InProgress.as_str())
    .fetch_one(&mut *tx)
    .await?;

    let mut files = Vec::with_capacity(stored.len());
    for (position, file) in (0_i32..).zip(stored) {
        let order_file = sqlx::query_as::<_, OrderFile>(
            r#"
            INSERT INTO order_files (order_id, file_path, original_name, position)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(order.id)
        .bind(&file.relative_path)
        .bind(&file.original_name)
        .bind(position)
        .fetch_one(&mut *tx)
        .await?;
        files.push(order_file);
    }

    tx.commit().await?;

    Ok((order, files))
}

async fn discard_files(media: &MediaStore, stored: &[StoredFile]) {
    for file in stored {
        if let Err(e) = media.remove(&file.relative_path).await {
            tracing::warn!(file = %file.relative_path, error = %e, "Failed to discard order file");
        }
    }
}

/// File URLs of the given orders, grouped by order.
async fn file_urls(
    pool: &DbPool,
    media: &MediaStore,
    order_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<String>>, AppError> {
    let files = sqlx::query_as::<_, OrderFile>(
        "SELECT * FROM order_files WHERE order_id = ANY($1) ORDER BY order_id, position",
    )
    .bind(order_ids)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<Uuid, Vec<String>> = HashMap::new();
    for file in files {
        grouped
            .entry(file.order_id)
            .or_default()
            .push(media.url_for(&file.file_path));
    }
    Ok(grouped)
}

/// Orders forwarded by the caller's company, newest first.
pub async fn list_orders(
    pool: &DbPool,
    media: &MediaStore,
    caller_company_id: Option<Uuid>,
    pagination: Pagination,
) -> Result<Vec<OrderResponse>, AppError> {
    let forwarder_id = caller_company_id.ok_or(AppError::CompanyNotAttached)?;
    let (limit, offset) = pagination.limit_offset();

    let records = sqlx::query_as::<_, OrderRecord>(&format!(
        "{ORDER_SELECT} WHERE o.forwarder_id = $1 ORDER BY o.date_created DESC LIMIT $2 OFFSET $3"
    ))
    .bind(forwarder_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let ids: Vec<Uuid> = records.iter().map(|r| r.order.id).collect();
    let mut urls = file_urls(pool, media, &ids).await?;

    Ok(records
        .into_iter()
        .map(|record| {
            let files = urls.remove(&record.order.id).unwrap_or_default();
            OrderResponse::new(record, files)
        })
        .collect())
}

/// A single order, visible only to its forwarder.
pub async fn get_order(
    pool: &DbPool,
    media: &MediaStore,
    caller_company_id: Option<Uuid>,
    order_id: Uuid,
) -> Result<OrderResponse, AppError> {
    let forwarder_id = caller_company_id.ok_or(AppError::OrderNotFound)?;

    let record = sqlx::query_as::<_, OrderRecord>(&format!(
        "{ORDER_SELECT} WHERE o.id = $1 AND o.forwarder_id = $2"
    ))
    .bind(order_id)
    .bind(forwarder_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::OrderNotFound)?;

    let files = file_urls(pool, media, &[order_id])
        .await?
        .remove(&order_id)
        .unwrap_or_default();
    Ok(OrderResponse::new(record, files))
}
