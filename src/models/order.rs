//! Order data models and API request/response types.
//!
//! This module defines:
//! - `Order`, `OrderFile`: database entities
//! - `OrderRecord`: an order joined with its shipper and carrier VAT numbers
//! - `CreateOrderRequest`: the validated text part of the multipart upload
//! - `OrderResponse`: response body returned to clients

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        amount::Amount,
        choices::{
            CargoCategory, CargoType, ContainerType, Currency, LoadingType, TransportationType,
        },
        validation,
    },
};

/// Maximum length of every free-text order field.
pub const TEXT_FIELD_MAX_CHARS: usize = 55;

/// Represents an order record from the database.
///
/// # Database Table
///
/// Maps to the `orders` table. The forwarder owns the order; shipper and
/// carrier references are nulled when those companies are deleted.
/// Weight and price are stored in hundredths.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,
    pub forwarder_id: Uuid,
    pub shipper_id: Option<Uuid>,
    pub carrier_id: Option<Uuid>,
    pub start_location: String,
    pub end_location: String,
    pub transportation_type: String,
    pub container_type: String,
    pub loading_type: Option<String>,
    pub cargo_type: String,
    pub cargo_category: String,
    pub cargo_name: String,
    pub weight: Amount,
    pub price: Amount,
    pub currency: String,
    pub dimension: String,
    pub insurance: bool,
    pub comments: Option<String>,

    /// `IN_PROGRESS` on creation, `FINISHED` afterwards
    pub status: String,

    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

/// A file attached to an order.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderFile {
    pub id: Uuid,
    pub order_id: Uuid,

    /// Path relative to the media root, e.g. `order_files/<uuid>_invoice.pdf`
    pub file_path: String,

    pub original_name: String,

    /// Zero-based upload order within the order
    pub position: i32,

    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

/// An order with the VAT numbers of its shipper and carrier resolved.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRecord {
    #[sqlx(flatten)]
    pub order: Order,
    pub shipper_company_vat: Option<String>,
    pub carrier_company_vat: Option<String>,
}

/// Validated text fields of `POST /api/v1/orders`.
///
/// The endpoint takes `multipart/form-data`; every non-file part arrives as
/// text and is parsed here. Decimal fields accept at most two decimal places.
///
/// # Transport rules
///
/// - `TENT`: `loading_type` required, container `STANDARD`, `MEGA` or `CAR_TRAIN`
/// - `FLAT_BED`: container `DRY_CONTAINER` or one of the reefer containers
/// - `REEFER`: `ISOTHERM` or a temperature from -25 to 25 degrees
/// - `loading_type` is rejected for anything but `TENT`
#[derive(Debug, Clone)]
pub struct CreateOrderRequest {
    pub shipper_company_vat: String,
    pub carrier_company_vat: String,
    pub start_location: String,
    pub end_location: String,
    pub transportation_type: TransportationType,
    pub container_type: ContainerType,
    pub loading_type: Option<LoadingType>,
    pub cargo_type: CargoType,
    pub cargo_category: CargoCategory,
    pub cargo_name: String,
    pub weight: Amount,
    pub price: Amount,
    pub currency: Currency,
    pub dimension: String,
    pub insurance: bool,
    pub comments: Option<String>,
}

fn required<'a>(fields: &'a HashMap<String, String>, name: &str) -> Result<&'a str, AppError> {
    match fields.get(name).map(|v| v.trim()) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(validation::invalid(name, "this field is required")),
    }
}

fn optional<'a>(fields: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    fields
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn text(fields: &HashMap<String, String>, name: &str) -> Result<String, AppError> {
    let value = required(fields, name)?;
    validation::max_length(name, value, TEXT_FIELD_MAX_CHARS)?;
    Ok(value.to_string())
}

fn choice<T>(fields: &HashMap<String, String>, name: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    validation::parse_field(name, required(fields, name)?)
}

fn non_negative_amount(fields: &HashMap<String, String>, name: &str) -> Result<Amount, AppError> {
    let amount: Amount = choice(fields, name)?;
    if amount.is_negative() {
        return Err(validation::invalid(name, "ensure this value is greater than or equal to 0"));
    }
    Ok(amount)
}

impl CreateOrderRequest {
    /// Parse and validate the text parts of the upload.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, AppError> {
        let comments = optional(fields, "comments").map(str::to_string);
        validation::optional_text("comments", comments.as_deref(), TEXT_FIELD_MAX_CHARS)?;

        let request = Self {
            shipper_company_vat: text(fields, "shipper_company_vat")?,
            carrier_company_vat: text(fields, "carrier_company_vat")?,
            start_location: text(fields, "start_location")?,
            end_location: text(fields, "end_location")?,
            transportation_type: choice(fields, "transportation_type")?,
            container_type: choice(fields, "container_type")?,
            loading_type: optional(fields, "loading_type")
                .map(|v| validation::parse_field("loading_type", v))
                .transpose()?,
            cargo_type: choice(fields, "cargo_type")?,
            cargo_category: choice(fields, "cargo_category")?,
            cargo_name: text(fields, "cargo_name")?,
            weight: non_negative_amount(fields, "weight")?,
            price: non_negative_amount(fields, "price")?,
            currency: choice(fields, "currency")?,
            dimension: text(fields, "dimension")?,
            insurance: optional(fields, "insurance")
                .map(|v| validation::parse_bool("insurance", v))
                .transpose()?
                .unwrap_or(false),
            comments,
        };
        request.validate_transport()?;
        Ok(request)
    }

    fn validate_transport(&self) -> Result<(), AppError> {
        let transport = self.transportation_type;

        match (transport, self.loading_type) {
            (TransportationType::Tent, None) => {
                return Err(validation::invalid(
                    "loading_type",
                    "this field is required for TENT transportation",
                ));
            }
            (TransportationType::Tent, Some(_)) | (_, None) => {}
            (_, Some(_)) => {
                return Err(validation::invalid(
                    "loading_type",
                    format!("not applicable to {transport} transportation"),
                ));
            }
        }

        if !self.container_type.fits(transport) {
            return Err(validation::invalid(
                "container_type",
                format!(
                    "`{}` cannot be used with {transport} transportation",
                    self.container_type
                ),
            ));
        }
        Ok(())
    }
}

/// Response body for order endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "order_id": "550e8400-e29b-41d4-a716-446655440000",
///   "shipper_company_vat": "204566123",
///   "carrier_company_vat": "404889001",
///   "start_location": "Poti",
///   "end_location": "Yerevan",
///   "transportation_type": "REEFER",
///   "container_type": "MINUS_EIGHTEEN_DEGREES",
///   "loading_type": null,
///   "cargo_type": "FISH",
///   "cargo_category": "NEEDS_A_REFRIGERATED_CONTAINER",
///   "cargo_name": "Frozen trout",
///   "weight": "18000.00",
///   "price": "2450.00",
///   "currency": "USD",
///   "dimension": "13.6x2.45x2.6",
///   "insurance": true,
///   "comments": null,
///   "status": "IN_PROGRESS",
///   "files": ["http://localhost:3000/media/order_files/5b1c..._cmr.pdf"],
///   "date_created": "2025-06-01T09:30:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order_id: Uuid,
    pub shipper_company_vat: Option<String>,
    pub carrier_company_vat: Option<String>,
    pub start_location: String,
    pub end_location: String,
    pub transportation_type: String,
    pub container_type: String,
    pub loading_type: Option<String>,
    pub cargo_type: String,
    pub cargo_category: String,
    pub cargo_name: String,
    pub weight: Amount,
    pub price: Amount,
    pub currency: String,
    pub dimension: String,
    pub insurance: bool,
    pub comments: Option<String>,
    pub status: String,
    pub files: Vec<String>,
    pub date_created: DateTime<Utc>,
}

impl OrderResponse {
    pub fn new(record: OrderRecord, files: Vec<String>) -> Self {
        let order = record.order;
        Self {
            order_id: order.id,
            shipper_company_vat: record.shipper_company_vat,
            carrier_company_vat: record.carrier_company_vat,
            start_location: order.start_location,
            end_location: order.end_location,
            transportation_type: order.transportation_type,
            container_type: order.container_type,
            loading_type: order.loading_type,
            cargo_type: order.cargo_type,
            cargo_category: order.cargo_category,
            cargo_name: order.cargo_name,
            weight: order.weight,
            price: order.price,
            currency: order.currency,
            dimension: order.dimension,
            insurance: order.insurance,
            comments: order.comments,
            status: order.status,
            files,
            date_created: order.date_created,
        }
    }
}
