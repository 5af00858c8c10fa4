//! Payment detail HTTP handlers.
//!
//! - POST /api/v1/payments - Record a payment from the caller's company
//! - GET /api/v1/payments - Payments sent or received by the caller's company

use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    db::DbPool,
    error::AppError,
    extract::{ValidJson, ValidQuery},
    middleware::auth::AuthContext,
    models::{
        pagination::Pagination,
        payment::{CreatePaymentRequest, PaymentResponse},
    },
    services::payment_service,
};

/// Record a payment.
///
/// # Request Body
///
/// ```json
/// {
///   "payment_type": "INTERNATIONAL_SEA_SHIPPING",
///   "receiver_company_vat": "404889001",
///   "payment_date": "2025-06-30",
///   "quantity": 2,
///   "price": "1450.00",
///   "vat": "522.00",
///   "currency": "USD"
/// }
/// ```
///
/// # Response
///
/// - **201 Created**: the payment with its total and agreement reference
/// - **400**: validation failed or receiver not found
/// - **403**: the caller is not attached to a company
pub async fn create_payment(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    ValidJson(request): ValidJson<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), AppError> {
    let payment = payment_service::create_payment(&pool, auth.company_id, request).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn list_payments(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    ValidQuery(pagination): ValidQuery<Pagination>,
) -> Result<Json<Vec<PaymentResponse>>, AppError> {
    let payments = payment_service::list_payments(&pool, auth.company_id, pagination).await?;
    Ok(Json(payments))
}
