//! Payment service - payment details between companies.

use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        pagination::Pagination,
        payment::{
            CreatePaymentRequest, PaymentDetail, PaymentRecord, PaymentResponse,
            agreement_reference,
        },
    },
    services::company_service::find_company_by_vat,
};

const PAYMENT_SELECT: &str = r#"
    SELECT p.*,
           s.vat_number AS sender_company_vat,
           r.vat_number AS receiver_company_vat
    FROM payment_details p
    LEFT JOIN companies s ON s.id = p.sender_company_id
    LEFT JOIN companies r ON r.id = p.receiver_company_id
"#;

/// Record a payment from the caller's company to the receiver.
///
/// The agreement reference needs the creation timestamp, so it is filled in
/// by a second statement in the same transaction.
pub async fn create_payment(
    pool: &DbPool,
    caller_company_id: Option<Uuid>,
    request: CreatePaymentRequest,
) -> Result<PaymentResponse, AppError> {
    request.validate()?;
    let total = request.total()?;
    let sender_id = caller_company_id.ok_or(AppError::CompanyNotAttached)?;

    let receiver_vat = request.receiver_company_vat.trim();
    let receiver = find_company_by_vat(pool, receiver_vat)
        .await?
        .ok_or_else(|| {
            AppError::CompanyNotFound(format!("Company not found by VAT `{receiver_vat}`"))
        })?;

    let mut tx = pool.begin().await?;

    let inserted = sqlx::query_as::<_, PaymentDetail>(
        r#"
        INSERT INTO payment_details (
            payment_type, receiver_company_id, sender_company_id,
            payment_date, quantity, price, vat, total, currency
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(request.payment_type.as_str())
    .bind(receiver.id)
    .bind(sender_id)
    .bind(request.payment_date)
    .bind(request.quantity)
    .bind(request.price)
    .bind(request.vat)
    .bind(total)
    .bind(request.currency.as_str())
    .fetch_one(&mut *tx)
    .await?;

    let agreement = agreement_reference(inserted.payment_date, inserted.date_created);
    let payment = sqlx::query_as::<_, PaymentDetail>(
        "UPDATE payment_details SET agreement = $1 WHERE id = $2 RETURNING *",
    )
    .bind(&agreement)
    .bind(inserted.id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(payment_id = %payment.id, %agreement, "Payment detail created");

    let sender_company_vat: Option<Option<String>> =
        sqlx::query_scalar("SELECT vat_number FROM companies WHERE id = $1")
            .bind(sender_id)
            .fetch_optional(pool)
            .await?;

    Ok(PaymentResponse::from(PaymentRecord {
        payment,
        sender_company_vat: sender_company_vat.flatten(),
        receiver_company_vat: receiver.vat_number,
    }))
}

/// Payments sent or received by the caller's company, newest payment date first.
pub async fn list_payments(
    pool: &DbPool,
    caller_company_id: Option<Uuid>,
    pagination: Pagination,
) -> Result<Vec<PaymentResponse>, AppError> {
    let company_id = caller_company_id.ok_or(AppError::CompanyNotAttached)?;
    let (limit, offset) = pagination.limit_offset();

    let records = sqlx::query_as::<_, PaymentRecord>(&format!(
        r#"{PAYMENT_SELECT}
        WHERE p.sender_company_id = $1 OR p.receiver_company_id = $1
        ORDER BY p.payment_date DESC, p.date_created DESC
        LIMIT $2 OFFSET $3"#
    ))
    .bind(company_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(records.into_iter().map(PaymentResponse::from).collect())
}
