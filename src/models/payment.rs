//! Payment detail models.
//!
//! A payment detail records money owed from a sender company to a receiver
//! company for a number of shipped units. Its agreement reference is derived
//! from the payment date and the moment the record was created.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        amount::Amount,
        choices::{Currency, PaymentType},
        validation,
    },
};

/// Represents a payment detail record from the database.
///
/// Maps to the `payment_details` table. Company references are nulled when
/// either company is deleted.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentDetail {
    pub id: Uuid,
    pub payment_type: Option<String>,
    pub receiver_company_id: Option<Uuid>,
    pub sender_company_id: Option<Uuid>,
    pub payment_date: NaiveDate,
    pub agreement: Option<String>,
    pub quantity: Option<i32>,
    pub price: Option<Amount>,
    pub vat: Option<Amount>,

    /// `price * quantity + vat`
    pub total: Option<Amount>,

    pub currency: Option<String>,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

/// A payment detail with both parties' VAT numbers resolved.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentRecord {
    #[sqlx(flatten)]
    pub payment: PaymentDetail,
    pub sender_company_vat: Option<String>,
    pub receiver_company_vat: Option<String>,
}

/// Request body for `POST /api/v1/payments`.
///
/// # JSON Example
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
/// The sender is always the caller's company.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub payment_type: PaymentType,
    pub receiver_company_vat: String,
    pub payment_date: NaiveDate,
    #[serde(default)]
    pub quantity: i32,
    pub price: Amount,
    #[serde(default)]
    pub vat: Amount,
    pub currency: Currency,
}

impl CreatePaymentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validation::required_text("receiver_company_vat", &self.receiver_company_vat, 15)?;
        if self.quantity < 0 {
            return Err(validation::invalid(
                "quantity",
                "ensure this value is greater than or equal to 0",
            ));
        }
        for (field, amount) in [("price", self.price), ("vat", self.vat)] {
            if amount.is_negative() {
                return Err(validation::invalid(
                    field,
                    "ensure this value is greater than or equal to 0",
                ));
            }
        }
        Ok(())
    }

    /// `price * quantity + vat`, rejecting values that overflow storage.
    pub fn total(&self) -> Result<Amount, AppError> {
        self.price
            .checked_mul(i64::from(self.quantity))
            .and_then(|subtotal| subtotal.checked_add(self.vat))
            .ok_or_else(|| validation::invalid("total", "value is out of range"))
    }
}

/// Agreement reference such as `AGR-20250630-20250601093000`.
pub fn agreement_reference(payment_date: NaiveDate, created_at: DateTime<Utc>) -> String {
    format!(
        "AGR-{}-{}",
        payment_date.format("%Y%m%d"),
        created_at.format("%Y%m%d%H%M%S")
    )
}

/// Response body for payment endpoints.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub payment_type: Option<String>,
    pub agreement: Option<String>,
    pub sender_company_vat: Option<String>,
    pub receiver_company_vat: Option<String>,
    pub payment_date: NaiveDate,
    pub quantity: Option<i32>,
    pub price: Option<Amount>,
    pub vat: Option<Amount>,
    pub total: Option<Amount>,
    pub currency: Option<String>,
    pub date_created: DateTime<Utc>,
}

impl From<PaymentRecord> for PaymentResponse {
    fn from(record: PaymentRecord) -> Self {
        let payment = record.payment;
        Self {
            id: payment.id,
            payment_type: payment.payment_type,
            agreement: payment.agreement,
            sender_company_vat: record.sender_company_vat,
            receiver_company_vat: record.receiver_company_vat,
            payment_date: payment.payment_date,
            quantity: payment.quantity,
            price: payment.price,
            vat: payment.vat,
            total: payment.total,
            currency: payment.currency,
            date_created: payment.date_created,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn request(quantity: i32, price: i64, vat: i64) -> CreatePaymentRequest {
        CreatePaymentRequest {
            payment_type: PaymentType::InternationalSeaShipping,
            receiver_company_vat: "404889001".into(),
            payment_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            quantity,
            price: Amount::from_hundredths(price),
            vat: Amount::from_hundredths(vat),
            currency: Currency::Usd,
        }
    }

    #[test]
    fn total_is_price_times_quantity_plus_vat() {
        let total = request(2, 145000, 52200).total().unwrap();
        assert_eq!(total, Amount::from_hundredths(342200));
        assert_eq!(total.to_string(), "3422.00");
    }

    #[test]
    fn total_overflow_is_a_validation_error() {
        let err = request(3, i64::MAX / 2, 0).total().unwrap_err();
        assert_eq!(err.code(), "invalid_request");
    }

    #[test]
    fn negative_values_are_rejected() {
        assert!(request(-1, 100, 0).validate().is_err());
        assert!(request(1, -100, 0).validate().is_err());
        assert!(request(1, 100, -5).validate().is_err());
        assert!(request(0, 0, 0).validate().is_ok());
    }

    #[test]
    fn agreement_combines_payment_date_and_creation_time() {
        let payment_date = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let created_at = Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 5).unwrap();
        assert_eq!(
            agreement_reference(payment_date, created_at),
            "AGR-20250630-20250601093005"
        );
    }

    #[test]
    fn request_accepts_legacy_payment_type_and_defaults_vat() {
        let req: CreatePaymentRequest = serde_json::from_value(serde_json::json!({
            "payment_type": "INTERNATION_SEA_SHIPPING",
            "receiver_company_vat": "404889001",
            "payment_date": "2025-06-30",
            "quantity": 1,
            "price": "10.50",
            "currency": "EUR"
        }))
        .unwrap();
        assert_eq!(req.vat, Amount::ZERO);
        assert_eq!(req.total().unwrap().to_string(), "10.50");
    }
}
