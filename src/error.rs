//! Error types and HTTP error response handling.
//!
//! Every domain failure is a variant of [`AppError`]. Each variant carries a
//! stable machine-readable code and an HTTP status, and is rendered as a JSON
//! body by the `IntoResponse` implementation below.

use axum::{
    Json,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Infrastructure**: database, file storage and password hashing failures (500)
/// - **Authentication**: missing or unknown tokens, bad credentials
/// - **Lookup**: companies, banks, IBANs and orders that do not exist
/// - **Business rules**: duplicates, missing contact details, company ownership
/// - **Validation**: malformed request data
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Reading or writing an uploaded file failed.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Password hashing failed or the hashing task died.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// Token is missing, malformed or unknown.
    #[error("Invalid authentication token")]
    InvalidToken,

    /// Login attempt with an unknown email or a wrong password.
    #[error("Invalid credentials provided.")]
    InvalidCredentials,

    /// Request body or parameters are invalid.
    ///
    /// The String contains details about what was invalid.
    #[error("{0}")]
    InvalidRequest(String),

    /// Neither a VAT number nor a name was given for a company lookup.
    #[error("Company identifiers not provided.")]
    CompanyIdentifiersNotProvided,

    #[error("{0}")]
    CompanyNotFound(String),

    #[error("{0}")]
    CompanyAlreadyExists(String),

    /// None of contact name, number or email was supplied.
    #[error("At least provide `email`, `phone number` or `contact name`.")]
    CompanyContactNotProvided,

    /// The authenticated user has no company, but the operation needs one.
    #[error("User is not attached to any company.")]
    CompanyNotAttached,

    /// The company exists but belongs to somebody else.
    #[error("User have not access to requested data.")]
    AccessNotPermitted,

    #[error("Bank not found.")]
    BankNotFound,

    #[error("{0}")]
    IbanNotFound(String),

    #[error("{0}")]
    IbanAlreadyExists(String),

    /// Account number fails the IBAN checksum or does not belong to the bank.
    #[error("{0}")]
    InvalidIban(String),

    #[error("{0}")]
    UserAlreadyExists(String),

    #[error("Order not found.")]
    OrderNotFound,

    /// Upload body exceeded the configured size limit.
    #[error("{0}")]
    PayloadTooLarge(String),
}

impl AppError {
    /// Stable error code returned to clients.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) | AppError::Storage(_) | AppError::PasswordHash(_) => {
                "internal_error"
            }
            AppError::InvalidToken => "invalid_token",
            AppError::InvalidCredentials => "user_doesnt_exist",
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::CompanyIdentifiersNotProvided => "company_identifiers_not_provided",
            AppError::CompanyNotFound(_) => "company_not_found",
            AppError::CompanyAlreadyExists(_) => "company_already_exists",
            AppError::CompanyContactNotProvided => "company_contact_not_provided",
            AppError::CompanyNotAttached => "company_not_attached",
            AppError::AccessNotPermitted => "access_not_permitted",
            AppError::BankNotFound => "bank_not_found",
            AppError::IbanNotFound(_) => "iban_not_found",
            AppError::IbanAlreadyExists(_) => "iban_already_exists",
            AppError::InvalidIban(_) => "invalid_iban",
            AppError::UserAlreadyExists(_) => "user_creation_failed",
            AppError::OrderNotFound => "order_not_found",
            AppError::PayloadTooLarge(_) => "payload_too_large",
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Storage(_) | AppError::PasswordHash(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::InvalidRequest(_)
            | AppError::CompanyIdentifiersNotProvided
            | AppError::CompanyNotFound(_)
            | AppError::BankNotFound
            | AppError::IbanNotFound(_)
            | AppError::InvalidIban(_) => StatusCode::BAD_REQUEST,
            AppError::CompanyAlreadyExists(_)
            | AppError::CompanyContactNotProvided
            | AppError::CompanyNotAttached
            | AppError::IbanAlreadyExists(_) => StatusCode::FORBIDDEN,
            AppError::AccessNotPermitted
            | AppError::InvalidCredentials
            | AppError::OrderNotFound => StatusCode::NOT_FOUND,
            AppError::UserAlreadyExists(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Keeps the 413 axum reports when the body limit is hit mid-stream.
impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        payload_error(err.status(), err.body_text())
    }
}

fn payload_error(status: StatusCode, message: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(message)
    } else {
        AppError::InvalidRequest(message)
    }
}

/// Returns true when `err` is a unique-constraint violation on `constraint`.
///
/// Used to turn races that slip past the existence pre-checks into the
/// matching "already exists" error instead of a 500.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation() && db_err.constraint() == Some(constraint))
        .unwrap_or(false)
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "company_not_found",
///     "message": "Company not found by VAT `123456789`"
///   }
/// }
/// ```
///
/// Internal failures are logged and reported with a generic message so no
/// database or filesystem detail reaches the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Request failed with internal error");
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn lookup_failures_keep_their_historic_statuses() {
        assert_eq!(
            AppError::CompanyNotFound("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::BankNotFound.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::OrderNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::AccessNotPermitted.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn duplicates_map_to_forbidden_or_conflict() {
        assert_eq!(
            AppError::CompanyAlreadyExists("x".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::IbanAlreadyExists("x".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::UserAlreadyExists("x".into()).status(),
            StatusCode::CONFLICT
        );
    }

    #[tokio::test]
    async fn domain_error_body_carries_code_and_message() {
        let response =
            AppError::CompanyNotFound("Company not found by VAT `42`".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "company_not_found");
        assert_eq!(body["error"]["message"], "Company not found by VAT `42`");
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let err = AppError::Storage(std::io::Error::other("disk on fire"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "internal_error");
        assert_eq!(body["error"]["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn contact_error_uses_default_message() {
        let body = body_json(AppError::CompanyContactNotProvided.into_response()).await;
        assert_eq!(
            body["error"]["message"],
            "At least provide `email`, `phone number` or `contact name`."
        );
    }

    #[test]
    fn oversized_uploads_keep_their_status() {
        let err = payload_error(StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded".into());
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.code(), "payload_too_large");

        let err = payload_error(StatusCode::BAD_REQUEST, "malformed part".into());
        assert_eq!(err.code(), "invalid_request");
    }

    #[test]
    fn non_database_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound, "companies_name_key"));
    }
}
