//! Company, IBAN and bank HTTP handlers.
//!
//! This module implements:
//! - POST /api/v1/companies - Create a company and attach it to the caller
//! - GET /api/v1/companies - Search carriers or shippers
//! - GET /api/v1/companies/lookup - Fetch a company by VAT number or name
//! - GET /api/v1/companies/mine - Fetch the caller's company
//! - PUT /api/v1/companies/{vat_number} - Update the caller's company
//! - DELETE /api/v1/companies/{vat_number} - Delete the caller's company
//! - POST /api/v1/companies/{vat_number}/ibans - Add an IBAN
//! - GET /api/v1/ibans - Fetch an IBAN by bank and account number
//! - GET /api/v1/banks - List the bank registry
//!
//! All routes require a valid token.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};

use crate::{
    db::DbPool,
    error::AppError,
    extract::{ValidJson, ValidPath, ValidQuery},
    middleware::auth::AuthContext,
    models::{
        company::{
            BankResponse, CompaniesResponse, CompanyFilterQuery, CompanyLookupQuery,
            CompanyRequest, CompanyResponse, IbanLookupQuery, IbanRequest, IbanResponse,
        },
        pagination::Pagination,
    },
    services::{company_service, media::MediaStore},
};

/// Create a new company.
///
/// # Endpoint
///
/// `POST /api/v1/companies`
///
/// # Response
///
/// - **201 Created**: the company with its IBANs
/// - **400**: validation failed, or a forwarder/carrier without IBANs
/// - **403**: company already exists, or no contact details given
///
/// The caller becomes attached to the new company.
pub async fn create_company(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    ValidJson(request): ValidJson<CompanyRequest>,
) -> Result<(StatusCode, Json<CompanyResponse>), AppError> {
    let company = company_service::create_company(&pool, auth.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

/// Fetch a company by `?vat_number=` or `?name=`.
///
/// # Response
///
/// - **200 OK**: the company
/// - **400**: no identifiers given, or no such company
/// - **404**: the caller is not attached to the company
pub async fn fetch_company(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    ValidQuery(query): ValidQuery<CompanyLookupQuery>,
) -> Result<Json<CompanyResponse>, AppError> {
    let company = company_service::fetch_company(&pool, auth.company_id, query).await?;
    Ok(Json(company))
}

/// Fetch the company the caller is attached to.
pub async fn fetch_user_company(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<CompanyResponse>, AppError> {
    let company = company_service::fetch_user_company(&pool, auth.company_id).await?;
    Ok(Json(company))
}

/// Search companies.
///
/// # Endpoint
///
/// `GET /api/v1/companies?search_keyword=trans&company_type=CARRIER&page=1&per_page=20`
///
/// Matches name or VAT number, case-insensitively. Only `CARRIER` and
/// `SHIPPER` can be searched.
pub async fn filter_companies(
    State(pool): State<DbPool>,
    ValidQuery(query): ValidQuery<CompanyFilterQuery>,
    ValidQuery(pagination): ValidQuery<Pagination>,
) -> Result<Json<CompaniesResponse>, AppError> {
    let companies = company_service::filter_companies(&pool, query, pagination).await?;
    Ok(Json(companies))
}

/// Update the caller's company. A present `ibans` list replaces the
/// existing IBANs.
pub async fn update_company(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    ValidPath(vat_number): ValidPath<String>,
    ValidJson(request): ValidJson<CompanyRequest>,
) -> Result<Json<CompanyResponse>, AppError> {
    let company =
        company_service::update_company(&pool, auth.company_id, &vat_number, request).await?;
    Ok(Json(company))
}

/// Delete the caller's company.
///
/// # Response
///
/// - **204 No Content**: deleted
/// - **400**: no such company
/// - **404**: the caller is not attached to the company
pub async fn delete_company(
    State(pool): State<DbPool>,
    State(media): State<Arc<MediaStore>>,
    Extension(auth): Extension<AuthContext>,
    ValidPath(vat_number): ValidPath<String>,
) -> Result<StatusCode, AppError> {
    company_service::delete_company(&pool, &media, auth.company_id, &vat_number).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add an IBAN to the caller's company.
///
/// # Response
///
/// - **201 Created**: the stored IBAN
/// - **400**: unknown company or bank, or the account number is not a valid
///   IBAN of that bank
/// - **403**: the company already has this account number
pub async fn create_iban(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    ValidPath(vat_number): ValidPath<String>,
    ValidJson(request): ValidJson<IbanRequest>,
) -> Result<(StatusCode, Json<IbanResponse>), AppError> {
    let iban = company_service::create_iban(&pool, auth.company_id, &vat_number, request).await?;
    Ok((StatusCode::CREATED, Json(iban)))
}

/// Fetch an IBAN by `?bank_name=&account_number=`.
pub async fn fetch_iban(
    State(pool): State<DbPool>,
    ValidQuery(query): ValidQuery<IbanLookupQuery>,
) -> Result<Json<IbanResponse>, AppError> {
    let iban = company_service::fetch_iban(&pool, query).await?;
    Ok(Json(iban))
}

pub async fn list_banks(State(pool): State<DbPool>) -> Result<Json<Vec<BankResponse>>, AppError> {
    Ok(Json(company_service::list_banks(&pool).await?))
}
