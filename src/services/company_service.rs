//! Company service - companies, their IBANs and the bank registry.
//!
//! This service handles:
//! - Company creation, lookup, search, update and deletion
//! - IBAN validation against the bank registry
//! - Ownership checks (a user may only touch the company it is attached to)
//!
//! Multi-step writes (company + IBANs + user attachment, IBAN set
//! replacement) run in a single database transaction.

use std::collections::HashMap;

use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::{AppError, is_unique_violation},
    models::{
        company::{
            Bank, BankResponse, CompaniesResponse, Company, CompanyFilterQuery,
            CompanyLookupQuery, CompanyRequest, CompanyResponse, Iban, IbanLookupQuery,
            IbanRequest, IbanResponse,
        },
        pagination::Pagination,
        validation,
    },
    services::{iban, media::MediaStore},
};

const COMPANY_NAME_KEY: &str = "companies_name_key";
const COMPANY_VAT_KEY: &str = "companies_vat_number_key";
const IBAN_ACCOUNT_KEY: &str = "ibans_company_account_number_key";

const IBAN_COLUMNS: &str = r#"
    SELECT i.company_id, b.bank_name, c.name AS company_name,
           i.currency, i.account_number,
           COALESCE(i.recipient, c.name) AS recipient
    FROM ibans i
    JOIN banks b ON b.id = i.bank_id
    JOIN companies c ON c.id = i.company_id
"#;

fn company_exists(request: &CompanyRequest) -> AppError {
    AppError::CompanyAlreadyExists(format!(
        "Company already exists by provided VAT `{}` or NAME `{}`",
        request.vat_number, request.name
    ))
}

/// Name or VAT taken by a concurrent write that passed the pre-check.
fn company_write_error(err: sqlx::Error, request: &CompanyRequest) -> AppError {
    if is_unique_violation(&err, COMPANY_NAME_KEY) || is_unique_violation(&err, COMPANY_VAT_KEY) {
        company_exists(request)
    } else {
        err.into()
    }
}

fn not_found_by_vat(vat: &str) -> AppError {
    AppError::CompanyNotFound(format!("Company not found by VAT `{vat}`"))
}

/// The caller must be attached to `company`.
fn ensure_attached(company: &Company, caller_company_id: Option<Uuid>) -> Result<(), AppError> {
    if caller_company_id == Some(company.id) {
        Ok(())
    } else {
        Err(AppError::AccessNotPermitted)
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub async fn find_company_by_vat<'e>(
    executor: impl PgExecutor<'e>,
    vat_number: &str,
) -> Result<Option<Company>, AppError> {
    let company = sqlx::query_as::<_, Company>(
        "SELECT * FROM companies WHERE vat_number = $1 ORDER BY date_created LIMIT 1",
    )
    .bind(vat_number)
    .fetch_optional(executor)
    .await?;

    Ok(company)
}

pub async fn find_company_by_name<'e>(
    executor: impl PgExecutor<'e>,
    name: &str,
) -> Result<Option<Company>, AppError> {
    let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE name = $1")
        .bind(name)
        .fetch_optional(executor)
        .await?;

    Ok(company)
}

/// Any company other than `exclude` that uses `name` or `vat_number`.
pub async fn find_company_by_name_or_vat<'e>(
    executor: impl PgExecutor<'e>,
    name: &str,
    vat_number: &str,
    exclude: Option<Uuid>,
) -> Result<Option<Company>, AppError> {
    let company = sqlx::query_as::<_, Company>(
        r#"
        SELECT * FROM companies
        WHERE (name = $1 OR vat_number = $2)
          AND ($3::uuid IS NULL OR id <> $3)
        LIMIT 1
        "#,
    )
    .bind(name)
    .bind(vat_number)
    .bind(exclude)
    .fetch_optional(executor)
    .await?;

    Ok(company)
}

/// IBANs of the given companies, grouped by company.
async fn ibans_for_companies<'e>(
    executor: impl PgExecutor<'e>,
    company_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<IbanResponse>>, AppError> {
    let rows = sqlx::query_as::<_, IbanResponse>(&format!(
        "{IBAN_COLUMNS} WHERE i.company_id = ANY($1) ORDER BY i.date_created"
    ))
    .bind(company_ids)
    .fetch_all(executor)
    .await?;

    let mut grouped: HashMap<Uuid, Vec<IbanResponse>> = HashMap::new();
    for row in rows {
        grouped.entry(row.company_id).or_default().push(row);
    }
    Ok(grouped)
}

async fn company_response(pool: &DbPool, company: Company) -> Result<CompanyResponse, AppError> {
    let ibans = ibans_for_companies(pool, &[company.id])
        .await?
        .remove(&company.id)
        .unwrap_or_default();
    Ok(CompanyResponse::new(company, ibans))
}

/// Validate an IBAN against the bank registry and store it for `company`.
async fn insert_iban(
    conn: &mut PgConnection,
    company: &Company,
    request: &IbanRequest,
) -> Result<IbanResponse, AppError> {
    let bank = sqlx::query_as::<_, Bank>("SELECT * FROM banks WHERE bank_name = $1")
        .bind(request.bank_name.trim())
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(AppError::BankNotFound)?;

    let parsed = iban::Iban::parse(&request.account_number)
        .map_err(|e| AppError::InvalidIban(format!("Invalid IBAN requested: {e}")))?;
    parsed.ensure_bank_code(&bank.bank_code).map_err(|_| {
        AppError::InvalidIban(format!(
            "Requested account number `{}` is not valid for bank `{}`.",
            parsed.as_str(),
            bank.bank_name
        ))
    })?;
    let account_number = parsed.as_str();

    // NULL reads back as the company's current name
    let recipient = validation::non_blank(request.recipient.clone());
    validation::optional_text("recipient", recipient.as_deref(), 50)?;

    let already_exists = || {
        AppError::IbanAlreadyExists(format!(
            "IBAN `{account_number}` already exists for company `{}`",
            company.name
        ))
    };

    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM ibans WHERE company_id = $1 AND account_number = $2)",
    )
    .bind(company.id)
    .bind(account_number)
    .fetch_one(&mut *conn)
    .await?;
    if exists {
        return Err(already_exists());
    }

    let stored = sqlx::query_as::<_, Iban>(
        r#"
        INSERT INTO ibans (bank_id, company_id, currency, account_number, recipient)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(bank.id)
    .bind(company.id)
    .bind(request.currency.as_str())
    .bind(account_number)
    .bind(&recipient)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e, IBAN_ACCOUNT_KEY) {
            already_exists()
        } else {
            e.into()
        }
    })?;

    Ok(IbanResponse {
        company_id: stored.company_id,
        bank_name: bank.bank_name,
        company_name: company.name.clone(),
        currency: stored.currency,
        account_number: stored.account_number,
        recipient: stored.recipient.or_else(|| Some(company.name.clone())),
    })
}

/// Create a company with its IBANs and attach it to the requesting user.
///
/// # Errors
///
/// - `InvalidRequest`: field validation failed, or a forwarder/carrier has no IBAN
/// - `CompanyAlreadyExists`: name or VAT number already taken
/// - `CompanyContactNotProvided`: no contact name, number or email
/// - `BankNotFound`, `InvalidIban`, `IbanAlreadyExists`: an IBAN was rejected
pub async fn create_company(
    pool: &DbPool,
    user_id: Uuid,
    request: CompanyRequest,
) -> Result<CompanyResponse, AppError> {
    let request = request.normalized();
    request.validate()?;

    if find_company_by_name_or_vat(pool, &request.name, &request.vat_number, None)
        .await?
        .is_some()
    {
        return Err(company_exists(&request));
    }
    if !request.has_contact() {
        return Err(AppError::CompanyContactNotProvided);
    }

    let mut tx = pool.begin().await?;

    let company = sqlx::query_as::<_, Company>(
        r#"
        INSERT INTO companies (
            name, party_type, address, vat_number,
            contact_name, contact_number, contact_email
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(&request.name)
    .bind(request.party_type.as_str())
    .bind(&request.address)
    .bind(&request.vat_number)
    .bind(&request.contact_name)
    .bind(&request.contact_number)
    .bind(&request.contact_email)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| company_write_error(e, &request))?;

    let mut ibans = Vec::new();
    for iban_request in request.ibans.iter().flatten() {
        ibans.push(insert_iban(&mut tx, &company, iban_request).await?);
    }

    sqlx::query("UPDATE users SET company_id = $1, date_updated = NOW() WHERE id = $2")
        .bind(company.id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(company_id = %company.id, %user_id, "Company created");
    Ok(CompanyResponse::new(company, ibans))
}

/// Look a company up by VAT number (preferred) or name.
pub async fn fetch_company(
    pool: &DbPool,
    caller_company_id: Option<Uuid>,
    query: CompanyLookupQuery,
) -> Result<CompanyResponse, AppError> {
    let vat_number = validation::non_blank(query.vat_number);
    let name = validation::non_blank(query.name);

    let company = match (vat_number, name) {
        (Some(vat), _) => find_company_by_vat(pool, &vat)
            .await?
            .ok_or_else(|| not_found_by_vat(&vat))?,
        (None, Some(name)) => find_company_by_name(pool, &name)
            .await?
            .ok_or_else(|| AppError::CompanyNotFound(format!("Company not found by name `{name}`")))?,
        (None, None) => return Err(AppError::CompanyIdentifiersNotProvided),
    };

    ensure_attached(&company, caller_company_id)?;
    company_response(pool, company).await
}

/// The company the caller is attached to.
pub async fn fetch_user_company(
    pool: &DbPool,
    caller_company_id: Option<Uuid>,
) -> Result<CompanyResponse, AppError> {
    let not_found = || AppError::CompanyNotFound("Company not found for user.".to_string());

    let company_id = caller_company_id.ok_or_else(not_found)?;
    let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
        .bind(company_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(not_found)?;

    company_response(pool, company).await
}

/// Case-insensitive search over carriers or shippers by name or VAT number.
pub async fn filter_companies(
    pool: &DbPool,
    query: CompanyFilterQuery,
    pagination: Pagination,
) -> Result<CompaniesResponse, AppError> {
    query.validate()?;
    let (limit, offset) = pagination.limit_offset();
    let pattern = format!("%{}%", escape_like(query.search_keyword.trim()));

    let companies = sqlx::query_as::<_, Company>(
        r#"
        SELECT * FROM companies
        WHERE party_type = $1
          AND (name ILIKE $2 OR vat_number ILIKE $2)
        ORDER BY name
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(query.company_type.as_str())
    .bind(&pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let ids: Vec<Uuid> = companies.iter().map(|c| c.id).collect();
    let mut ibans = ibans_for_companies(pool, &ids).await?;

    let companies = companies
        .into_iter()
        .map(|company| {
            let company_ibans = ibans.remove(&company.id).unwrap_or_default();
            CompanyResponse::new(company, company_ibans)
        })
        .collect();

    Ok(CompaniesResponse { companies })
}

/// Update the caller's company. When `ibans` is present it replaces the
/// company's IBAN set.
pub async fn update_company(
    pool: &DbPool,
    caller_company_id: Option<Uuid>,
    vat_number: &str,
    request: CompanyRequest,
) -> Result<CompanyResponse, AppError> {
    let request = request.normalized();
    request.validate()?;

    let company = find_company_by_vat(pool, vat_number)
        .await?
        .ok_or_else(|| not_found_by_vat(vat_number))?;
    ensure_attached(&company, caller_company_id)?;

    if find_company_by_name_or_vat(pool, &request.name, &request.vat_number, Some(company.id))
        .await?
        .is_some()
    {
        return Err(company_exists(&request));
    }
    if !request.has_contact() {
        return Err(AppError::CompanyContactNotProvided);
    }

    let mut tx = pool.begin().await?;

    let updated = sqlx::query_as::<_, Company>(
        r#"
        UPDATE companies
        SET name = $1,
            party_type = $2,
            address = $3,
            vat_number = $4,
            contact_name = $5,
            contact_number = $6,
            contact_email = $7,
            date_updated = NOW()
        WHERE id = $8
        RETURNING *
        "#,
    )
    .bind(&request.name)
    .bind(request.party_type.as_str())
    .bind(&request.address)
    .bind(&request.vat_number)
    .bind(&request.contact_name)
    .bind(&request.contact_number)
    .bind(&request.contact_email)
    .bind(company.id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| company_write_error(e, &request))?;

    if let Some(iban_requests) = &request.ibans {
        sqlx::query("DELETE FROM ibans WHERE company_id = $1")
            .bind(updated.id)
            .execute(&mut *tx)
            .await?;
        for iban_request in iban_requests {
            insert_iban(&mut tx, &updated, iban_request).await?;
        }
    }

    tx.commit().await?;

    tracing::info!(company_id = %updated.id, "Company updated");
    company_response(pool, updated).await
}

/// Delete the caller's company.
///
/// IBANs and the company's forwarder orders go with it; shipper/carrier
/// references, payment parties and user attachments are nulled. Files of
/// the deleted orders are removed from media storage afterwards.
pub async fn delete_company(
    pool: &DbPool,
    media: &MediaStore,
    caller_company_id: Option<Uuid>,
    vat_number: &str,
) -> Result<(), AppError> {
    let company = find_company_by_vat(pool, vat_number)
        .await?
        .ok_or_else(|| not_found_by_vat(vat_number))?;
    ensure_attached(&company, caller_company_id)?;

    let mut tx = pool.begin().await?;

    let file_paths: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT f.file_path
        FROM order_files f
        JOIN orders o ON o.id = f.order_id
        WHERE o.forwarder_id = $1
        "#,
    )
    .bind(company.id)
    .fetch_all(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM companies WHERE id = $1")
        .bind(company.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    for path in &file_paths {
        if let Err(e) = media.remove(path).await {
            tracing::warn!(file = %path, error = %e, "Failed to remove order file");
        }
    }

    tracing::info!(company_id = %company.id, files = file_paths.len(), "Company deleted");
    Ok(())
}

/// Add an IBAN to the caller's company.
pub async fn create_iban(
    pool: &DbPool,
    caller_company_id: Option<Uuid>,
    vat_number: &str,
    request: IbanRequest,
) -> Result<IbanResponse, AppError> {
    request.validate()?;

    let company = find_company_by_vat(pool, vat_number)
        .await?
        .ok_or_else(|| {
            AppError::CompanyNotFound(format!(
                "Company `{vat_number}` not exists for requested Iban"
            ))
        })?;
    ensure_attached(&company, caller_company_id)?;

    let mut conn = pool.acquire().await?;
    let created = insert_iban(&mut conn, &company, &request).await?;

    tracing::info!(company_id = %company.id, bank = %created.bank_name, "IBAN created");
    Ok(created)
}

/// Look an IBAN up by bank name and account number.
pub async fn fetch_iban(pool: &DbPool, query: IbanLookupQuery) -> Result<IbanResponse, AppError> {
    let account_number = iban::normalize(&query.account_number);

    sqlx::query_as::<_, IbanResponse>(&format!(
        "{IBAN_COLUMNS} WHERE b.bank_name = $1 AND i.account_number = $2 \
         ORDER BY i.date_created LIMIT 1"
    ))
    .bind(query.bank_name.trim())
    .bind(&account_number)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| {
        AppError::IbanNotFound(format!(
            "IBAN not found by account number `{account_number}`"
        ))
    })
}

/// The bank registry, alphabetically.
pub async fn list_banks(pool: &DbPool) -> Result<Vec<BankResponse>, AppError> {
    let banks = sqlx::query_as::<_, Bank>("SELECT * FROM banks ORDER BY bank_name")
        .fetch_all(pool)
        .await?;

    Ok(banks.into_iter().map(BankResponse::from).collect())
}
