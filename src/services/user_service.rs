//! User service - registration, login and profile lookup.

use uuid::Uuid;

use crate::{
    db::DbPool,
    error::{AppError, is_unique_violation},
    models::user::{
        AttachedCompany, CreateUserRequest, LoginRequest, User, UserResponse,
        UserWithCompanyResponse,
    },
    services::auth_service,
};

const EMAIL_KEY: &str = "users_email_key";
const PHONE_NUMBER_KEY: &str = "users_phone_number_key";

/// Register a user and issue its first token.
///
/// # Errors
///
/// - `InvalidRequest`: field validation failed
/// - `UserAlreadyExists`: email or phone number is taken
pub async fn create_user(
    pool: &DbPool,
    request: CreateUserRequest,
) -> Result<UserResponse, AppError> {
    let request = request.normalized();
    request.validate()?;

    let already_exists = || {
        AppError::UserAlreadyExists(format!(
            "User with `{}` or `{}` already exists!",
            request.email, request.phone_number
        ))
    };

    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM users WHERE email = $1 OR phone_number = $2)",
    )
    .bind(&request.email)
    .bind(&request.phone_number)
    .fetch_one(pool)
    .await?;
    if taken {
        return Err(already_exists());
    }

    let password_hash = auth_service::hash_password(request.password.clone()).await?;

    let mut tx = pool.begin().await?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (first_name, last_name, email, phone_number, password_hash)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(&request.first_name)
    .bind(&request.last_name)
    .bind(&request.email)
    .bind(&request.phone_number)
    .bind(&password_hash)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e, EMAIL_KEY) || is_unique_violation(&e, PHONE_NUMBER_KEY) {
            already_exists()
        } else {
            e.into()
        }
    })?;

    let token = auth_service::issue_token(&mut *tx, user.id).await?;

    tx.commit().await?;

    tracing::info!(user_id = %user.id, "User created");
    Ok(UserResponse::new(user, token))
}

/// Check credentials and issue a new token.
///
/// Unknown emails, inactive users and wrong passwords all fail the same way.
pub async fn login_user(pool: &DbPool, request: LoginRequest) -> Result<UserResponse, AppError> {
    request.validate()?;

    let user = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE email = $1 AND is_active = true",
    )
    .bind(request.email.trim().to_lowercase())
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::InvalidCredentials)?;

    let valid =
        auth_service::verify_password(request.password, user.password_hash.clone()).await?;
    if !valid {
        tracing::debug!(user_id = %user.id, "Rejected login with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let token = auth_service::issue_token(pool, user.id).await?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(UserResponse::new(user, token))
}

/// The calling user with the name of its attached company.
///
/// `token` echoes the token the request was authenticated with.
pub async fn fetch_user_with_company(
    pool: &DbPool,
    user_id: Uuid,
    token: String,
) -> Result<UserWithCompanyResponse, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::InvalidToken)?;

    let company_name: Option<String> = match user.company_id {
        Some(company_id) => {
            sqlx::query_scalar("SELECT name FROM companies WHERE id = $1")
                .bind(company_id)
                .fetch_optional(pool)
                .await?
        }
        None => None,
    };

    Ok(UserWithCompanyResponse {
        user: UserResponse::new(user, token),
        attached_company: company_name.map(|name| AttachedCompany { name }),
    })
}
