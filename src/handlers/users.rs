//! User HTTP handlers.
//!
//! - POST /api/v1/users - Register (public)
//! - POST /api/v1/users/login - Log in (public)
//! - GET /api/v1/users/me - Current user with attached company

use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    db::DbPool,
    error::AppError,
    extract::ValidJson,
    middleware::auth::AuthContext,
    models::user::{CreateUserRequest, LoginRequest, UserResponse, UserWithCompanyResponse},
    services::user_service,
};

/// Register a user.
///
/// # Request Body
///
/// ```json
/// {
///   "first_name": "Nino",
///   "last_name": "Beridze",
///   "email": "nino@caucasus-freight.ge",
///   "phone_number": "+995555123456",
///   "password": "correct horse battery staple"
/// }
/// ```
///
/// # Response
///
/// - **201 Created**: the user with a fresh token
/// - **400**: validation failed
/// - **409**: email or phone number already registered
pub async fn create_user(
    State(pool): State<DbPool>,
    ValidJson(request): ValidJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = user_service::create_user(&pool, request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in with email and password.
///
/// # Response
///
/// - **200 OK**: the user with a fresh token
/// - **404**: `user_doesnt_exist` for unknown email or wrong password
pub async fn login_user(
    State(pool): State<DbPool>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(user_service::login_user(&pool, request).await?))
}

pub async fn fetch_user_with_company(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<UserWithCompanyResponse>, AppError> {
    let user = user_service::fetch_user_with_company(&pool, auth.user_id, auth.token).await?;
    Ok(Json(user))
}
