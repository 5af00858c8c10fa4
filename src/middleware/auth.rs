//! Token authentication middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the token from the Authorization header
//! 2. Hash it and look it up together with its (active) owner
//! 3. Inject authentication context into the request
//! 4. Reject unauthenticated requests with HTTP 401

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::auth_token::TokenOwner,
    services::auth_service::hash_token,
};

/// Authentication context attached to authenticated requests.
///
/// Route handlers extract it with `Extension<AuthContext>`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,

    /// Company the user is attached to, if any. Ownership checks compare
    /// against this.
    pub company_id: Option<Uuid>,

    /// The raw token the request was made with
    pub token: String,
}

/// Extract the token from `Token <key>` or `Bearer <key>`.
pub fn parse_authorization(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    let known_scheme =
        scheme.eq_ignore_ascii_case("Token") || scheme.eq_ignore_ascii_case("Bearer");

    (known_scheme && !token.is_empty() && !token.contains(' ')).then_some(token)
}

/// Token authentication middleware function.
///
/// # Flow
///
/// 1. Extract `Authorization: Token <key>` (or `Bearer <key>`) from the request
/// 2. Hash `<key>` with SHA-256
/// 3. Find the token whose owner is still active
/// 4. If found: inject `AuthContext`, call the next handler
/// 5. Otherwise: 401 `invalid_token`
pub async fn auth_middleware(
    State(pool): State<DbPool>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(parse_authorization)
        .ok_or(AppError::InvalidToken)?
        .to_string();

    let owner = sqlx::query_as::<_, TokenOwner>(
        r#"
        SELECT u.id AS user_id, u.company_id
        FROM auth_tokens t
        JOIN users u ON u.id = t.user_id
        WHERE t.key_hash = $1 AND u.is_active = true
        "#,
    )
    .bind(hash_token(&token))
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::InvalidToken)?;

    request.extensions_mut().insert(AuthContext {
        user_id: owner.user_id,
        company_id: owner.company_id,
        token,
    });

    Ok(next.run(request).await)
}
