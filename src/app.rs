//! HTTP router assembly.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{handlers, middleware, state::AppState};

/// Build the application router.
///
/// # Routes
///
/// Public:
/// - `GET /health`
/// - `POST /api/v1/users`, `POST /api/v1/users/login`
/// - `GET /media/*` (uploaded order files)
///
/// Everything else under `/api/v1` requires `Authorization: Token <key>`.
///
/// `max_upload_bytes` limits the order upload body.
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    let authenticated_routes = Router::new()
        // Companies
        .route(
            "/api/v1/companies",
            post(handlers::companies::create_company).get(handlers::companies::filter_companies),
        )
        .route(
            "/api/v1/companies/lookup",
            get(handlers::companies::fetch_company),
        )
        .route(
            "/api/v1/companies/mine",
            get(handlers::companies::fetch_user_company),
        )
        .route(
            "/api/v1/companies/{vat_number}",
            put(handlers::companies::update_company).delete(handlers::companies::delete_company),
        )
        .route(
            "/api/v1/companies/{vat_number}/ibans",
            post(handlers::companies::create_iban),
        )
        .route("/api/v1/ibans", get(handlers::companies::fetch_iban))
        .route("/api/v1/banks", get(handlers::companies::list_banks))
        // Users
        .route(
            "/api/v1/users/me",
            get(handlers::users::fetch_user_with_company),
        )
        // Orders
        .route(
            "/api/v1/orders",
            post(handlers::orders::create_order)
                .layer(DefaultBodyLimit::max(max_upload_bytes))
                .get(handlers::orders::list_orders),
        )
        .route("/api/v1/orders/{id}", get(handlers::orders::get_order))
        // Payments
        .route(
            "/api/v1/payments",
            post(handlers::payments::create_payment).get(handlers::payments::list_payments),
        )
        // Apply authentication middleware to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            state.pool.clone(),
            middleware::auth::auth_middleware,
        ));

    let media = ServeDir::new(state.media.root());

    Router::new()
        // Public routes (no authentication required)
        .route("/health", get(handlers::health::health_check))
        .route("/api/v1/users", post(handlers::users::create_user))
        .route("/api/v1/users/login", post(handlers::users::login_user))
        .nest_service("/media", media)
        .merge(authenticated_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
