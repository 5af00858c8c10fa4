//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, multipart form, URL params)
//! 2. Delegates to a service
//! 3. Returns HTTP response (JSON, status code)

/// Company, IBAN and bank endpoints
pub mod companies;
/// Health check endpoint
pub mod health;
/// Order endpoints
pub mod orders;
/// Payment detail endpoints
pub mod payments;
/// User registration, login and profile endpoints
pub mod users;
