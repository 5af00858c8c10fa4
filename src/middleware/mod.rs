//! HTTP middleware components.
//!
//! Middleware run before route handlers. Here they authenticate requests
//! and short-circuit the ones without a valid token.

/// Token authentication middleware
pub mod auth;
