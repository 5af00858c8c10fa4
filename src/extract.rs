//! Request extractors that report rejections in the API error format.
//!
//! axum's own `Json`, `Query` and `Path` answer malformed input with a
//! plain-text body. These wrappers turn the rejection into [`AppError::InvalidRequest`].

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ValidJson<T>(pub T);

/// Query string parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ValidQuery<T>(pub T);

/// URL path parameters, e.g. an order id that must parse as a UUID.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ValidPath<T>(pub T);
