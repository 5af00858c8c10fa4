//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They handle database transactions, validation, and multi-step operations.

pub mod auth_service;
pub mod company_service;
pub mod iban;
pub mod media;
pub mod order_service;
pub mod payment_service;
pub mod user_service;
