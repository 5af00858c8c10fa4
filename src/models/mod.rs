//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! the request/response bodies built on them, and the shared value types
//! (amounts, fixed vocabularies, pagination) they use.

pub mod amount;
/// Authentication token model
pub mod auth_token;
pub mod choices;
/// Company, bank and IBAN models
pub mod company;
/// Shipment order models
pub mod order;
pub mod pagination;
/// Payment detail models
pub mod payment;
/// User account models
pub mod user;
pub mod validation;
