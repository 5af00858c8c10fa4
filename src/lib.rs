//! Freight back office: companies, users, shipment orders and payment details
//! behind a token-authenticated JSON API.
//!
//! The binary in `main.rs` wires configuration, the database pool and media
//! storage together and serves [`app::build_router`].

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
