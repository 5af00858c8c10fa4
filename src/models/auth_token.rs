//! Authentication token model.
//!
//! Tokens are issued on user creation and login. Only their SHA-256 hashes
//! are stored, so a leaked table cannot be replayed.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Represents an authentication token record from the database.
///
/// # Database Table
///
/// Maps to the `auth_tokens` table with columns:
/// - `id`: Unique identifier (UUID)
/// - `user_id`: Owner of the token
/// - `key_hash`: SHA-256 hash of the token (64 hex characters)
/// - `created_at`: When the token was issued
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthToken {
    pub id: Uuid,
    pub user_id: Uuid,

    /// When a request comes in with "Token abc123", we hash "abc123" and
    /// look the hash up here.
    pub key_hash: String,

    pub created_at: DateTime<Utc>,
}

/// Token joined with the state of its owner, as loaded by the auth middleware.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TokenOwner {
    pub user_id: Uuid,
    pub company_id: Option<Uuid>,
}
