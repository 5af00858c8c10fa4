//! Token and password handling.
//!
//! - Tokens are 40 hex characters of randomness, stored as SHA-256 hashes.
//! - Passwords are stored as Argon2id PHC strings. Hashing runs on the
//!   blocking pool so it does not stall the async workers.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use sha2::{Digest, Sha256};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{error::AppError, models::auth_token::AuthToken};

/// Generate a new random token (20 bytes, hex encoded).
pub fn generate_token() -> String {
    hex::encode(rand::random::<[u8; 20]>())
}

/// SHA-256 hex digest of a token, as stored in `auth_tokens.key_hash`.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Create and store a fresh token for `user_id`. Returns the raw token.
///
/// The raw value is only ever returned here; the database keeps the hash.
pub async fn issue_token<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
) -> Result<String, AppError> {
    let token = generate_token();

    let record = sqlx::query_as::<_, AuthToken>(
        r#"
        INSERT INTO auth_tokens (user_id, key_hash)
        VALUES ($1, $2)
        RETURNING id, user_id, key_hash, created_at
        "#,
    )
    .bind(user_id)
    .bind(hash_token(&token))
    .fetch_one(executor)
    .await?;

    tracing::debug!(token_id = %record.id, user_id = %record.user_id, "Issued auth token");
    Ok(token)
}

/// Hash a password into an Argon2 PHC string.
pub async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::PasswordHash(e.to_string()))
    })
    .await
    .map_err(|e| AppError::PasswordHash(e.to_string()))?
}

/// Check a password against a stored PHC string.
///
/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: String, password_hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || {
        PasswordHash::new(&password_hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    })
    .await
    .map_err(|e| AppError::PasswordHash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_random_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 40);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn token_hash_is_sha256_hex() {
        assert_eq!(
            hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn password_round_trip() {
        let hash = hash_password("s3cret".to_string()).await.unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret".into(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrong".into(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_hash_never_verifies() {
        assert!(!verify_password("x".into(), "not-a-phc-string".into()).await.unwrap());
    }
}
