//! User data models and API request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, models::validation};

/// Represents a user record from the database.
///
/// # Database Table
///
/// Maps to the `users` table. `email` and `phone_number` are unique.
/// A user is attached to at most one company through `company_id`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,

    /// Argon2 PHC string, never returned to clients
    pub password_hash: String,

    pub company_id: Option<Uuid>,

    /// Inactive users cannot log in and their tokens are rejected
    pub is_active: bool,

    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

/// Request body for `POST /api/v1/users`.
///
/// # JSON Example
///
/// ```json
/// {
///   "first_name": "Nino",
///   "last_name": "Beridze",
///   "email": "nino@caucasus-freight.ge",
///   "phone_number": "+995555123456",
///   "password": "correct horse battery staple"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
}

impl CreateUserRequest {
    pub fn normalized(mut self) -> Self {
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.phone_number = self.phone_number.trim().to_string();
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        validation::required_text("first_name", &self.first_name, 55)?;
        validation::required_text("last_name", &self.last_name, 55)?;
        validation::required_text("email", &self.email, 254)?;
        validation::email("email", &self.email)?;
        validation::required_text("phone_number", &self.phone_number, 15)?;
        if self.password.is_empty() {
            return Err(validation::invalid("password", "this field may not be blank"));
        }
        Ok(())
    }
}

/// Request body for `POST /api/v1/users/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validation::required_text("email", &self.email, 254)?;
        if self.password.is_empty() {
            return Err(validation::invalid("password", "this field may not be blank"));
        }
        Ok(())
    }
}

/// User as returned by create and login, with the token just issued.
///
/// # JSON Example
///
/// ```json
/// {
///   "first_name": "Nino",
///   "last_name": "Beridze",
///   "email": "nino@caucasus-freight.ge",
///   "phone_number": "+995555123456",
///   "token": "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub token: String,
}

impl UserResponse {
    pub fn new(user: User, token: String) -> Self {
        Self {
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone_number: user.phone_number,
            token,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AttachedCompany {
    pub name: String,
}

/// Response body for `GET /api/v1/users/me`.
///
/// `attached_company` is `null` when the user has no company.
#[derive(Debug, Serialize)]
pub struct UserWithCompanyResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub attached_company: Option<AttachedCompany>,
}
