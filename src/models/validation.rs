//! Field checks shared by request models.
//!
//! Every failure becomes [`AppError::InvalidRequest`] naming the field, so
//! clients see `"cargo_name: ensure this field has no more than 55 characters"`.

use std::str::FromStr;

use crate::error::AppError;

pub fn invalid(field: &str, message: impl std::fmt::Display) -> AppError {
    AppError::InvalidRequest(format!("{field}: {message}"))
}

/// Non-blank and at most `max_chars` characters.
pub fn required_text(field: &str, value: &str, max_chars: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(invalid(field, "this field may not be blank"));
    }
    max_length(field, value, max_chars)
}

pub fn max_length(field: &str, value: &str, max_chars: usize) -> Result<(), AppError> {
    if value.chars().count() > max_chars {
        return Err(invalid(
            field,
            format!("ensure this field has no more than {max_chars} characters"),
        ));
    }
    Ok(())
}

pub fn optional_text(field: &str, value: Option<&str>, max_chars: usize) -> Result<(), AppError> {
    match value {
        Some(value) => max_length(field, value, max_chars),
        None => Ok(()),
    }
}

/// Treat blank optional strings as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a field value, naming the field in the error.
pub fn parse_field<T>(field: &str, value: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| invalid(field, e))
}

/// Minimal address shape check: one `@`, non-empty local part, dotted domain.
pub fn email(field: &str, value: &str) -> Result<(), AppError> {
    let valid = value.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.contains('@')
            && !value.chars().any(char::is_whitespace)
            && domain.split('.').count() >= 2
            && domain.split('.').all(|label| !label.is_empty())
    });

    if valid {
        Ok(())
    } else {
        Err(invalid(field, "enter a valid email address"))
    }
}

/// Boolean parsing for form fields, accepting the usual spellings.
pub fn parse_bool(field: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "t" | "y" => Ok(true),
        "false" | "0" | "no" | "off" | "f" | "n" => Ok(false),
        _ => Err(invalid(field, "must be a valid boolean")),
    }
}
