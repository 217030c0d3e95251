//! Field checks shared by the registration services.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

pub static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern")
});

pub static POSTAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{8}$").expect("valid postal code pattern"));

pub static STATE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").expect("valid state pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn non_blank(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::new(field, "must not be blank"));
    }
    Ok(())
}

pub fn matches(
    field: &'static str,
    value: &str,
    pattern: &Regex,
    expected: &str,
) -> Result<(), FieldError> {
    non_blank(field, value)?;
    if !pattern.is_match(value) {
        return Err(FieldError::new(field, format!("must be {}", expected)));
    }
    Ok(())
}

pub fn email(field: &'static str, value: &str) -> Result<(), FieldError> {
    matches(field, value, &EMAIL, "a valid email address")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_values() {
        assert_eq!(
            non_blank("name", "   ").unwrap_err(),
            FieldError::new("name", "must not be blank")
        );
    }

    #[test]
    fn checks_email_shape() {
        assert!(email("email", "medico@voll.med").is_ok());
        assert!(email("email", "not-an-email").is_err());
        assert!(email("email", "a b@c.d").is_err());
    }

    #[test]
    fn postal_code_is_eight_digits() {
        assert!(POSTAL_CODE.is_match("00000000"));
        assert!(!POSTAL_CODE.is_match("0000-000"));
        assert!(!POSTAL_CODE.is_match("123456789"));
    }
}
