//! Field rules for request bodies.
//!
//! Request types derive [`validator::Validate`] and name these functions in
//! `#[validate(custom = "...")]` attributes. A rule that fails without a
//! message reports the generic "fields not filled correctly"; a rule with a
//! message reports that message.

use std::borrow::Cow;

use chrono::DateTime;
use serde_json::Number;
use validator::{ValidationError, ValidationErrors};

use coursebook_core::validation::{
    as_non_negative_integer, is_https_url, is_invalid_string, is_valid_name, is_valid_password,
};

use crate::error::ApiError;

/// Message for a name that fails the name pattern.
pub const NAME_RULE: &str = "name must be 2-10 characters of letters, digits or CJK characters";

/// Message for a password that fails the strength rule.
pub const PASSWORD_RULE: &str =
    "password must be 8-16 characters with an uppercase letter, a lowercase letter and a digit";

/// Message for a profile image link that is not `https`.
pub const IMAGE_URL_RULE: &str = "profile image url must use https";

fn with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Rejects empty and whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if is_invalid_string(Some(value)) {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Display names for members and skills.
pub fn display_name(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    if !is_valid_name(value) {
        return Err(with_message("name", NAME_RULE));
    }
    Ok(())
}

/// Password strength.
pub fn strong_password(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    if !is_valid_password(value) {
        return Err(with_message("password", PASSWORD_RULE));
    }
    Ok(())
}

/// Required `https` link.
pub fn https_link(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    if !is_https_url(value) {
        return Err(ValidationError::new("https"));
    }
    Ok(())
}

/// Optional profile image link: blank means none, otherwise it must be `https`.
pub fn profile_image_url(value: &str) -> Result<(), ValidationError> {
    if is_invalid_string(Some(value)) || is_https_url(value) {
        return Ok(());
    }
    Err(with_message("https", IMAGE_URL_RULE))
}

/// RFC 3339 timestamp.
pub fn timestamp(value: &str) -> Result<(), ValidationError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|_| ())
        .map_err(|_| ValidationError::new("timestamp"))
}

/// Non-negative whole number.
pub fn whole_number(value: &Number) -> Result<(), ValidationError> {
    as_non_negative_integer(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("integer"))
}

/// Non-negative whole number that fits in `u32`.
pub fn whole_u32(value: &Number) -> Result<(), ValidationError> {
    as_non_negative_integer(value)
        .and_then(|n| u32::try_from(n).ok())
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("integer"))
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        let failures: Vec<&ValidationError> =
            fields.iter().flat_map(|(_, errors)| errors.iter()).collect();

        tracing::debug!(
            fields = ?fields.iter().map(|(field, _)| *field).collect::<Vec<_>>(),
            "Request failed validation"
        );

        // Missing or malformed fields win over rule messages.
        if failures.iter().any(|e| e.message.is_none()) {
            return Self::invalid_fields();
        }

        failures
            .first()
            .and_then(|e| e.message.as_ref())
            .map_or_else(Self::invalid_fields, |m| Self::BadRequest(m.to_string()))
    }
}
