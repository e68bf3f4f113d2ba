//! Input validation predicates.
//!
//! All predicates are pure. The service wires them into declarative request
//! validation; email syntax is checked there.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Number;

/// Minimum password length in characters.
pub const PASSWORD_MIN_CHARS: usize = 8;

/// Maximum password length in characters.
pub const PASSWORD_MAX_CHARS: usize = 16;

static NAME_PATTERN: OnceLock<Regex> = OnceLock::new();

fn name_pattern() -> &'static Regex {
    NAME_PATTERN.get_or_init(|| {
        Regex::new(r"^[\p{Han}A-Za-z0-9]{2,10}$").unwrap_or_else(|e| panic!("name pattern: {e}"))
    })
}

/// A string field is invalid when it is missing or blank after trimming.
#[must_use]
pub fn is_invalid_string(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Read a JSON number as a non-negative whole number.
///
/// `10` and `10.0` are accepted; `-1`, `1.5`, `NaN`-like values are not.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn as_non_negative_integer(value: &Number) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    if value.is_i64() {
        return None;
    }
    let f = value.as_f64()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

/// An integer field is invalid when it is missing, negative, or fractional.
#[must_use]
pub fn is_invalid_integer(value: Option<&Number>) -> bool {
    value.and_then(as_non_negative_integer).is_none()
}

/// 8–16 characters with at least one digit, one lowercase and one uppercase letter.
#[must_use]
pub fn is_valid_password(value: &str) -> bool {
    let len = value.chars().count();
    (PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&len)
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase())
}

/// 2–10 characters, each a CJK ideograph, ASCII letter or digit.
#[must_use]
pub fn is_valid_name(value: &str) -> bool {
    name_pattern().is_match(value)
}

/// Links stored for meetings and profile images must use `https`.
#[must_use]
pub fn is_https_url(value: &str) -> bool {
    value.starts_with("https")
}

/// Parse a pagination query parameter: an integer of at least 1.
#[must_use]
pub fn parse_positive_integer(value: Option<&str>) -> Option<u64> {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|n| *n >= 1)
}
