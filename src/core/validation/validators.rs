//! Field validators
//!
//! Each validator returns the parsed value or a field error whose message is
//! shown to the person filling the form.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;

use super::filters::non_empty;
use crate::core::error::ValidationError;

static MOBILE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9][0-9 -]{5,18}[0-9]$").expect("mobile pattern is a valid regex")
});

/// Require non-blank text, returning it trimmed
pub fn require_text(field: &str, value: &str, message: &str) -> Result<String, ValidationError> {
    match non_empty(Some(value)) {
        Some(text) => Ok(text),
        None => Err(ValidationError::field(field, message)),
    }
}

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`)
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::field(field, "Date must be in YYYY-MM-DD format"))
}

/// Require a date to be present, then parse it
pub fn require_date(
    field: &str,
    value: Option<&str>,
    message: &str,
) -> Result<NaiveDate, ValidationError> {
    match non_empty(value) {
        Some(text) => parse_date(field, &text),
        None => Err(ValidationError::field(field, message)),
    }
}

/// Accept a JSON number or a numeric string as a decimal amount
pub fn parse_amount(field: &str, value: &Value, message: &str) -> Result<Decimal, ValidationError> {
    let invalid = || ValidationError::field(field, message);

    let parsed = match value {
        Value::Number(number) => {
            let text = number.to_string();
            Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text))
        }
        Value::String(text) => {
            let text = text.trim();
            Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text))
        }
        _ => return Err(invalid()),
    };

    parsed.map_err(|_| invalid())
}

/// Optional mobile number: absent when blank, otherwise digits with an
/// optional leading `+` and spaces or dashes as separators
pub fn validate_mobile(field: &str, value: Option<&str>) -> Result<Option<String>, ValidationError> {
    match non_empty(value) {
        None => Ok(None),
        Some(number) if MOBILE_PATTERN.is_match(&number) => Ok(Some(number)),
        Some(_) => Err(ValidationError::field(field, "Please enter a valid mobile number")),
    }
}
