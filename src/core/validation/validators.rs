//! Reusable field validators
//!
//! Each validator receives the field name and its (already normalized)
//! value and returns a user-facing message on failure. A missing field is
//! presented as `Value::Null`.

use crate::core::field::FieldFormat;
use serde_json::Value;

/// Validator: field is present and, for strings, not blank
pub fn required() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null => Err(format!("{} is required", field)),
        Value::String(s) if s.trim().is_empty() => Err(format!("{} is required", field)),
        _ => Ok(()),
    }
}

/// Validator: field is optional (always valid)
pub fn optional() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, _: &Value| Ok(())
}

/// Validator: value is a finite number
///
/// Numeric strings are expected to have been converted by
/// [`to_number`](super::filters::to_number) already, so any string that is
/// still a string here did not parse.
pub fn numeric() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null => Ok(()),
        Value::Number(n) if n.as_f64().is_some_and(f64::is_finite) => Ok(()),
        _ => Err(format!("{} must be a valid number", field)),
    }
}

/// Validator: number must be strictly greater than zero
pub fn positive() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if let Some(num) = value.as_f64() {
            if num <= 0.0 {
                Err(format!("{} must be positive", field))
            } else {
                Ok(())
            }
        } else {
            Ok(()) // non-numbers are left to numeric()
        }
    }
}

/// Validator: string length must be within range (in characters)
pub fn string_length(
    min: usize,
    max: usize,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            let len = s.chars().count();
            if len < min {
                Err(format!("{} must be at least {} characters", field, min))
            } else if len > max {
                Err(format!("{} must be at most {} characters", field, max))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: value must be in allowed list
pub fn in_list(
    allowed: Vec<String>,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            if allowed.iter().any(|a| a == s) {
                Ok(())
            } else {
                Err(format!(
                    "{} must be one of: {} (got '{}')",
                    field,
                    allowed.join(", "),
                    s
                ))
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: date must match format
pub fn date_format(
    format: &'static str,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            match chrono::NaiveDate::parse_from_str(s, format) {
                Ok(_) => Ok(()),
                Err(_) => Err(format!("{} must be a date formatted as {}", field, format)),
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: string must match a [`FieldFormat`]
pub fn format(
    format: FieldFormat,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| match value.as_str() {
        Some(s) if !format.is_valid(s) => Err(format!("{} is not valid", field)),
        _ => Ok(()),
    }
}
