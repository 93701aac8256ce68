//! Reusable field filters
//!
//! These filters normalize draft field values before validation runs.

use anyhow::Result;
use serde_json::{Number, Value, json};

/// Filter: trim whitespace from string
pub fn trim() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.trim().to_string()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: turn a numeric string into a JSON number
///
/// Whole numbers become JSON integers so they fit integer fields. Strings
/// that do not parse, or parse to a non-finite value (`"inf"`, `"NaN"`), are
/// left untouched so the `numeric` validator can reject them.
pub fn to_number() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        let Some(s) = value.as_str() else {
            return Ok(value);
        };
        let trimmed = s.trim();
        if let Ok(int) = trimmed.parse::<i64>() {
            return Ok(Value::Number(Number::from(int)));
        }
        let parsed = trimmed.parse::<f64>().ok().and_then(Number::from_f64);
        Ok(parsed.map_or(value, Value::Number))
    }
}

/// Filter: round number to specified decimal places
pub fn round_decimals(
    decimals: u32,
) -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    move |_: &str, value: Value| {
        if let Some(num) = value.as_f64() {
            let factor = 10_f64.powi(decimals as i32);
            let rounded = (num * factor).round() / factor;
            Ok(json!(rounded))
        } else {
            Ok(value)
        }
    }
}
