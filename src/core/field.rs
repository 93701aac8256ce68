//! Field value types used for filtering, sorting and format checks

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::OnceLock;

/// A polymorphic field value that can hold different types
///
/// Entities expose their attributes as `FieldValue`s so the list engine can
/// filter and sort any entity type without knowing its concrete fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of the value
    ///
    /// Integers and floats map to themselves, booleans to 0/1. Everything
    /// else has no numeric reading.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            FieldValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Equality used by exact-match filters
    ///
    /// Integers and floats compare numerically; every other pairing needs
    /// the same variant.
    pub fn matches(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (
                FieldValue::Integer(_) | FieldValue::Float(_),
                FieldValue::Integer(_) | FieldValue::Float(_),
            ) => self.as_f64() == other.as_f64(),
            _ => self == other,
        }
    }

    /// Total order used for sorting
    ///
    /// Values of different kinds are ranked null < boolean/number < date <
    /// datetime < string. Booleans sort as 0/1 among the numbers.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::String(a), FieldValue::String(b)) => a.cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => a.cmp(b),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                _ => self.rank().cmp(&other.rank()),
            },
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Boolean(_) | FieldValue::Integer(_) | FieldValue::Float(_) => 1,
            FieldValue::Date(_) => 2,
            FieldValue::DateTime(_) => 3,
            FieldValue::String(_) => 4,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// Field format validators
#[derive(Debug, Clone)]
pub enum FieldFormat {
    Email,
    Phone,
    Custom(Regex),
}

impl FieldFormat {
    /// Check a raw string against this format
    pub fn is_valid(&self, value: &str) -> bool {
        match self {
            FieldFormat::Email => Self::is_valid_email(value),
            FieldFormat::Phone => Self::is_valid_phone(value),
            FieldFormat::Custom(regex) => regex.is_match(value),
        }
    }

    fn is_valid_email(email: &str) -> bool {
        static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = EMAIL_REGEX.get_or_init(|| {
            Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
                .expect("valid email regex")
        });
        regex.is_match(email)
    }

    fn is_valid_phone(phone: &str) -> bool {
        static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
        // Digits with optional separators, 7 to 15 digits overall
        let regex = PHONE_REGEX.get_or_init(|| {
            Regex::new(r"^\+?[0-9][0-9 .-]{5,17}[0-9]$").expect("valid phone regex")
        });
        let digits = phone.chars().filter(char::is_ascii_digit).count();
        regex.is_match(phone) && (7..=15).contains(&digits)
    }
}
