//! Query criteria: search text, filter constraints and sort directive

use crate::core::field::FieldValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Active filter constraints keyed by filter name, in insertion order
pub type FilterOptions = IndexMap<String, FieldValue>;

/// Everything that decides which entities are visible and in which order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    /// Free-text search, matched case-insensitively
    #[serde(default)]
    pub search: String,

    /// Filter constraints
    #[serde(default)]
    pub filters: FilterOptions,

    /// Optional sort directive
    #[serde(default)]
    pub sort: Option<SortDirective>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style search text
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Builder-style filter constraint
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.merge_filters(FilterPatch::new().set(key, value));
        self
    }

    /// Builder-style sort directive
    pub fn with_sort(mut self, sort: SortDirective) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Search text with surrounding whitespace removed, or `None` when blank
    pub fn search_term(&self) -> Option<&str> {
        let term = self.search.trim();
        (!term.is_empty()).then_some(term)
    }

    /// True when no constraint and no sort is active
    pub fn is_empty(&self) -> bool {
        self.search_term().is_none() && self.filters.is_empty() && self.sort.is_none()
    }

    /// Merge a patch into the filter mapping
    ///
    /// Keys absent from the patch keep their constraint. Keys carried with a
    /// null value lose theirs.
    pub fn merge_filters(&mut self, patch: FilterPatch) {
        for (key, value) in patch.0 {
            if value.is_null() {
                self.filters.shift_remove(&key);
            } else {
                self.filters.insert(key, value);
            }
        }
    }

    /// Select a sort attribute
    ///
    /// Selecting the attribute already sorted on flips its direction; any
    /// other attribute starts ascending.
    pub fn select_sort(&mut self, field: &str) {
        self.sort = Some(match self.sort.take() {
            Some(current) if current.field == field => SortDirective {
                direction: current.direction.toggled(),
                ..current
            },
            _ => SortDirective::asc(field),
        });
    }

    /// Back to the empty identity: no search, no filters, no sort
    pub fn reset(&mut self) {
        *self = Criteria::default();
    }
}

/// Partial filter update
///
/// A `FieldValue::Null` entry clears the constraint for that key.
///
/// # Example
/// ```
/// use shelf::core::query::{Criteria, FilterPatch};
///
/// let mut criteria = Criteria::new();
/// criteria.merge_filters(FilterPatch::new().set("minPrice", 20.0));
/// criteria.merge_filters(FilterPatch::new().set("maxPrice", 30.0));
/// assert_eq!(criteria.filters.len(), 2);
///
/// criteria.merge_filters(FilterPatch::new().clear("minPrice"));
/// assert_eq!(criteria.filters.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPatch(IndexMap<String, FieldValue>);

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain `key` to `value` (a null value clears it)
    pub fn set(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Clear the constraint on `key`
    pub fn clear(mut self, key: impl Into<String>) -> Self {
        self.0.insert(key.into(), FieldValue::Null);
        self
    }

    /// Build a patch from a JSON object such as `{"category": "Food", "minPrice": null}`
    ///
    /// Non-object values yield an empty patch; nested arrays and objects are
    /// not valid constraints and are skipped.
    pub fn from_json(value: &Value) -> Self {
        let mut patch = Self::new();
        if let Some(obj) = value.as_object() {
            for (key, value) in obj {
                let field_value = match value {
                    Value::Null => FieldValue::Null,
                    Value::Bool(b) => FieldValue::Boolean(*b),
                    Value::Number(n) => match n.as_i64() {
                        Some(i) => FieldValue::Integer(i),
                        None => n.as_f64().map_or(FieldValue::Null, FieldValue::Float),
                    },
                    Value::String(s) => FieldValue::String(s.clone()),
                    Value::Array(_) | Value::Object(_) => continue,
                };
                patch.0.insert(key.clone(), field_value);
            }
        }
        patch
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Sort attribute and direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDirective {
    pub field: String,
    pub direction: SortDirection,
}

impl SortDirective {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Parse a sort expression
    ///
    /// # Format
    /// - `field:asc` or `field` (ascending)
    /// - `field:desc` (descending)
    ///
    /// Returns `None` for an empty field or an unknown direction.
    pub fn parse(expr: &str) -> Option<Self> {
        let (field, direction) = match expr.split_once(':') {
            Some((field, "asc")) => (field, SortDirection::Asc),
            Some((field, "desc")) => (field, SortDirection::Desc),
            Some(_) => return None,
            None => (expr, SortDirection::Asc),
        };
        let field = field.trim();
        (!field.is_empty()).then(|| Self {
            field: field.to_string(),
            direction,
        })
    }
}

impl fmt::Display for SortDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{}:{}", self.field, direction)
    }
}

/// Comparison a filter applies to an entity attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Attribute equals the constraint
    Equals,
    /// Attribute >= constraint
    AtLeast,
    /// Attribute <= constraint
    AtMost,
    /// Attribute > constraint
    Above,
    /// Attribute < constraint
    Below,
}

/// Resolution of a filter key into the attribute it reads and how it compares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRule {
    pub field: String,
    pub op: FilterOp,
}

impl FilterRule {
    pub fn new(field: impl Into<String>, op: FilterOp) -> Self {
        Self {
            field: field.into(),
            op,
        }
    }

    /// Parse the generic filter key syntax
    ///
    /// # Format
    /// - Exact match: `field`
    /// - Comparison: `field>`, `field<`, `field>=`, `field<=`
    pub fn parse(key: &str) -> Self {
        const SUFFIXES: [(&str, FilterOp); 4] = [
            (">=", FilterOp::AtLeast),
            ("<=", FilterOp::AtMost),
            (">", FilterOp::Above),
            ("<", FilterOp::Below),
        ];
        for (suffix, op) in SUFFIXES {
            if let Some(field) = key.strip_suffix(suffix) {
                return Self::new(field.trim_end(), op);
            }
        }
        Self::new(key, FilterOp::Equals)
    }

    /// Check an entity attribute against a constraint
    ///
    /// A missing attribute never satisfies a constraint. Threshold operators
    /// need both sides to have a numeric reading, dates compare
    /// chronologically.
    pub fn accepts(&self, attribute: Option<&FieldValue>, constraint: &FieldValue) -> bool {
        let Some(attribute) = attribute else {
            return false;
        };
        if attribute.is_null() {
            return false;
        }
        match self.op {
            FilterOp::Equals => attribute.matches(constraint),
            FilterOp::AtLeast => {
                Self::comparable(attribute, constraint) && attribute.compare(constraint).is_ge()
            }
            FilterOp::AtMost => {
                Self::comparable(attribute, constraint) && attribute.compare(constraint).is_le()
            }
            FilterOp::Above => {
                Self::comparable(attribute, constraint) && attribute.compare(constraint).is_gt()
            }
            FilterOp::Below => {
                Self::comparable(attribute, constraint) && attribute.compare(constraint).is_lt()
            }
        }
    }

    fn comparable(attribute: &FieldValue, constraint: &FieldValue) -> bool {
        match (attribute, constraint) {
            (FieldValue::Date(_), FieldValue::Date(_))
            | (FieldValue::DateTime(_), FieldValue::DateTime(_)) => true,
            _ => attribute.as_f64().is_some() && constraint.as_f64().is_some(),
        }
    }
}
