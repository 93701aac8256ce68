//! Per-entity draft rules: normalizing filters and ordered validator chains

use crate::core::error::StoreError;
use anyhow::Result;
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

type Validator = Arc<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;
type Filter = Arc<dyn Fn(&str, Value) -> Result<Value> + Send + Sync>;

/// Validation and filtering applied to a draft before it is sent to a source
///
/// Filters run first on every field that has them, then validators run field
/// by field in the order fields were registered. The first failing validator
/// decides the error.
#[derive(Clone, Default)]
pub struct DraftRules {
    /// Entity type the rules belong to
    pub entity_type: String,

    validators: IndexMap<String, Vec<Validator>>,
    filters: IndexMap<String, Vec<Filter>>,
}

impl DraftRules {
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            ..Default::default()
        }
    }

    /// Add a validator for a field
    pub fn add_validator<F>(&mut self, field: &str, validator: F)
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators
            .entry(field.to_string())
            .or_default()
            .push(Arc::new(validator));
    }

    /// Add a filter for a field
    pub fn add_filter<F>(&mut self, field: &str, filter: F)
    where
        F: Fn(&str, Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.filters
            .entry(field.to_string())
            .or_default()
            .push(Arc::new(filter));
    }

    /// Builder-style [`add_validator`](Self::add_validator)
    pub fn validate<F>(mut self, field: &str, validator: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.add_validator(field, validator);
        self
    }

    /// Builder-style [`add_filter`](Self::add_filter)
    pub fn filter<F>(mut self, field: &str, filter: F) -> Self
    where
        F: Fn(&str, Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.add_filter(field, filter);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty() && self.filters.is_empty()
    }

    /// Normalize then validate a draft payload
    ///
    /// Returns the normalized payload, or the first violation as a
    /// [`StoreError::Validation`].
    pub fn check(&self, mut payload: Value) -> Result<Value, StoreError> {
        let Some(obj) = payload.as_object_mut() else {
            return Err(StoreError::validation(
                &self.entity_type,
                format!("{} draft must be an object", self.entity_type),
            ));
        };

        for (field, filters) in &self.filters {
            if let Some(value) = obj.remove(field) {
                let mut current = value;
                for filter in filters {
                    current = filter(field, current).map_err(|e| {
                        StoreError::validation(field.clone(), format!("{}: {}", field, e))
                    })?;
                }
                obj.insert(field.clone(), current);
            }
        }

        for (field, validators) in &self.validators {
            let value = obj.get(field).unwrap_or(&Value::Null);
            for validator in validators {
                if let Err(message) = validator(field, value) {
                    return Err(StoreError::validation(field.clone(), message));
                }
            }
        }

        Ok(payload)
    }
}

impl std::fmt::Debug for DraftRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftRules")
            .field("entity_type", &self.entity_type)
            .field("validated", &self.validators.keys().collect::<Vec<_>>())
            .field("filtered", &self.filters.keys().collect::<Vec<_>>())
            .finish()
    }
}
