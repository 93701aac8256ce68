//! Entity traits defining the core abstraction for all list item types

use crate::core::field::FieldValue;
use crate::core::query::FilterRule;
use crate::core::validation::DraftRules;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// Base trait for every record a store can hold.
///
/// Entities are identified by a string id assigned by the entity source and
/// travel as JSON between the store, its source and durable storage.
pub trait Entity:
    Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// The plural resource name used in source paths (e.g., "vehicles", "expenses")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "vehicle", "expense")
    fn resource_name_singular() -> &'static str;

    /// Unique identifier within a collection
    fn id(&self) -> &str;

    /// Id of the user owning this entity.
    ///
    /// Returns None for entities that are not scoped to a user, such as the
    /// shared vehicle catalog.
    fn owner_id(&self) -> Option<&str> {
        None
    }
}

/// Entities that can be searched, filtered and sorted by a list store.
pub trait Listable: Entity {
    /// Payload sent to the source when creating an entity
    type Draft: Serialize + Send + Sync;

    /// Text attributes matched by the free-text search
    fn searchable_values(&self) -> Vec<&str>;

    /// Get the value of a specific attribute by name
    ///
    /// Returns None when the entity has no such attribute.
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Resolve a filter key into the attribute and comparison it applies
    ///
    /// Override to declare aliases such as `minPrice` meaning "hourlyRate at
    /// least"; everything else falls back to the generic key syntax.
    fn filter_rule(key: &str) -> FilterRule {
        FilterRule::parse(key)
    }

    /// Resolve a sort key into the attribute it orders by
    fn sort_field(key: &str) -> &str {
        key
    }

    /// Rules applied to a draft before `create`
    fn draft_rules() -> DraftRules {
        DraftRules::new(Self::resource_name_singular())
    }

    /// Draft field stamped with the acting user's id on create
    ///
    /// Stores of entities returning Some require a signed-in user for
    /// fetches and creates.
    fn owner_field() -> Option<&'static str> {
        None
    }
}
