//! Entity source trait: request/response access to a remote collection

use crate::core::entity::Entity;
use crate::core::error::StoreError;
use async_trait::async_trait;
use serde_json::Value;

/// Source of truth for one entity collection
///
/// Implementations provide list/get/create/delete for a specific entity
/// type. Stores are agnostic to whether the source is an HTTP API or an
/// in-memory mock.
#[async_trait]
pub trait EntitySource<T: Entity>: Send + Sync {
    /// List the collection, optionally scoped to one owner
    async fn list(&self, owner: Option<&str>) -> Result<Vec<T>, StoreError>;

    /// Get an entity by ID; `Ok(None)` when it does not exist
    async fn get(&self, id: &str) -> Result<Option<T>, StoreError>;

    /// Create an entity from a validated draft payload
    ///
    /// The source assigns the id and returns the stored record.
    async fn create(&self, payload: Value) -> Result<T, StoreError>;

    /// Delete an entity; deleting an unknown id succeeds
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
