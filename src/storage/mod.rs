//! Storage implementations: entity sources and durable blob stores

pub mod file;
#[cfg(feature = "http")]
pub mod http;
pub mod in_memory;
pub mod persistent;

use crate::core::error::StoreError;

pub use file::FileBlobStore;
#[cfg(feature = "http")]
pub use http::HttpEntitySource;
pub use in_memory::{InMemoryBlobStore, InMemoryEntitySource, InMemoryUserDirectory};
pub use persistent::PersistentCell;

/// Opaque durable key → blob storage
///
/// Keys name one persisted subset each (e.g. `vehicle-storage`); blobs are
/// JSON text. Calls are expected to be fast and local.
pub trait BlobStore: Send + Sync {
    /// Read a blob; `Ok(None)` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a blob, replacing any previous one
    fn set(&self, key: &str, blob: &str) -> Result<(), StoreError>;

    /// Remove a blob; removing a missing key succeeds
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
