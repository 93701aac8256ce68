//! Durable cell holding one persisted subset
//!
//! The state is kept in memory and written back as
//! `{"state": ..., "version": N}` after every update. Writes are
//! fire-and-forget: a failed write is logged and the in-memory value stands.
//! Writes are serialized, and a snapshot older than the last one written is
//! skipped, so the stored blob never goes back to an earlier state.

use crate::core::error::StoreError;
use crate::storage::BlobStore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

#[derive(Serialize, Deserialize)]
struct Envelope<S> {
    state: S,
    version: u32,
}

/// Persisted value of type `S` bound to one storage key
pub struct PersistentCell<S> {
    storage: Arc<dyn BlobStore>,
    key: String,
    version: u32,
    value: RwLock<S>,
    /// Bumped on every update, under the value lock
    generation: AtomicU64,
    /// Generation of the last snapshot handed to storage
    written: Mutex<u64>,
}

impl<S> PersistentCell<S>
where
    S: Serialize + DeserializeOwned + Default + Clone + Send + Sync,
{
    /// Load the cell from storage
    ///
    /// A missing blob, a blob that does not parse or a blob written with a
    /// different version all yield `S::default()`.
    pub fn load(storage: Arc<dyn BlobStore>, key: impl Into<String>, version: u32) -> Self {
        let key = key.into();
        let value = match Self::read_blob(storage.as_ref(), &key, version) {
            Ok(Some(state)) => {
                tracing::debug!(key = %key, "restored persisted state");
                state
            }
            Ok(None) => S::default(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "discarding persisted state");
                S::default()
            }
        };

        Self {
            storage,
            key,
            version,
            value: RwLock::new(value),
            generation: AtomicU64::new(0),
            written: Mutex::new(0),
        }
    }

    fn read_blob(storage: &dyn BlobStore, key: &str, version: u32) -> Result<Option<S>, StoreError> {
        let Some(blob) = storage.get(key)? else {
            return Ok(None);
        };
        let envelope: Envelope<S> = serde_json::from_str(&blob)
            .map_err(|e| StoreError::storage(format!("unreadable blob: {}", e)))?;
        if envelope.version != version {
            return Err(StoreError::storage(format!(
                "version {} does not match expected {}",
                envelope.version, version
            )));
        }
        Ok(Some(envelope.state))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Copy of the current value
    pub fn get(&self) -> S {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Read the current value without cloning it
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let value = self.value.read().unwrap_or_else(PoisonError::into_inner);
        f(&value)
    }

    /// Mutate the value and write it back
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let (result, snapshot, generation) = {
            let mut value = self.value.write().unwrap_or_else(PoisonError::into_inner);
            let result = f(&mut value);
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            (result, value.clone(), generation)
        };

        let mut written = self.written.lock().unwrap_or_else(PoisonError::into_inner);
        if generation > *written {
            self.persist(&snapshot);
            *written = generation;
        } else {
            tracing::trace!(key = %self.key, generation, "skipping superseded snapshot");
        }
        result
    }

    /// Replace the value and write it back
    pub fn set(&self, state: S) {
        self.update(|value| *value = state);
    }

    fn persist(&self, state: &S) {
        let envelope = Envelope {
            state,
            version: self.version,
        };
        let written = serde_json::to_string(&envelope)
            .map_err(StoreError::from)
            .and_then(|blob| self.storage.set(&self.key, &blob));

        if let Err(e) = written {
            tracing::warn!(key = %self.key, error = %e, "failed to persist state");
        }
    }
}
