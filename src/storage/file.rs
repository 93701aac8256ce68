//! File-backed blob store: one `<key>.json` file per key

use crate::core::error::StoreError;
use crate::storage::BlobStore;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Blob store writing each key to `<root>/<key>.json`
///
/// Writes go to a temporary sibling file first and are renamed into place,
/// so a crash never leaves a half-written blob behind.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    /// Use `root` as the storage directory, creating it if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            StoreError::storage(format!("cannot create {}: {}", root.display(), e))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::storage(format!("invalid storage key '{}'", key)));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::storage(format!(
                "cannot read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&self, key: &str, blob: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, blob)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| StoreError::storage(format!("cannot write {}: {}", path.display(), e)))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::storage(format!(
                "cannot remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
