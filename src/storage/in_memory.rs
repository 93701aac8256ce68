//! In-memory implementations for testing, demos and the bundled catalog

use crate::core::auth::{User, UserDirectory};
use crate::core::error::StoreError;
use crate::core::{Entity, EntitySource};
use crate::storage::BlobStore;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

fn lock_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::Internal(format!("Failed to acquire lock: {}", e))
}

// ---------------------------------------------------------------------------
// Entity source
// ---------------------------------------------------------------------------

struct SourceState<T> {
    entities: Vec<T>,
    next_id: u64,
    failure: Option<String>,
}

/// In-memory entity source
///
/// Keeps insertion order, assigns sequential string ids ("1", "2", ...) to
/// created entities and can be switched into a failing mode to exercise
/// error paths. Every call is counted, including failing ones.
#[derive(Clone)]
pub struct InMemoryEntitySource<T: Entity> {
    state: Arc<RwLock<SourceState<T>>>,
    requests: Arc<AtomicUsize>,
}

impl<T: Entity> InMemoryEntitySource<T> {
    /// Create an empty source
    pub fn new() -> Self {
        Self::with_entities(Vec::new())
    }

    /// Create a source seeded with entities
    ///
    /// Ids assigned later continue after the highest numeric seeded id.
    pub fn with_entities(entities: Vec<T>) -> Self {
        let next_id = entities
            .iter()
            .filter_map(|e| e.id().parse::<u64>().ok())
            .max()
            .map_or(1, |max| max + 1);
        Self {
            state: Arc::new(RwLock::new(SourceState {
                entities,
                next_id,
                failure: None,
            })),
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make every following call fail with a transport error (None heals)
    pub fn set_failing(&self, message: Option<String>) {
        if let Ok(mut state) = self.state.write() {
            state.failure = message;
        }
    }

    /// Number of calls received so far
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Current contents, bypassing the request counter
    pub fn snapshot(&self) -> Vec<T> {
        self.state
            .read()
            .map(|state| state.entities.clone())
            .unwrap_or_default()
    }

    fn begin(&self, operation: &str) -> Result<(), StoreError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read().map_err(lock_error)?;
        match &state.failure {
            Some(message) => {
                Err(StoreError::transport(T::resource_name(), operation, message.clone())
                    .with_status(500))
            }
            None => Ok(()),
        }
    }
}

impl<T: Entity> Default for InMemoryEntitySource<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> EntitySource<T> for InMemoryEntitySource<T> {
    async fn list(&self, owner: Option<&str>) -> Result<Vec<T>, StoreError> {
        self.begin("list")?;
        let state = self.state.read().map_err(lock_error)?;

        Ok(state
            .entities
            .iter()
            .filter(|entity| owner.is_none_or(|o| entity.owner_id() == Some(o)))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<T>, StoreError> {
        self.begin("get")?;
        let state = self.state.read().map_err(lock_error)?;

        Ok(state.entities.iter().find(|e| e.id() == id).cloned())
    }

    async fn create(&self, payload: Value) -> Result<T, StoreError> {
        self.begin("create")?;
        let mut state = self.state.write().map_err(lock_error)?;

        let Value::Object(mut record) = payload else {
            return Err(StoreError::transport(
                T::resource_name(),
                "create",
                "payload must be a JSON object",
            )
            .with_status(400));
        };
        record.insert("id".to_string(), Value::String(state.next_id.to_string()));
        record
            .entry("createdAt")
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));

        let entity: T = serde_json::from_value(Value::Object(record)).map_err(|e| {
            StoreError::transport(T::resource_name(), "create", e.to_string()).with_status(400)
        })?;
        state.next_id += 1;
        state.entities.push(entity.clone());

        Ok(entity)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.begin("delete")?;
        let mut state = self.state.write().map_err(lock_error)?;

        state.entities.retain(|e| e.id() != id);

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Blob store
// ---------------------------------------------------------------------------

/// In-memory blob store
///
/// Clones share the same map, which lets tests "restart" a store by building
/// a new one over the same blob store.
#[derive(Clone, Default)]
pub struct InMemoryBlobStore {
    blobs: Arc<RwLock<HashMap<String, String>>>,
    failing: Arc<RwLock<bool>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make writes fail (reads keep working)
    pub fn set_failing(&self, failing: bool) {
        if let Ok(mut flag) = self.failing.write() {
            *flag = failing;
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.blobs
            .read()
            .map(|blobs| blobs.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        let failing = self.failing.read().map_err(lock_error)?;
        if *failing {
            return Err(StoreError::storage("blob store is read-only"));
        }
        Ok(())
    }
}

impl BlobStore for InMemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let blobs = self.blobs.read().map_err(lock_error)?;
        Ok(blobs.get(key).cloned())
    }

    fn set(&self, key: &str, blob: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut blobs = self.blobs.write().map_err(lock_error)?;
        blobs.insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut blobs = self.blobs.write().map_err(lock_error)?;
        blobs.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// User directory
// ---------------------------------------------------------------------------

struct Account {
    user: User,
    password: String,
}

/// In-memory user directory seeded with the demo account
///
/// Demo credentials: `user@example.com` / `password123`.
#[derive(Clone)]
pub struct InMemoryUserDirectory {
    accounts: Arc<RwLock<Vec<Account>>>,
}

impl InMemoryUserDirectory {
    pub const DEMO_EMAIL: &'static str = "user@example.com";
    pub const DEMO_PASSWORD: &'static str = "password123";

    /// Directory containing only the demo account
    pub fn new() -> Self {
        let demo = Account {
            user: User {
                id: "1".to_string(),
                email: Self::DEMO_EMAIL.to_string(),
                name: "John Doe".to_string(),
                phone: Some("555-123-4567".to_string()),
            },
            password: Self::DEMO_PASSWORD.to_string(),
        };
        Self {
            accounts: Arc::new(RwLock::new(vec![demo])),
        }
    }

    /// Directory with no accounts
    pub fn empty() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn authenticate(&self, email: &str, password: &str) -> Result<User, StoreError> {
        let accounts = self.accounts.read().map_err(lock_error)?;

        accounts
            .iter()
            .find(|a| a.user.email.eq_ignore_ascii_case(email) && a.password == password)
            .map(|a| a.user.clone())
            .ok_or_else(|| StoreError::Unauthenticated {
                message: "Invalid email or password".to_string(),
            })
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, StoreError> {
        let mut accounts = self.accounts.write().map_err(lock_error)?;

        if accounts
            .iter()
            .any(|a| a.user.email.eq_ignore_ascii_case(email))
        {
            return Err(StoreError::validation("email", "Email already in use"));
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.to_string(),
            phone: None,
        };
        accounts.push(Account {
            user: user.clone(),
            password: password.to_string(),
        });

        Ok(user)
    }
}
