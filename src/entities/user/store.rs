//! Auth store: the signed-in user and the login and registration flows

use crate::config::{AppConfig, StorageSlot};
use crate::core::auth::{SessionProvider, User, UserDirectory};
use crate::core::error::StoreError;
use crate::core::events::{EventBus, EventEnvelope, SessionEvent};
use crate::core::validation::DraftRules;
use crate::storage::{BlobStore, PersistentCell};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// Persisted session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub is_authenticated: bool,
}

#[derive(Default)]
struct Status {
    in_flight: usize,
    error: Option<StoreError>,
}

struct Inner {
    directory: Arc<dyn UserDirectory>,
    session: PersistentCell<SessionState>,
    status: RwLock<Status>,
    events: EventBus,
}

/// Store owning the session
///
/// Like the list stores, actions report failures through a single error
/// slot instead of returning them. Clones share state, so a clone can be
/// handed to per-user stores as their [`SessionProvider`].
#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<Inner>,
}

fn login_rules() -> DraftRules {
    draft_rules!("login",
        validate: {
            "email": [required],
            "password": [required],
        },
        filters: {
            "email": [trim],
        }
    )
}

fn registration_rules() -> DraftRules {
    draft_rules!("registration",
        validate: {
            "name": [required],
            "email": [required, email],
            "password": [required, string_length(MIN_PASSWORD_LEN, usize::MAX)],
        },
        filters: {
            "name": [trim],
            "email": [trim],
        }
    )
}

impl AuthStore {
    /// Load the session persisted under `slot`
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        storage: Arc<dyn BlobStore>,
        slot: &StorageSlot,
        events: EventBus,
    ) -> Self {
        let session: PersistentCell<SessionState> =
            PersistentCell::load(storage, slot.storage_key.clone(), slot.storage_version);
        if let Some(user) = session.read(|s| s.user.clone()) {
            tracing::debug!(user_id = %user.id, "restored session");
        }
        Self {
            inner: Arc::new(Inner {
                directory,
                session,
                status: RwLock::new(Status::default()),
                events,
            }),
        }
    }

    pub fn from_config(
        directory: Arc<dyn UserDirectory>,
        config: &AppConfig,
        storage: Arc<dyn BlobStore>,
        events: EventBus,
    ) -> Self {
        Self::new(directory, storage, &config.auth, events)
    }

    fn status<R>(&self, f: impl FnOnce(&mut Status) -> R) -> R {
        let mut status = self
            .inner
            .status
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut status)
    }

    /// Sign in with email and password; returns true on success
    pub async fn login(&self, email: &str, password: &str) -> bool {
        let checked = login_rules().check(json!({ "email": email, "password": password }));
        let email = match checked {
            Ok(form) => form["email"].as_str().unwrap_or_default().to_string(),
            Err(e) => {
                self.fail("login", e);
                return false;
            }
        };

        self.status(|s| s.in_flight += 1);
        let result = self.inner.directory.authenticate(&email, password).await;
        self.finish("login", result)
    }

    /// Create an account and sign in with it; returns true on success
    pub async fn register(&self, name: &str, email: &str, password: &str) -> bool {
        let form = json!({ "name": name, "email": email, "password": password });
        let form = match registration_rules().check(form) {
            Ok(form) => form,
            Err(e) => {
                self.fail("register", e);
                return false;
            }
        };
        let name = form["name"].as_str().unwrap_or_default();
        let email = form["email"].as_str().unwrap_or_default();

        self.status(|s| s.in_flight += 1);
        let result = self.inner.directory.register(name, email, password).await;
        self.finish("register", result)
    }

    fn finish(&self, action: &str, result: Result<User, StoreError>) -> bool {
        self.status(|s| s.in_flight = s.in_flight.saturating_sub(1));
        match result {
            Ok(user) => {
                self.status(|s| s.error = None);
                self.inner.session.set(SessionState {
                    user: Some(user.clone()),
                    is_authenticated: true,
                });
                tracing::info!(action, user_id = %user.id, "signed in");
                self.inner
                    .events
                    .publish(SessionEvent::SignedIn { user_id: user.id });
                true
            }
            Err(e) => {
                self.fail(action, e);
                false
            }
        }
    }

    fn fail(&self, action: &str, err: StoreError) {
        tracing::warn!(action, code = err.error_code(), error = %err, "auth action failed");
        self.status(|s| s.error = Some(err.clone()));
        self.inner.events.publish(SessionEvent::ErrorRaised {
            code: err.error_code().to_string(),
            message: err.to_string(),
        });
    }

    /// Forget the signed-in user
    pub fn logout(&self) {
        let user_id = self.current_user_id();
        self.inner.session.set(SessionState::default());
        if let Some(user_id) = user_id {
            tracing::info!(user_id = %user_id, "signed out");
            self.inner.events.publish(SessionEvent::SignedOut);
        }
    }

    /// Clear the error slot and the busy flag
    pub fn clear_error(&self) {
        self.status(|s| {
            s.error = None;
            s.in_flight = 0;
        });
    }

    pub fn user(&self) -> Option<User> {
        self.inner.session.read(|s| s.user.clone())
    }

    pub fn session_state(&self) -> SessionState {
        self.inner.session.get()
    }

    pub fn is_busy(&self) -> bool {
        self.status(|s| s.in_flight > 0)
    }

    pub fn error(&self) -> Option<StoreError> {
        self.status(|s| s.error.clone())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.inner.events.subscribe()
    }
}

impl SessionProvider for AuthStore {
    fn current_user_id(&self) -> Option<String> {
        self.inner.session.read(|s| match (&s.user, s.is_authenticated) {
            (Some(user), true) => Some(user.id.clone()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{InMemoryBlobStore, InMemoryUserDirectory};

    fn store() -> AuthStore {
        AuthStore::new(
            Arc::new(InMemoryUserDirectory::new()),
            Arc::new(InMemoryBlobStore::new()),
            &StorageSlot::new("auth-storage"),
            EventBus::default(),
        )
    }

    #[tokio::test]
    async fn test_login_demo_account() {
        let store = store();
        assert!(store.login(" user@example.com ", "password123").await);
        assert_eq!(store.current_user_id(), Some("1".to_string()));
        assert!(store.session_state().is_authenticated);
        assert!(!store.is_busy());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let store = store();
        assert!(!store.login("user@example.com", "nope").await);
        assert_eq!(
            store.error().map(|e| e.to_string()),
            Some("Invalid email or password".to_string())
        );
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_rules() {
        let store = store();
        assert!(!store.register("Ann", "ann@example.com", "12345").await);
        assert_eq!(
            store.error(),
            Some(StoreError::validation("password", "password must be at least 6 characters"))
        );

        assert!(!store.register("Ann", "not-an-email", "123456").await);
        assert!(matches!(store.error(), Some(StoreError::Validation { ref field, .. }) if field == "email"));

        assert!(!store.register(" ", "ann@example.com", "123456").await);
        assert_eq!(store.error().map(|e| e.to_string()), Some("name is required".to_string()));

        assert!(store.register("Ann", "ann@example.com", "123456").await);
        assert!(store.error().is_none());
        assert_eq!(store.user().map(|u| u.name), Some("Ann".to_string()));
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let store = store();
        store.login("user@example.com", "password123").await;
        store.logout();
        assert_eq!(store.current_user_id(), None);
        assert_eq!(store.session_state(), SessionState::default());
    }
}
