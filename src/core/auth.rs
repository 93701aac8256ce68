//! Session and user directory abstractions
//!
//! Per-user stores ask a [`SessionProvider`] for the acting user before
//! building a request. The auth store implements it on top of a
//! [`UserDirectory`], the service that checks credentials.

use crate::core::error::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

/// A signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Source of the acting user for per-user stores
pub trait SessionProvider: Send + Sync {
    /// Id of the signed-in user, or None when nobody is signed in
    fn current_user_id(&self) -> Option<String>;

    fn is_authenticated(&self) -> bool {
        self.current_user_id().is_some()
    }
}

/// Session that never has a user (shared catalogs)
pub struct NoSession;

impl SessionProvider for NoSession {
    fn current_user_id(&self) -> Option<String> {
        None
    }
}

/// Session whose user is set directly
///
/// Useful in tests and tools that act on behalf of a known user without
/// going through a login.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    user_id: Arc<RwLock<Option<String>>>,
}

impl StaticSession {
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Arc::new(RwLock::new(Some(user_id.into()))),
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn set(&self, user_id: Option<String>) {
        *self.user_id.write().unwrap_or_else(PoisonError::into_inner) = user_id;
    }
}

impl SessionProvider for StaticSession {
    fn current_user_id(&self) -> Option<String> {
        self.user_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Service checking credentials and registering accounts
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Return the user for valid credentials
    ///
    /// Wrong credentials are an [`StoreError::Unauthenticated`] error.
    async fn authenticate(&self, email: &str, password: &str) -> Result<User, StoreError>;

    /// Create an account and return its user
    ///
    /// A taken email is a [`StoreError::Validation`] error on `email`.
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, StoreError>;
}
