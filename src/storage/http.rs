//! REST entity source backed by `reqwest`
//!
//! Resource paths follow `T::resource_name()`:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | list      | `GET {base}/{resource}[?{owner_param}=<owner>]` |
//! | get       | `GET {base}/{resource}/{id}` (404 → `None`) |
//! | create    | `POST {base}/{resource}` with the draft JSON |
//! | delete    | `DELETE {base}/{resource}/{id}` (404 → success) |

use crate::config::ApiConfig;
use crate::core::error::StoreError;
use crate::core::{Entity, EntitySource};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::marker::PhantomData;
use std::time::Duration;

/// HTTP entity source for one resource
pub struct HttpEntitySource<T: Entity> {
    client: Client,
    base_url: String,
    owner_param: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> Clone for HttpEntitySource<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            owner_param: self.owner_param.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> HttpEntitySource<T> {
    /// Build a source from the `api` configuration section
    pub fn from_config(config: &ApiConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Internal(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, &config.base_url, &config.owner_param))
    }

    /// Build a source around an existing client
    pub fn with_client(client: Client, base_url: &str, owner_param: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            owner_param: owner_param.to_string(),
            _entity: PhantomData,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, T::resource_name())
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, T::resource_name(), id)
    }

    fn transport_error(operation: &str, e: reqwest::Error) -> StoreError {
        let err = StoreError::transport(T::resource_name(), operation, e.to_string());
        match e.status() {
            Some(status) => err.with_status(status.as_u16()),
            None => err,
        }
    }

    async fn check_status(operation: &str, response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = if body.is_empty() {
            format!("server answered {}", status)
        } else {
            format!("server answered {}: {}", status, body)
        };
        Err(StoreError::transport(T::resource_name(), operation, message).with_status(status.as_u16()))
    }
}

#[async_trait]
impl<T: Entity> EntitySource<T> for HttpEntitySource<T> {
    async fn list(&self, owner: Option<&str>) -> Result<Vec<T>, StoreError> {
        let mut request = self.client.get(self.collection_url());
        if let Some(owner) = owner {
            request = request.query(&[(self.owner_param.as_str(), owner)]);
        }

        tracing::debug!(resource = T::resource_name(), owner = ?owner, "GET collection");
        let response = request
            .send()
            .await
            .map_err(|e| Self::transport_error("list", e))?;
        let response = Self::check_status("list", response).await?;

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| Self::transport_error("list", e))
    }

    async fn get(&self, id: &str) -> Result<Option<T>, StoreError> {
        let response = self
            .client
            .get(self.item_url(id))
            .send()
            .await
            .map_err(|e| Self::transport_error("get", e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check_status("get", response).await?;

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| Self::transport_error("get", e))
    }

    async fn create(&self, payload: Value) -> Result<T, StoreError> {
        let response = self
            .client
            .post(self.collection_url())
            .json(&payload)
            .send()
            .await
            .map_err(|e| Self::transport_error("create", e))?;
        let response = Self::check_status("create", response).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| Self::transport_error("create", e))
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.item_url(id))
            .send()
            .await
            .map_err(|e| Self::transport_error("delete", e))?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(resource = T::resource_name(), id, "delete of unknown id");
            return Ok(());
        }
        Self::check_status("delete", response).await?;
        Ok(())
    }
}
