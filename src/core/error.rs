//! Typed error handling for shelf stores
//!
//! Every store action catches its own failure and parks it in the store's
//! single error slot as a [`StoreError`]. Views read the slot after an action
//! completes and decide how to present it through [`StoreError::display_hint`].
//!
//! # Error Categories
//!
//! - [`StoreError::Validation`]: a draft failed validation before any request
//! - [`StoreError::NotFound`]: a lookup found no matching entity
//! - [`StoreError::Transport`]: the entity source failed or answered with an error status
//! - [`StoreError::Unauthenticated`]: the acting user is absent from the session
//! - [`StoreError::Storage`]: the durable blob store failed
//! - [`StoreError::Internal`]: serialization bugs that should not happen
//!
//! # Example
//!
//! ```rust,ignore
//! store.create(&draft).await;
//! match store.error() {
//!     Some(StoreError::Validation { field, message }) => show_inline(&field, &message),
//!     Some(err) if err.display_hint() == ErrorDisplay::Banner => show_banner(&err.to_string()),
//!     _ => {}
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

/// The main error type for shelf stores
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// A draft violated a validation rule; no request was issued
    #[error("{message}")]
    Validation { field: String, message: String },

    /// No entity with the given id exists
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: String },

    /// The entity source call failed or returned an error status
    #[error("Failed to {operation} {entity_type}: {message}")]
    Transport {
        entity_type: String,
        operation: String,
        message: String,
        status: Option<u16>,
    },

    /// The action needs a signed-in user and there is none
    #[error("{message}")]
    Unauthenticated { message: String },

    /// The durable blob store failed
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Broad category of a [`StoreError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Transport,
    Authentication,
    Storage,
    Internal,
}

/// How a view should surface an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorDisplay {
    /// Inline message next to the control that triggered the action
    Inline,
    /// Dismissible banner
    Banner,
}

/// Error payload handed to views and event subscribers
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// How the message should be presented
    pub display: ErrorDisplay,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl StoreError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    pub fn transport(
        entity_type: impl Into<String>,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        StoreError::Transport {
            entity_type: entity_type.into(),
            operation: operation.into(),
            message: message.into(),
            status: None,
        }
    }

    pub fn unauthenticated() -> Self {
        StoreError::Unauthenticated {
            message: "User not authenticated".to_string(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        StoreError::Storage {
            message: message.into(),
        }
    }

    /// Attach an HTTP status to a transport error
    pub fn with_status(mut self, code: u16) -> Self {
        if let StoreError::Transport { status, .. } = &mut self {
            *status = Some(code);
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Validation { .. } => ErrorKind::Validation,
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::Transport { .. } => ErrorKind::Transport,
            StoreError::Unauthenticated { .. } => ErrorKind::Authentication,
            StoreError::Storage { .. } => ErrorKind::Storage,
            StoreError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::Validation { .. } => "VALIDATION_ERROR",
            StoreError::NotFound { .. } => "ENTITY_NOT_FOUND",
            StoreError::Transport { .. } => "TRANSPORT_ERROR",
            StoreError::Unauthenticated { .. } => "UNAUTHENTICATED",
            StoreError::Storage { .. } => "STORAGE_ERROR",
            StoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Validation, not-found and authentication errors belong next to the
    /// triggering control; the rest are banners.
    pub fn display_hint(&self) -> ErrorDisplay {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::NotFound | ErrorKind::Authentication => {
                ErrorDisplay::Inline
            }
            ErrorKind::Transport | ErrorKind::Storage | ErrorKind::Internal => {
                ErrorDisplay::Banner
            }
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            display: self.display_hint(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            StoreError::Validation { field, .. } => Some(serde_json::json!({ "field": field })),
            StoreError::NotFound { entity_type, id } => Some(serde_json::json!({
                "entity_type": entity_type,
                "id": id
            })),
            StoreError::Transport {
                status: Some(status),
                ..
            } => Some(serde_json::json!({ "status": status })),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Internal(format!("serialization failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_user_facing() {
        let err = StoreError::validation("amount", "amount must be positive");
        assert_eq!(err.to_string(), "amount must be positive");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.display_hint(), ErrorDisplay::Inline);
    }

    #[test]
    fn test_not_found_display() {
        let err = StoreError::not_found("expense", "42");
        assert_eq!(err.to_string(), "expense with id '42' not found");
        assert_eq!(err.error_code(), "ENTITY_NOT_FOUND");
    }

    #[test]
    fn test_transport_with_status() {
        let err = StoreError::transport("expenses", "list", "server answered 500").with_status(500);
        assert_eq!(err.display_hint(), ErrorDisplay::Banner);
        let response = err.to_response();
        assert_eq!(response.code, "TRANSPORT_ERROR");
        assert_eq!(response.details, Some(serde_json::json!({ "status": 500 })));
    }

    #[test]
    fn test_with_status_ignores_other_kinds() {
        let err = StoreError::storage("disk full").with_status(500);
        assert_eq!(err, StoreError::storage("disk full"));
    }

    #[test]
    fn test_unauthenticated() {
        let err = StoreError::unauthenticated();
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(err.to_string(), "User not authenticated");
    }
}
