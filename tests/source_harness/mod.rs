//! Shared test harness for entity source and list store testing
//!
//! Provides `Note`, a small owner-scoped entity implementing
//! `Entity + Listable` with attributes covering the common `FieldValue`
//! variants, plus payload builders, a gated source for ordering overlapping
//! requests, and assertion helpers.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod source_harness;
//! use source_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod entity_source_tests;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

use shelf::core::validation::DraftRules;
use shelf::core::{EntitySource, FieldValue, Listable, StoreError};
use shelf::{draft_rules, impl_entity};

// ---------------------------------------------------------------------------
// Note - owner-scoped test entity
// ---------------------------------------------------------------------------

/// A test entity owned by a user.
///
/// Fields:
/// - `title`: String, searchable
/// - `priority`: i64 (Integer variant)
/// - `score`: f64 (Float variant)
/// - `pinned`: bool (Boolean variant)
/// - unknown fields return `None`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub pinned: bool,
}

impl_entity!(Note, "note", "notes", owner: user_id);

/// Draft of a note; the store stamps `userId`
#[derive(Clone, Debug, Default, Serialize)]
pub struct NoteDraft {
    pub title: String,
    pub priority: String,
}

impl Listable for Note {
    type Draft = NoteDraft;

    fn searchable_values(&self) -> Vec<&str> {
        vec![&self.title]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "title" => Some(FieldValue::from(self.title.as_str())),
            "priority" => Some(FieldValue::Integer(self.priority)),
            "score" => Some(FieldValue::Float(self.score)),
            "pinned" => Some(FieldValue::Boolean(self.pinned)),
            _ => None,
        }
    }

    fn draft_rules() -> DraftRules {
        draft_rules!("note",
            validate: {
                "title": [required],
                "priority": [required, numeric, positive],
            },
            filters: {
                "title": [trim],
                "priority": [to_number],
            }
        )
    }

    fn owner_field() -> Option<&'static str> {
        Some("userId")
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn note(id: &str, owner: &str, title: &str, priority: i64) -> Note {
    Note {
        id: id.to_string(),
        user_id: owner.to_string(),
        title: title.to_string(),
        priority,
        score: priority as f64 / 2.0,
        pinned: priority % 2 == 0,
    }
}

/// JSON payload as a list store would send it to `create`
pub fn note_payload(owner: &str, title: &str, priority: i64) -> Value {
    json!({
        "userId": owner,
        "title": title,
        "priority": priority,
    })
}

pub fn note_draft(title: &str, priority: &str) -> NoteDraft {
    NoteDraft {
        title: title.to_string(),
        priority: priority.to_string(),
    }
}

// ---------------------------------------------------------------------------
// GatedSource - lets a test decide when each `list` call resolves
// ---------------------------------------------------------------------------

/// Entity source whose `list` responses are released by the test.
///
/// Call `n` (0-based) waits on gate `n`, then answers with `responses[n]`.
pub struct GatedSource {
    responses: Vec<Vec<Note>>,
    gates: Vec<Arc<Notify>>,
    calls: AtomicUsize,
}

impl GatedSource {
    pub fn new(responses: Vec<Vec<Note>>) -> Self {
        let gates = responses.iter().map(|_| Arc::new(Notify::new())).collect();
        Self {
            responses,
            gates,
            calls: AtomicUsize::new(0),
        }
    }

    /// Let call `n` resolve
    pub fn release(&self, n: usize) {
        self.gates[n].notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntitySource<Note> for GatedSource {
    async fn list(&self, _owner: Option<&str>) -> Result<Vec<Note>, StoreError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.gates[n].notified().await;
        Ok(self.responses[n].clone())
    }

    async fn get(&self, _id: &str) -> Result<Option<Note>, StoreError> {
        Ok(None)
    }

    async fn create(&self, _payload: Value) -> Result<Note, StoreError> {
        Err(StoreError::transport("notes", "create", "read-only source"))
    }

    async fn delete(&self, _id: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Assertions
// ---------------------------------------------------------------------------

/// Ids of `notes` in order
pub fn ids(notes: &[Note]) -> Vec<String> {
    notes.iter().map(|n| n.id.clone()).collect()
}

/// Assert that a list contains exactly `n` items.
pub fn assert_count<T>(list: &[T], expected: usize) {
    assert_eq!(
        list.len(),
        expected,
        "Expected {} items, got {}",
        expected,
        list.len()
    );
}

/// Assert that an error is a validation error on `field`.
pub fn assert_validation_error(err: &StoreError, field: &str) {
    match err {
        StoreError::Validation { field: f, .. } => assert_eq!(f, field),
        other => panic!("Expected validation error on '{}', got {:?}", field, other),
    }
}
