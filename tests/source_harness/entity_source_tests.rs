//! Macro-generated test suite for `EntitySource<Note>` contract validation.
//!
//! The `entity_source_tests!` macro generates a test module that validates
//! any `EntitySource<Note>` implementation against the contract the list
//! stores rely on: source-assigned ids, owner scoping, missing ids and
//! overlapping requests.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod source_harness;
//!
//! use source_harness::*;
//! use shelf::storage::InMemoryEntitySource;
//!
//! entity_source_tests!(InMemoryEntitySource::<Note>::new());
//! ```
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_list_empty` - list on an empty source returns an empty vec
//! - `test_create_assigns_id` - created records get distinct, non-empty ids
//! - `test_create_then_get` - a created record can be fetched by its id
//! - `test_get_missing` - get with an unknown id returns None
//! - `test_delete_existing` - delete then get returns None
//! - `test_delete_missing` - deleting an unknown id succeeds
//!
//! ## Listing
//! - `test_list_returns_created` - list returns every created record
//! - `test_list_scoped_to_owner` - an owner only sees their own records
//!
//! ## Edge Cases
//! - `test_concurrent_creates` - overlapping creates all land with unique ids

/// Generate a full `EntitySource<Note>` conformance test suite.
///
/// `$factory` must be an expression that evaluates to a fresh, empty
/// instance implementing `EntitySource<Note>`. It is re-evaluated for each
/// test to ensure isolation.
#[macro_export]
macro_rules! entity_source_tests {
    ($factory:expr) => {
        mod entity_source_contract_tests {
            use super::*;
            use shelf::core::{Entity, EntitySource};
            use std::collections::HashSet;

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_list_empty() {
                let source = $factory;
                let all = source.list(None).await.unwrap();
                assert_count(&all, 0);
            }

            #[tokio::test]
            async fn test_create_assigns_id() {
                let source = $factory;
                let first = source.create(note_payload("u1", "First", 1)).await.unwrap();
                let second = source.create(note_payload("u1", "Second", 2)).await.unwrap();

                assert!(!first.id().is_empty());
                assert_ne!(first.id(), second.id());
                assert_eq!(first.title, "First");
                assert_eq!(first.user_id, "u1");
            }

            #[tokio::test]
            async fn test_create_then_get() {
                let source = $factory;
                let created = source.create(note_payload("u1", "Keep", 3)).await.unwrap();

                let fetched = source.get(created.id()).await.unwrap();
                assert_eq!(fetched, Some(created));
            }

            #[tokio::test]
            async fn test_get_missing() {
                let source = $factory;
                assert_eq!(source.get("does-not-exist").await.unwrap(), None);
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let source = $factory;
                let created = source.create(note_payload("u1", "Gone", 1)).await.unwrap();

                source.delete(created.id()).await.unwrap();
                assert_eq!(source.get(created.id()).await.unwrap(), None);
                assert_count(&source.list(None).await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_delete_missing() {
                let source = $factory;
                assert!(source.delete("does-not-exist").await.is_ok());
            }

            // ==================================================================
            // Listing
            // ==================================================================

            #[tokio::test]
            async fn test_list_returns_created() {
                let source = $factory;
                for i in 1..=5 {
                    source
                        .create(note_payload("u1", &format!("Note {}", i), i))
                        .await
                        .unwrap();
                }

                let all = source.list(None).await.unwrap();
                assert_count(&all, 5);
                let titles: HashSet<String> = all.into_iter().map(|n| n.title).collect();
                assert!(titles.contains("Note 1"));
                assert!(titles.contains("Note 5"));
            }

            #[tokio::test]
            async fn test_list_scoped_to_owner() {
                let source = $factory;
                source.create(note_payload("u1", "Mine", 1)).await.unwrap();
                source.create(note_payload("u2", "Theirs", 1)).await.unwrap();
                source.create(note_payload("u1", "Also mine", 2)).await.unwrap();

                let mine = source.list(Some("u1")).await.unwrap();
                assert_count(&mine, 2);
                assert!(mine.iter().all(|n| n.user_id == "u1"));

                let nobody = source.list(Some("u3")).await.unwrap();
                assert_count(&nobody, 0);
            }

            // ==================================================================
            // Edge Cases
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_creates() {
                let source = $factory;
                let (a, b, c) = futures::join!(
                    source.create(note_payload("u1", "A", 1)),
                    source.create(note_payload("u1", "B", 2)),
                    source.create(note_payload("u1", "C", 3)),
                );

                let ids: HashSet<String> = [a.unwrap(), b.unwrap(), c.unwrap()]
                    .iter()
                    .map(|n| n.id.clone())
                    .collect();
                assert_eq!(ids.len(), 3);
                assert_count(&source.list(None).await.unwrap(), 3);
            }
        }
    };
}
