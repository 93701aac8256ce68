//! List state stores
//!
//! A [`ListStore`] holds an authoritative collection fetched from an
//! [`EntitySource`](crate::core::EntitySource), the criteria views edit, the
//! visible list derived from both, and a persisted subset of bookmarks.

pub mod persisted;
mod state;
pub mod store;

pub use persisted::Bookmarks;
pub use state::ListSnapshot;
pub use store::{ListStore, ListStoreBuilder};
