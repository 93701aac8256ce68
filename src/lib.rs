//! # shelf
//!
//! Client-side list state stores for apps that browse, search and edit a
//! remote collection of records.
//!
//! ## Features
//!
//! - **List Stores**: one [`ListStore`](list::ListStore) per entity type holding the fetched collection, the criteria and the derived visible list
//! - **Search, Filter, Sort**: free-text search, aliased filter keys and stable sorting driven by `Listable`
//! - **Draft Validation**: declarative validator and filter chains checked before any request
//! - **Persisted Subset**: bookmarks, recently viewed ids, bookings and the session survive restarts through a `BlobStore`
//! - **Pluggable Sources**: in-memory and REST (`http` feature) entity sources behind one async trait
//! - **Events**: every state change is broadcast on an [`EventBus`](core::EventBus)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shelf::prelude::*;
//!
//! let config = AppConfig::default_config();
//! let storage: Arc<dyn BlobStore> = Arc::new(FileBlobStore::open("./state")?);
//! let events = EventBus::new(config.events.capacity);
//!
//! let vehicles = VehicleStore::demo(&config, storage, Arc::new(NoSession), events);
//! vehicles.fetch_all().await;
//! vehicles.set_filter_options(FilterPatch::new().set("minPrice", 20.0));
//! vehicles.set_sort("price");
//!
//! for vehicle in vehicles.visible() {
//!     println!("{} ${}/h", vehicle.name, vehicle.hourly_rate);
//! }
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod list;
pub mod logging;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        auth::{NoSession, SessionProvider, StaticSession, User, UserDirectory},
        entity::{Entity, Listable},
        error::{ErrorDisplay, StoreError},
        events::{EventBus, EventEnvelope, StoreEvent},
        field::{FieldFormat, FieldValue},
        query::{Criteria, FilterPatch, SortDirection, SortDirective},
        service::EntitySource,
        store::QueryableStore,
        validation::DraftRules,
    };

    // === Macros ===
    pub use crate::{draft_rules, impl_entity};

    // === Stores ===
    pub use crate::entities::{
        AuthStore, Booking, BookingStatus, Expense, ExpenseDraft, ExpenseStore, ExpenseSummary,
        Period, Vehicle, VehicleDraft, VehicleStore,
    };
    pub use crate::list::{ListSnapshot, ListStore};

    // === Storage ===
    #[cfg(feature = "http")]
    pub use crate::storage::HttpEntitySource;
    pub use crate::storage::{
        BlobStore, FileBlobStore, InMemoryBlobStore, InMemoryEntitySource, InMemoryUserDirectory,
    };

    // === Config ===
    pub use crate::config::{AppConfig, FetchFailurePolicy, ListConfig};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, NaiveDate, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
}
