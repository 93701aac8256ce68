//! Core module containing fundamental traits and types for the stores

pub mod auth;
pub mod entity;
pub mod error;
pub mod events;
pub mod field;
pub mod query;
pub mod service;
pub mod store;
pub mod validation;

pub use auth::{NoSession, SessionProvider, StaticSession, User, UserDirectory};
pub use entity::{Entity, Listable};
pub use error::{ErrorDisplay, ErrorKind, ErrorResponse, StoreError};
pub use events::{BookingEvent, EventBus, EventEnvelope, ListEvent, SessionEvent, StoreEvent};
pub use field::{FieldFormat, FieldValue};
pub use query::{
    Criteria, FilterOp, FilterOptions, FilterPatch, FilterRule, SortDirection, SortDirective,
};
pub use service::EntitySource;
pub use store::{QueryableStore, visible_list};
pub use validation::DraftRules;
