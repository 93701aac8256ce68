//! Validation and filtering system
//!
//! Drafts are normalized by filters and then checked by per-field validator
//! chains before a store issues any request. Entity types declare their
//! rules with the [`draft_rules!`](crate::draft_rules) macro or by building a
//! [`DraftRules`] by hand.

pub mod config;
pub mod filters;
pub mod validators;

pub use config::DraftRules;
