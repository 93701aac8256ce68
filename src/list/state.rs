//! In-memory state of a list store

use crate::core::error::StoreError;
use crate::core::query::Criteria;
use crate::core::{Listable, visible_list};
use serde::Serialize;
use std::collections::HashSet;

/// Mutable state behind a list store's lock
#[derive(Debug)]
pub(crate) struct ListState<T> {
    /// Authoritative collection, unique ids, source order
    pub entities: Vec<T>,
    /// Derived from `entities` and `criteria`, never edited directly
    pub visible: Vec<T>,
    pub criteria: Criteria,
    /// Requests issued in the current epoch and not yet resolved
    pub in_flight: usize,
    /// Bumped by `clear_error`; requests from an older epoch no longer count
    pub request_epoch: u64,
    pub error: Option<StoreError>,
    /// Sequence number of the most recently issued fetch
    pub latest_fetch: u64,
    pub selected: Option<String>,
}

impl<T: Listable> ListState<T> {
    pub fn new(criteria: Criteria) -> Self {
        Self {
            entities: Vec::new(),
            visible: Vec::new(),
            criteria,
            in_flight: 0,
            request_epoch: 0,
            error: None,
            latest_fetch: 0,
            selected: None,
        }
    }

    pub fn recompute(&mut self) {
        self.visible = visible_list(&self.entities, &self.criteria);
    }

    /// Replace the collection, keeping the first entity seen for each id
    pub fn replace_entities(&mut self, entities: Vec<T>) -> usize {
        let mut seen = HashSet::new();
        let before = entities.len();
        self.entities = entities
            .into_iter()
            .filter(|e| seen.insert(e.id().to_string()))
            .collect();
        before - self.entities.len()
    }

    /// Insert a created entity, replacing an entity with the same id in place
    pub fn upsert(&mut self, entity: T) {
        match self.entities.iter().position(|e| e.id() == entity.id()) {
            Some(pos) => self.entities[pos] = entity,
            None => self.entities.push(entity),
        }
    }

    /// Count a new request; returns the epoch it belongs to
    pub fn begin_request(&mut self) -> u64 {
        self.in_flight += 1;
        self.request_epoch
    }

    /// Settle a request begun in `epoch`
    pub fn finish_request(&mut self, epoch: u64) {
        if epoch == self.request_epoch {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
    }

    /// Forget every outstanding request
    pub fn reset_requests(&mut self) {
        self.in_flight = 0;
        self.request_epoch += 1;
    }

    pub fn snapshot(&self) -> ListSnapshot<T> {
        ListSnapshot {
            entities: self.entities.clone(),
            visible: self.visible.clone(),
            criteria: self.criteria.clone(),
            busy: self.in_flight > 0,
            error: self.error.clone(),
        }
    }
}

/// Consistent copy of a list store's observable state
#[derive(Debug, Clone, Serialize)]
pub struct ListSnapshot<T> {
    pub entities: Vec<T>,
    pub visible: Vec<T>,
    pub criteria: Criteria,
    pub busy: bool,
    #[serde(skip)]
    pub error: Option<StoreError>,
}

impl<T> ListSnapshot<T> {
    /// Error formatted for a view, if any
    pub fn error_response(&self) -> Option<crate::core::ErrorResponse> {
        self.error.as_ref().map(StoreError::to_response)
    }
}
