//! Expense list store scoped to the signed-in user

use super::model::Expense;
use super::summary::{self, ExpenseSummary, Period};
use crate::config::AppConfig;
use crate::core::auth::SessionProvider;
use crate::core::events::EventBus;
use crate::core::query::{FilterPatch, SortDirective};
use crate::core::EntitySource;
use crate::list::ListStore;
use crate::storage::BlobStore;
use chrono::NaiveDate;
use indexmap::IndexMap;
use std::ops::Deref;
use std::sync::Arc;

/// Category chip meaning "no category filter"
pub const ALL_CATEGORIES: &str = "All";

/// Store behind the expense list, add form and dashboard
///
/// Fetches and creates act for the session's user and fail with an
/// authentication error when nobody is signed in.
#[derive(Clone)]
pub struct ExpenseStore {
    list: ListStore<Expense>,
}

impl Deref for ExpenseStore {
    type Target = ListStore<Expense>;

    fn deref(&self) -> &Self::Target {
        &self.list
    }
}

impl ExpenseStore {
    pub fn new(list: ListStore<Expense>) -> Self {
        Self { list }
    }

    /// Build the store over `source` with the settings in `config`
    pub fn with_source(
        source: Arc<dyn EntitySource<Expense>>,
        config: &AppConfig,
        storage: Arc<dyn BlobStore>,
        session: Arc<dyn SessionProvider>,
        events: EventBus,
    ) -> Self {
        let list = ListStore::builder(source)
            .storage(storage)
            .session(session)
            .events(events)
            .config(config.expenses.clone())
            .build();
        Self::new(list)
    }

    pub fn list(&self) -> &ListStore<Expense> {
        &self.list
    }

    /// Show one category; `None` or `"All"` shows every category
    pub fn set_category(&self, category: Option<&str>) {
        let patch = match category {
            Some(c) if c != ALL_CATEGORIES => FilterPatch::new().set("category", c),
            _ => FilterPatch::new().clear("category"),
        };
        self.list.set_filter_options(patch);
    }

    /// Sort the visible list by date, newest first
    pub fn newest_first(&self) {
        self.list.set_sort_directive(Some(SortDirective::desc("date")));
    }

    /// Summary of the loaded expenses for `period` ending on `today`
    pub fn summary(&self, period: Period, today: NaiveDate) -> ExpenseSummary {
        ExpenseSummary::compute(&self.list.entities(), period, today)
    }

    /// Total spent per category across the loaded expenses
    pub fn totals_by_category(&self) -> IndexMap<String, f64> {
        summary::totals_by_category(&self.list.entities())
    }
}
