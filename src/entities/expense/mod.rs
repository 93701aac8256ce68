//! Personal expense tracking

pub mod model;
pub mod store;
pub mod summary;

pub use model::{CATEGORIES, DATE_FORMAT, Expense, ExpenseDraft};
pub use store::{ALL_CATEGORIES, ExpenseStore};
pub use summary::{ExpenseSummary, Period, totals_by_category};
