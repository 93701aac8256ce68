//! Entity types of the rental and expense apps, with their stores

#[macro_use]
pub mod macros;

pub mod expense;
pub mod user;
pub mod vehicle;

pub use expense::{Expense, ExpenseDraft, ExpenseStore, ExpenseSummary, Period};
pub use user::{AuthStore, SessionState};
pub use vehicle::{Booking, BookingStatus, Vehicle, VehicleDraft, VehicleStore};
