//! Vehicle bookings and the persisted ledger that holds them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        };
        f.pad(s)
    }
}

/// A reservation of one vehicle by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub vehicle_id: String,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_cost: f64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn is_active(&self) -> bool {
        matches!(self.status, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

/// Cost of renting at `hourly_rate` from `start` to `end`
///
/// Started hours are billed in full and at least one hour is always billed.
pub fn quote(hourly_rate: f64, start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let seconds = (end - start).num_seconds().max(0) as f64;
    let hours = (seconds / 3600.0).ceil().max(1.0);
    hours * hourly_rate
}

/// Persisted list of bookings, newest insertion first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingLedger {
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

impl BookingLedger {
    pub fn prepend(&mut self, booking: Booking) {
        self.bookings.insert(0, booking);
    }

    /// Mark a booking cancelled; false when no booking has that id
    pub fn cancel(&mut self, id: &str) -> bool {
        match self.bookings.iter_mut().find(|b| b.id == id) {
            Some(booking) => {
                booking.status = BookingStatus::Cancelled;
                true
            }
            None => false,
        }
    }

    /// Bookings sorted by creation time, newest first
    pub fn history(&self) -> Vec<Booking> {
        let mut history = self.bookings.clone();
        history.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        history
    }
}
