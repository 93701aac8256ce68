//! Vehicle rental entities: the fleet, bookings and their store

pub mod booking;
pub mod catalog;
pub mod model;
pub mod store;

pub use booking::{Booking, BookingLedger, BookingStatus, quote};
pub use catalog::demo_fleet;
pub use model::{FuelType, Vehicle, VehicleDraft, VehicleType};
pub use store::VehicleStore;
