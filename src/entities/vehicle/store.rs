//! Vehicle list store with the booking ledger

use super::booking::{Booking, BookingLedger, BookingStatus, quote};
use super::catalog::demo_fleet;
use super::model::Vehicle;
use crate::config::{AppConfig, StorageSlot};
use crate::core::auth::SessionProvider;
use crate::core::error::StoreError;
use crate::core::events::{BookingEvent, EventBus};
use crate::core::{Entity, EntitySource};
use crate::list::ListStore;
use crate::storage::{BlobStore, InMemoryEntitySource, PersistentCell};
use chrono::{DateTime, Utc};
use std::ops::Deref;
use std::sync::Arc;
use uuid::Uuid;

/// Store behind the vehicle browser, detail and booking screens
///
/// Dereferences to the underlying [`ListStore<Vehicle>`] for search, filters,
/// sort, bookmarks and recently viewed. Bookings live in their own persisted
/// ledger and report failures through the list's error slot.
#[derive(Clone)]
pub struct VehicleStore {
    list: ListStore<Vehicle>,
    ledger: Arc<PersistentCell<BookingLedger>>,
}

impl Deref for VehicleStore {
    type Target = ListStore<Vehicle>;

    fn deref(&self) -> &Self::Target {
        &self.list
    }
}

impl VehicleStore {
    /// Wrap an existing list store, loading the ledger from `slot`
    pub fn new(list: ListStore<Vehicle>, storage: Arc<dyn BlobStore>, slot: &StorageSlot) -> Self {
        let ledger = PersistentCell::load(storage, slot.storage_key.clone(), slot.storage_version);
        Self {
            list,
            ledger: Arc::new(ledger),
        }
    }

    /// Build the store over `source` with the settings in `config`
    pub fn with_source(
        source: Arc<dyn EntitySource<Vehicle>>,
        config: &AppConfig,
        storage: Arc<dyn BlobStore>,
        session: Arc<dyn SessionProvider>,
        events: EventBus,
    ) -> Self {
        let list = ListStore::builder(source)
            .storage(Arc::clone(&storage))
            .session(session)
            .events(events)
            .config(config.vehicles.clone())
            .build();
        Self::new(list, storage, &config.bookings)
    }

    /// Build the store over the bundled demo fleet
    pub fn demo(
        config: &AppConfig,
        storage: Arc<dyn BlobStore>,
        session: Arc<dyn SessionProvider>,
        events: EventBus,
    ) -> Self {
        let source = Arc::new(InMemoryEntitySource::with_entities(demo_fleet()));
        Self::with_source(source, config, storage, session, events)
    }

    pub fn list(&self) -> &ListStore<Vehicle> {
        &self.list
    }

    /// Distinct vehicle locations in collection order
    pub fn locations(&self) -> Vec<String> {
        let mut locations: Vec<String> = Vec::new();
        for vehicle in self.list.entities() {
            if !locations.contains(&vehicle.location) {
                locations.push(vehicle.location);
            }
        }
        locations
    }

    // === Bookings ===

    /// Book `vehicle_id` for the signed-in user
    ///
    /// The vehicle must be in the loaded collection. Returns the confirmed
    /// booking, or None with the failure in the error slot.
    pub fn create_booking(
        &self,
        vehicle_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Option<Booking> {
        match self.prepare_booking(vehicle_id, start, end) {
            Ok(booking) => {
                self.ledger.update(|ledger| ledger.prepend(booking.clone()));
                self.list.settle();
                tracing::info!(
                    booking_id = %booking.id,
                    vehicle_id,
                    total_cost = booking.total_cost,
                    "booking created"
                );
                self.list.events().publish(BookingEvent::Created {
                    booking_id: booking.id.clone(),
                    vehicle_id: booking.vehicle_id.clone(),
                    total_cost: booking.total_cost,
                });
                Some(booking)
            }
            Err(e) => {
                self.list.raise(e);
                None
            }
        }
    }

    fn prepare_booking(
        &self,
        vehicle_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Booking, StoreError> {
        let user_id = self
            .list
            .session()
            .current_user_id()
            .ok_or_else(StoreError::unauthenticated)?;
        let vehicle = self
            .list
            .find(vehicle_id)
            .ok_or_else(|| StoreError::not_found(Vehicle::resource_name_singular(), vehicle_id))?;
        if end <= start {
            return Err(StoreError::validation(
                "endTime",
                "End time must be after start time",
            ));
        }

        Ok(Booking {
            id: Uuid::new_v4().to_string(),
            vehicle_id: vehicle.id,
            user_id,
            start_time: start,
            end_time: end,
            total_cost: quote(vehicle.hourly_rate, start, end),
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
        })
    }

    /// Cancel a booking; returns whether it existed
    pub fn cancel_booking(&self, booking_id: &str) -> bool {
        let cancelled = self.ledger.update(|ledger| ledger.cancel(booking_id));
        if cancelled {
            tracing::info!(booking_id, "booking cancelled");
            self.list.events().publish(BookingEvent::Cancelled {
                booking_id: booking_id.to_string(),
            });
        } else {
            tracing::debug!(booking_id, "cancel ignored for unknown booking");
        }
        cancelled
    }

    /// Bookings in ledger order, most recently created first
    pub fn bookings(&self) -> Vec<Booking> {
        self.ledger.read(|ledger| ledger.bookings.clone())
    }

    /// Bookings sorted by `createdAt`, newest first
    pub fn booking_history(&self) -> Vec<Booking> {
        self.ledger.read(BookingLedger::history)
    }

    pub fn find_booking(&self, booking_id: &str) -> Option<Booking> {
        self.ledger
            .read(|ledger| ledger.bookings.iter().find(|b| b.id == booking_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::{NoSession, StaticSession};
    use crate::storage::InMemoryBlobStore;
    use chrono::Duration;

    fn store(session: Arc<dyn SessionProvider>) -> VehicleStore {
        VehicleStore::demo(
            &AppConfig::default_config(),
            Arc::new(InMemoryBlobStore::new()),
            session,
            EventBus::default(),
        )
    }

    #[tokio::test]
    async fn test_locations_distinct_in_order() {
        let store = store(Arc::new(NoSession));
        store.fetch_all().await;
        let locations = store.locations();
        assert_eq!(locations.len(), 8);
        assert_eq!(locations[0], "San Francisco");
    }

    #[tokio::test]
    async fn test_booking_requires_user() {
        let store = store(Arc::new(NoSession));
        store.fetch_all().await;
        let start = Utc::now();
        assert!(store.create_booking("1", start, start + Duration::hours(2)).is_none());
        assert!(matches!(store.error(), Some(StoreError::Unauthenticated { .. })));
        assert!(store.bookings().is_empty());
    }

    #[tokio::test]
    async fn test_booking_success_clears_error() {
        let store = store(Arc::new(StaticSession::signed_in("u1")));
        store.fetch_all().await;
        let start = Utc::now();

        assert!(store.create_booking("1", start, start).is_none());
        assert!(matches!(store.error(), Some(StoreError::Validation { .. })));

        let booking = store
            .create_booking("1", start, start + Duration::minutes(90))
            .expect("booking should be created");
        assert!(store.error().is_none());
        assert_eq!(booking.total_cost, 50.0);
        assert_eq!(booking.user_id, "u1");
        assert_eq!(store.find_booking(&booking.id), Some(booking));
    }
}
