//! Vehicle browser flows over the demo fleet: filters, sorting, bookmarks
//! and bookings.

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

use shelf::config::AppConfig;
use shelf::core::{
    BookingEvent, EventBus, FilterPatch, SortDirective, StaticSession, StoreError, StoreEvent,
};
use shelf::entities::{BookingStatus, VehicleStore};
use shelf::storage::InMemoryBlobStore;

async fn loaded(session: StaticSession) -> VehicleStore {
    let store = VehicleStore::demo(
        &AppConfig::default_config(),
        Arc::new(InMemoryBlobStore::new()),
        Arc::new(session),
        EventBus::default(),
    );
    assert!(store.fetch_all().await);
    store
}

fn visible_ids(store: &VehicleStore) -> Vec<String> {
    store.visible().into_iter().map(|v| v.id).collect()
}

// ===========================================================================
// Browsing
// ===========================================================================

#[tokio::test]
async fn test_demo_fleet_loads_in_order() {
    let store = loaded(StaticSession::signed_out()).await;
    assert_eq!(visible_ids(&store), vec!["1", "2", "3", "4", "5", "6", "7", "8"]);
    assert!(!store.is_busy());
}

#[tokio::test]
async fn test_search_matches_name_and_type() {
    let store = loaded(StaticSession::signed_out()).await;

    store.set_search_query("tesla");
    assert_eq!(visible_ids(&store), vec!["1"]);

    store.set_search_query("suv");
    assert_eq!(visible_ids(&store), vec!["2", "6"]);
}

#[tokio::test]
async fn test_price_range_filters_both_apply() {
    let store = loaded(StaticSession::signed_out()).await;

    store.set_filter_options(FilterPatch::new().set("minPrice", 20_i64).set("maxPrice", 25_i64));
    assert_eq!(visible_ids(&store), vec!["1", "4", "6", "7"]);

    store.set_filter_options(FilterPatch::new().clear("minPrice"));
    assert_eq!(visible_ids(&store), vec!["1", "2", "4", "5", "6", "7"]);
}

#[tokio::test]
async fn test_type_and_seating_filters() {
    let store = loaded(StaticSession::signed_out()).await;

    store.set_filter_options(FilterPatch::new().set("vehicleType", "Sedan"));
    assert_eq!(visible_ids(&store), vec!["1", "3", "5"]);

    store.set_filter_options(FilterPatch::new().clear("vehicleType").set("seatingCapacity", 5_i64));
    assert_eq!(visible_ids(&store), vec!["1", "2", "3", "4", "5", "7"]);

    store.set_filter_options(FilterPatch::new().set("location", "Miami"));
    assert!(visible_ids(&store).is_empty());
}

#[tokio::test]
async fn test_sort_by_price_rating_and_availability() {
    let store = loaded(StaticSession::signed_out()).await;

    store.set_sort("price");
    assert_eq!(visible_ids(&store), vec!["5", "2", "7", "4", "6", "1", "8", "3"]);

    store.set_sort_directive(Some(SortDirective::desc("rating")));
    assert_eq!(visible_ids(&store)[..3], ["8", "1", "3"]);

    // Unavailable vehicles sort first ascending, keeping fleet order
    store.set_sort("availability");
    assert_eq!(visible_ids(&store), vec!["3", "7", "1", "2", "4", "5", "6", "8"]);
}

#[tokio::test]
async fn test_reset_restores_fleet() {
    let store = loaded(StaticSession::signed_out()).await;
    store.set_search_query("bmw");
    store.set_filter_options(FilterPatch::new().set("minPrice", 100_i64));
    store.set_sort("rating");

    store.reset_filters();
    assert_eq!(visible_ids(&store).len(), 8);
    assert!(store.criteria().sort.is_none());
}

#[tokio::test]
async fn test_locations() {
    let store = loaded(StaticSession::signed_out()).await;
    let locations = store.locations();
    assert_eq!(locations.first().map(String::as_str), Some("San Francisco"));
    assert_eq!(locations.last().map(String::as_str), Some("Miami"));
}

#[tokio::test]
async fn test_bookmarks_resolve_against_filtered_fleet() {
    let store = loaded(StaticSession::signed_out()).await;
    store.toggle_bookmark("8");
    store.toggle_bookmark("2");

    // Bookmarks ignore the visible list
    store.set_search_query("tesla");
    let names: Vec<String> = store.bookmarked_entities().into_iter().map(|v| v.name).collect();
    assert_eq!(names, vec!["Mazda MX-5 Miata", "Toyota RAV4"]);
}

#[tokio::test]
async fn test_select_and_fetch_by_id() {
    let store = loaded(StaticSession::signed_out()).await;

    assert_eq!(store.select("4").map(|v| v.name).as_deref(), Some("Ford F-150"));
    assert_eq!(store.selected().map(|v| v.id).as_deref(), Some("4"));

    assert!(store.select("99").is_none());
    assert!(store.selected().is_none());

    let fetched = store.fetch_by_id("6").await.expect("vehicle 6 exists");
    assert_eq!(fetched.location, "Denver");
    assert!(store.fetch_by_id("99").await.is_none());
    assert_eq!(store.error(), Some(StoreError::not_found("vehicle", "99")));
}

// ===========================================================================
// Bookings
// ===========================================================================

#[tokio::test]
async fn test_booking_cost_and_ledger_order() {
    let store = loaded(StaticSession::signed_in("1")).await;
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();

    let first = store
        .create_booking("5", start, start + Duration::hours(3))
        .expect("booking should be created");
    assert_eq!(first.total_cost, 45.0);
    assert_eq!(first.status, BookingStatus::Confirmed);
    assert_eq!(first.vehicle_id, "5");

    // Partial hours are billed in full
    let second = store
        .create_booking("8", start, start + Duration::minutes(61))
        .expect("booking should be created");
    assert_eq!(second.total_cost, 56.0);

    let ids: Vec<String> = store.bookings().into_iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![second.id.clone(), first.id.clone()]);
    assert!(store.booking_history().iter().all(|b| b.user_id == "1"));
}

#[tokio::test]
async fn test_unavailable_vehicle_can_still_be_booked() {
    let store = loaded(StaticSession::signed_in("1")).await;
    let start = Utc::now();
    let booking = store.create_booking("3", start, start + Duration::hours(1));
    assert_eq!(booking.map(|b| b.total_cost), Some(30.0));
}

#[tokio::test]
async fn test_booking_failures() {
    let store = loaded(StaticSession::signed_in("1")).await;
    let start = Utc::now();

    assert!(store.create_booking("42", start, start + Duration::hours(1)).is_none());
    assert_eq!(store.error(), Some(StoreError::not_found("vehicle", "42")));

    assert!(store.create_booking("1", start, start - Duration::hours(1)).is_none());
    assert_eq!(
        store.error(),
        Some(StoreError::validation("endTime", "End time must be after start time"))
    );
    assert!(store.bookings().is_empty());
}

#[tokio::test]
async fn test_booking_needs_loaded_collection() {
    let store = VehicleStore::demo(
        &AppConfig::default_config(),
        Arc::new(InMemoryBlobStore::new()),
        Arc::new(StaticSession::signed_in("1")),
        EventBus::default(),
    );
    let start = Utc::now();
    assert!(store.create_booking("1", start, start + Duration::hours(1)).is_none());
    assert!(matches!(store.error(), Some(StoreError::NotFound { .. })));
}

#[tokio::test]
async fn test_cancel_booking_and_events() {
    let events = EventBus::default();
    let store = VehicleStore::demo(
        &AppConfig::default_config(),
        Arc::new(InMemoryBlobStore::new()),
        Arc::new(StaticSession::signed_in("1")),
        events.clone(),
    );
    store.fetch_all().await;
    let mut rx = events.subscribe();

    let start = Utc::now();
    let booking = store
        .create_booking("2", start, start + Duration::hours(2))
        .expect("booking should be created");
    assert!(store.cancel_booking(&booking.id));
    assert!(!store.cancel_booking("no-such-booking"));

    let cancelled = store.find_booking(&booking.id).unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert!(!cancelled.is_active());

    let mut seen = Vec::new();
    while let Ok(envelope) = rx.try_recv() {
        seen.push(envelope.event);
    }
    assert_eq!(
        seen,
        vec![
            StoreEvent::Booking(BookingEvent::Created {
                booking_id: booking.id.clone(),
                vehicle_id: "2".to_string(),
                total_cost: 36.0,
            }),
            StoreEvent::Booking(BookingEvent::Cancelled {
                booking_id: booking.id.clone(),
            }),
        ]
    );
}
