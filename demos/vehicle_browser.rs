//! Vehicle browser walk-through: search, filters, sort, bookmarks and a booking

use chrono::Duration;
use shelf::logging::init_tracing;
use shelf::prelude::*;

fn print_visible(store: &VehicleStore, label: &str) {
    let visible = store.visible();
    println!("{} ({} of {}):", label, visible.len(), store.entities().len());
    for v in visible {
        println!(
            "   {:<18} {:<12} {:<14} ${:>5.2}/h  ★{}",
            v.name, v.vehicle_type, v.location, v.hourly_rate, v.rating
        );
    }
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("shelf=info")?;
    println!("🚗 shelf vehicle browser\n");

    let config = AppConfig::default_config();
    let storage: Arc<dyn BlobStore> = Arc::new(InMemoryBlobStore::new());
    let events = EventBus::new(config.events.capacity);

    // Sign in with the demo account
    let auth = AuthStore::from_config(
        Arc::new(InMemoryUserDirectory::new()),
        &config,
        Arc::clone(&storage),
        events.clone(),
    );
    auth.login(InMemoryUserDirectory::DEMO_EMAIL, InMemoryUserDirectory::DEMO_PASSWORD)
        .await;
    println!("👤 Signed in as {:?}\n", auth.user().map(|u| u.name));

    let vehicles = VehicleStore::demo(&config, Arc::clone(&storage), Arc::new(auth), events);
    vehicles.fetch_all().await;
    print_visible(&vehicles, "📋 Fleet");

    vehicles.set_search_query("suv");
    print_visible(&vehicles, "🔍 Search 'suv'");
    vehicles.set_search_query("");

    vehicles.set_filter_options(FilterPatch::new().set("minPrice", 20.0));
    vehicles.set_filter_options(FilterPatch::new().set("maxPrice", 28.0));
    vehicles.set_sort("price");
    print_visible(&vehicles, "💰 $20 to $28 per hour, cheapest first");

    vehicles.set_sort("price");
    print_visible(&vehicles, "💰 Same, most expensive first");
    vehicles.reset_filters();

    vehicles.toggle_bookmark("8");
    vehicles.toggle_bookmark("1");
    let bookmarked: Vec<String> = vehicles
        .bookmarked_entities()
        .into_iter()
        .map(|v| v.name)
        .collect();
    println!("🔖 Bookmarked: {:?}", bookmarked);

    if let Some(tesla) = vehicles.select("1") {
        println!("👀 Viewing {}: {}", tesla.name, tesla.features.join(", "));
    }

    let start = Utc::now() + Duration::days(1);
    match vehicles.create_booking("1", start, start + Duration::minutes(150)) {
        Some(booking) => println!(
            "✅ Booked vehicle {} for ${:.2} ({})",
            booking.vehicle_id, booking.total_cost, booking.status
        ),
        None => println!("❌ Booking failed: {:?}", vehicles.error()),
    }

    if vehicles.create_booking("1", start, start).is_none() {
        println!("❌ Rejected booking: {}", vehicles.error().map(|e| e.to_string()).unwrap_or_default());
        vehicles.clear_error();
    }

    println!("\n📍 Locations: {}", vehicles.locations().join(", "));
    println!("📚 {} booking(s) in history", vehicles.booking_history().len());

    Ok(())
}
