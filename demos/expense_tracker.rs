//! Expense tracker walk-through: sign in, add expenses, filter and summarize

use shelf::logging::init_tracing;
use shelf::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("shelf=debug")?;
    println!("💸 shelf expense tracker\n");

    let config = AppConfig::default_config();
    let storage: Arc<dyn BlobStore> = Arc::new(InMemoryBlobStore::new());
    let events = EventBus::new(config.events.capacity);

    // Print every event the stores raise
    let mut rx = events.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(envelope) = rx.recv().await {
            println!(
                "   📣 {}.{} {:?}",
                envelope.event.event_kind(),
                envelope.event.action(),
                envelope.event.resource()
            );
        }
    });

    let auth = AuthStore::from_config(
        Arc::new(InMemoryUserDirectory::new()),
        &config,
        Arc::clone(&storage),
        events.clone(),
    );
    let expenses = ExpenseStore::with_source(
        Arc::new(InMemoryEntitySource::<Expense>::new()),
        &config,
        Arc::clone(&storage),
        Arc::new(auth.clone()),
        events.clone(),
    );

    // Nobody is signed in yet
    expenses.fetch_all().await;
    println!("🔒 Before login: {:?}\n", expenses.error().map(|e| e.to_string()));
    expenses.clear_error();

    auth.login(InMemoryUserDirectory::DEMO_EMAIL, InMemoryUserDirectory::DEMO_PASSWORD)
        .await;
    expenses.fetch_all().await;

    let today = chrono::Local::now().date_naive();
    let drafts = [
        ExpenseDraft::new("12.50", "Food", "Lunch"),
        ExpenseDraft::new("50", "Bills", "Electricity"),
        ExpenseDraft::new("8", "Transport", "Bus pass").with_date(today - chrono::Duration::days(3)),
        ExpenseDraft::new("23.99", "Food", "Groceries").with_title("Weekly shop"),
    ];
    for draft in &drafts {
        if let Some(expense) = expenses.create(draft).await {
            println!("✅ Added #{} {} {:.2}", expense.id, expense.category, expense.amount);
        }
    }

    // Rejected before any request
    expenses.create(&ExpenseDraft::new("-5", "Food", "Refund")).await;
    println!("❌ {:?}\n", expenses.error().map(|e| e.to_string()));

    expenses.set_category(Some("Food"));
    expenses.newest_first();
    println!("🍔 Food only:");
    for e in expenses.visible() {
        println!("   {} {:<10} {:>7.2}", e.date, e.description, e.amount);
    }

    expenses.set_category(None);
    expenses.set_search_query("bus");
    println!("🔍 Search 'bus': {} result(s)", expenses.visible().len());
    expenses.reset_filters();

    let summary = expenses.summary(Period::Month, today);
    println!(
        "\n📊 {}: {} expense(s), total {:.2}, average {:.2}",
        Period::Month.label(),
        summary.count,
        summary.total,
        summary.average
    );
    for (category, total) in expenses.totals_by_category() {
        println!("   {:<10} {:>7.2}", category, total);
    }

    if let Some(first) = expenses.entities().first() {
        expenses.delete(&first.id).await;
        println!("\n🗑️  Deleted #{}, {} left", first.id, expenses.entities().len());
    }

    auth.logout();
    drop(expenses);
    drop(auth);
    drop(events);
    let _ = printer.await;

    Ok(())
}
