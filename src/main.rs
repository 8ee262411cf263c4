use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use slotdesk::api::{BookingApi, HttpClient};
use slotdesk::cli::{Args, Command};
use slotdesk::config::ClientConfig;
use slotdesk::grid::{SlotGrid, TapOutcome};
use slotdesk::registry::BoardRegistry;
use slotdesk::time::format_minutes;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = ClientConfig::from_env();
    slotdesk::observability::init(config.metrics_port)?;
    info!("api: {}", config.base_url);
    info!("  token: {}", if config.token.is_some() { "set" } else { "unset" });
    info!("  interior tap: {:?}", config.interior_tap);

    let api: Arc<dyn BookingApi> = Arc::new(HttpClient::new(&config)?);
    let registry = BoardRegistry::new(api.clone(), config.interior_tap);

    match args.command {
        Command::Services => {
            for s in api.list_services().await? {
                let state = if s.active { "" } else { "  (inactive)" };
                let location = s.location.as_deref().unwrap_or("-");
                println!("{:>6}  {}  [{location}]{state}", s.id, s.name);
            }
        }
        Command::Grid { service, date } => {
            let board = registry.get_or_create(service)?;
            let grid = board.refresh(date).await?;
            print_grid(&grid);
        }
        Command::Bookings { service, date } => {
            let board = registry.get_or_create(service)?;
            let bookings = board.bookings(date).await?;
            if bookings.is_empty() {
                println!("no bookings for service {service} on {date}");
            }
            for b in bookings {
                let slots: Vec<String> = b.slot_ids.iter().map(|s| s.to_string()).collect();
                println!(
                    "#{}  {}  slots [{}]  total {}  paid {}  {}",
                    b.id,
                    b.customer_name.as_deref().unwrap_or("-"),
                    slots.join(","),
                    b.total,
                    b.paid,
                    b.status
                );
            }
        }
        Command::Book(book) => {
            let (service, date) = (book.service, book.date);
            let board = registry.get_or_create(service)?;
            let grid = board.refresh(date).await?;
            print_grid(&grid);

            for &slot in &book.slots {
                let view = board.tap(slot).await?;
                if view.outcome == Some(TapOutcome::Ignored) {
                    warn!("slot {slot} is not bookable on {date}, skipped");
                }
            }
            let view = board.selection().await;
            let ids: Vec<String> = view.slot_ids.iter().map(|s| s.to_string()).collect();
            println!("selected [{}], total {}", ids.join(","), view.total);

            let confirmation = board.confirm(&book.draft()).await?;
            println!(
                "booking #{} created{}",
                confirmation.booking_id,
                confirmation.message.map(|m| format!(": {m}")).unwrap_or_default()
            );
        }
    }

    Ok(())
}

fn print_grid(grid: &SlotGrid) {
    println!("{}: {} slots, {} available", grid.date, grid.len(), grid.available_count());
    if grid.is_empty() {
        println!("  no slots configured");
    }
    for r in grid.slots() {
        println!(
            "  {}-{}  #{:<5} {:>9}  {}",
            format_minutes(r.start_minute),
            format_minutes(r.slot.end_minute()),
            r.id(),
            r.slot.price,
            r.status.as_str()
        );
    }
}
