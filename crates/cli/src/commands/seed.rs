//! Seed empty collections with the starter menu, customers, orders and stock.

use tracing::{info, warn};

use super::Context;

/// Seed whatever is empty, then report the resulting counts.
///
/// # Errors
///
/// Returns an error if the collections cannot be read back.
pub async fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let report = ctx.data.ensure_seeded().await;
    if !report.is_complete() {
        warn!(failed = ?report.failed, "Some collections could not be seeded");
    }
    info!(seeded = ?report.seeded, skipped = ?report.skipped, "Seeding finished");

    let snapshot = ctx.load().await?;
    println!("Seeded:  {}", list_or_none(&report.seeded));
    println!("Skipped: {}", list_or_none(&report.skipped));
    if !report.failed.is_empty() {
        println!("Failed:  {}", report.failed.join(", "));
    }
    println!(
        "Store now holds {} products, {} customers, {} orders, {} inventory items",
        snapshot.products.len(),
        snapshot.customers.len(),
        snapshot.orders.len(),
        snapshot.inventory.len(),
    );
    Ok(())
}

fn list_or_none(collections: &[&str]) -> String {
    if collections.is_empty() {
        "none".to_string()
    } else {
        collections.join(", ")
    }
}
