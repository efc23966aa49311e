//! Dashboard overview.

use bakesnplates_admin::services::DashboardSummary;

use super::Context;

/// Print the headline figures and the most recent orders.
///
/// # Errors
///
/// Returns an error if the collections cannot be loaded.
pub async fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let summary = DashboardSummary::from_snapshot(&ctx.load().await?);

    println!("Revenue:         {}", summary.revenue);
    println!("Pending orders:  {}", summary.pending_orders);
    println!("Customers:       {}", summary.customers);
    println!("Low stock items: {}", summary.low_stock_items);
    println!();
    println!("Recent orders");
    for order in &summary.recent_orders {
        println!(
            "  {}  {:<20} {:<30} {:>12}  {}",
            order.date.format("%Y-%m-%d %H:%M"),
            order.customer,
            order.product,
            order.total,
            order.status,
        );
    }
    Ok(())
}
