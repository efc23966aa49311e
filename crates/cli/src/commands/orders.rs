//! Order entry and status changes.

use clap::Subcommand;

use bakesnplates_admin::models::NewOrder;
use bakesnplates_core::{OrderId, OrderStatus};

use super::{CommandError, Context};

#[derive(Subcommand)]
pub enum OrderAction {
    /// List orders, newest first
    List {
        /// Only show orders with this status
        #[arg(long)]
        status: Option<OrderStatus>,
    },
    /// Record an order
    Add {
        /// Customer name as it should appear on the order
        #[arg(long)]
        customer: String,
        /// Product line, e.g. "Bento Cake (x1)"
        #[arg(long)]
        product: String,
        /// Display total, e.g. "GH₵65.00"
        #[arg(long)]
        total: String,
        #[arg(long, default_value = "pending")]
        status: OrderStatus,
    },
    /// Change an order's status
    Status { id: String, status: OrderStatus },
}

/// # Errors
///
/// Returns an error if validation or the store operation fails.
pub async fn run(ctx: &Context, action: OrderAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        OrderAction::List { status } => {
            let snapshot = ctx.load().await?;
            for order in snapshot
                .orders
                .iter()
                .filter(|order| status.is_none_or(|status| order.status == status))
            {
                println!(
                    "{}  {}  {:<20} {:<30} {:>12}  {}",
                    order.id,
                    order.date.format("%Y-%m-%d %H:%M"),
                    order.customer,
                    order.product,
                    order.total,
                    order.status,
                );
            }
        }
        OrderAction::Add {
            customer,
            product,
            total,
            status,
        } => {
            ctx.load().await?;
            let order = ctx
                .data
                .place_order(NewOrder::new(customer, product, total, status))
                .await?;
            println!("Recorded order {} for {}", order.id, order.customer);
        }
        OrderAction::Status { id, status } => {
            let snapshot = ctx.load().await?;
            let id = OrderId::new(id);
            if snapshot.order(&id).is_none() {
                return Err(CommandError::NotFound {
                    kind: "order",
                    query: id.to_string(),
                }
                .into());
            }
            ctx.data.update_order_status(&id, status).await?;
            println!("Order {id} is now {status}");
        }
    }
    Ok(())
}
