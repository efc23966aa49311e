//! Stock tracking.

use clap::Subcommand;

use bakesnplates_admin::models::NewInventoryItem;
use bakesnplates_core::InventoryStatus;

use super::Context;

#[derive(Subcommand)]
pub enum InventoryAction {
    /// List inventory
    List {
        /// Only show items that need reordering
        #[arg(long)]
        low: bool,
    },
    /// Add an inventory item
    Add {
        #[arg(long)]
        name: String,
        /// Free-text quantity on hand, e.g. "10 kg"
        #[arg(long)]
        stock: String,
        /// Free-text reorder level, e.g. "5 kg"
        #[arg(long)]
        reorder: String,
        #[arg(long, default_value = "in stock")]
        status: InventoryStatus,
    },
}

/// # Errors
///
/// Returns an error if validation or the store operation fails.
pub async fn run(ctx: &Context, action: InventoryAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        InventoryAction::List { low } => {
            let snapshot = ctx.load().await?;
            for item in snapshot
                .inventory
                .iter()
                .filter(|item| !low || item.status.needs_reorder())
            {
                println!(
                    "{}  {:<20} {:>10} {:>10}  {}",
                    item.id, item.name, item.stock, item.reorder, item.status
                );
            }
        }
        InventoryAction::Add {
            name,
            stock,
            reorder,
            status,
        } => {
            ctx.load().await?;
            let item = ctx
                .data
                .add_inventory_item(NewInventoryItem::new(name, stock, reorder, status))
                .await?;
            println!("Added {} ({})", item.name, item.status);
        }
    }
    Ok(())
}
