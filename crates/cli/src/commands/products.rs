//! Menu management.

use clap::Subcommand;
use rust_decimal::Decimal;
use tracing::info;

use bakesnplates_admin::models::NewProduct;
use bakesnplates_core::ProductId;

use super::{CommandError, Context};

#[derive(Subcommand)]
pub enum ProductAction {
    /// List the menu
    List,
    /// Add a product
    Add {
        #[arg(long)]
        name: String,
        /// Price in cedis, e.g. 65.00
        #[arg(long)]
        price: Decimal,
    },
    /// Replace a product's name and price
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: Decimal,
    },
    /// Remove a product
    Delete { id: String },
}

/// # Errors
///
/// Returns an error if validation or the store operation fails.
pub async fn run(ctx: &Context, action: ProductAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ProductAction::List => {
            for product in &ctx.load().await?.products {
                println!("{}  {:<28} {:>12}", product.id, product.name, product.unit_price());
            }
        }
        ProductAction::Add { name, price } => {
            ctx.load().await?;
            let product = ctx.data.add_product(NewProduct::new(name, price)).await?;
            info!(id = %product.id, "Product added");
            println!("Added {} ({})", product.name, product.unit_price());
        }
        ProductAction::Update { id, name, price } => {
            ctx.load().await?;
            let product = ctx
                .data
                .update_product(&ProductId::new(id), NewProduct::new(name, price))
                .await?;
            println!("Updated {} ({})", product.name, product.unit_price());
        }
        ProductAction::Delete { id } => {
            ctx.load().await?;
            if !ctx.data.delete_product(&ProductId::new(id.clone())).await? {
                return Err(CommandError::NotFound {
                    kind: "product",
                    query: id,
                }
                .into());
            }
            println!("Deleted product {id}");
        }
    }
    Ok(())
}
