//! Customer management.

use clap::Subcommand;

use bakesnplates_admin::models::NewCustomer;

use super::Context;

#[derive(Subcommand)]
pub enum CustomerAction {
    /// List customers
    List,
    /// Add a customer
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
    },
}

/// # Errors
///
/// Returns an error if validation or the store operation fails.
pub async fn run(ctx: &Context, action: CustomerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CustomerAction::List => {
            for customer in &ctx.load().await?.customers {
                println!("{}  {:<24} {}", customer.id, customer.name, customer.phone);
            }
        }
        CustomerAction::Add { name, phone } => {
            ctx.load().await?;
            let customer = ctx.data.add_customer(NewCustomer::new(name, phone)).await?;
            println!("Added {} ({})", customer.name, customer.id);
        }
    }
    Ok(())
}
