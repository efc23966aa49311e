//! Point-of-sale checkout.

use clap::Args;

use bakesnplates_admin::services::{Cart, CheckoutCustomer, checkout};
use bakesnplates_core::Price;

use super::{CommandError, Context, find_by_name};

#[derive(Args)]
pub struct PosArgs {
    /// Cart line as `PRODUCT=QUANTITY`, repeatable; quantity defaults to 1
    #[arg(long = "item", required = true, value_parser = parse_item)]
    items: Vec<(String, u32)>,
    /// Existing customer name
    #[arg(long, conflicts_with = "new_customer")]
    customer: Option<String>,
    /// Create a customer with this name for the sale
    #[arg(long)]
    new_customer: Option<String>,
}

fn parse_item(raw: &str) -> Result<(String, u32), String> {
    let (name, quantity) = match raw.rsplit_once('=') {
        Some((name, quantity)) => {
            let quantity = quantity
                .trim()
                .parse::<u32>()
                .map_err(|e| format!("invalid quantity in {raw:?}: {e}"))?;
            (name, quantity)
        }
        None => (raw, 1),
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing product name in {raw:?}"));
    }
    if quantity == 0 {
        return Err(format!("quantity must be at least 1 in {raw:?}"));
    }
    Ok((name.to_string(), quantity))
}

/// Build a cart from product names and check it out as a completed order.
///
/// # Errors
///
/// Returns an error if a product or customer cannot be found, or the
/// checkout fails.
pub async fn run(ctx: &Context, args: PosArgs) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = ctx.load().await?;

    let mut cart = Cart::new();
    for (name, quantity) in &args.items {
        let product = find_by_name(&snapshot.products, |p| p.name.as_str(), "product", name)?;
        cart.add(product, *quantity);
    }

    let customer = match (args.customer, args.new_customer) {
        (Some(name), _) => {
            let found =
                find_by_name(&snapshot.customers, |c| c.name.as_str(), "customer", &name)?;
            CheckoutCustomer::Existing(found.id.clone())
        }
        (None, Some(name)) if !name.trim().is_empty() => CheckoutCustomer::New(name),
        (None, Some(_)) => {
            return Err(CommandError::InvalidArgument("empty customer name".to_string()).into());
        }
        (None, None) => CheckoutCustomer::WalkIn,
    };

    for item in cart.items() {
        println!(
            "  {:<28} x{:<3} {}",
            item.name,
            item.quantity,
            Price::cedis(item.line_total())
        );
    }
    println!("  Total: {}", cart.total());

    let order = checkout(&ctx.data, &cart, customer).await?;
    println!("Completed order {} for {}", order.id, order.customer);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item() {
        assert_eq!(parse_item("Bento Cake=2"), Ok(("Bento Cake".to_string(), 2)));
        assert_eq!(parse_item("Sobolo Juice"), Ok(("Sobolo Juice".to_string(), 1)));
        assert_eq!(parse_item(" Meat Pie = 3 "), Ok(("Meat Pie".to_string(), 3)));
    }

    #[test]
    fn test_parse_item_rejects_bad_input() {
        assert!(parse_item("=2").is_err());
        assert!(parse_item("Bento Cake=0").is_err());
        assert!(parse_item("Bento Cake=two").is_err());
    }
}
