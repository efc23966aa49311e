//! Point-of-sale cart and checkout.
//!
//! A checkout becomes a regular completed order. The product line summarizes
//! the cart (`"Bento Cake (x1), Sobolo Juice (x2)"`) and the total is the
//! formatted cart total.

use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use bakesnplates_core::{CustomerId, OrderStatus, Price, ProductId};

use super::{BusinessDataStore, DataError};
use crate::models::{NewCustomer, NewOrder, Order, Product};

/// Customer name recorded for anonymous sales.
pub const WALK_IN_CUSTOMER: &str = "Walk-in Customer";

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartItem {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Items selected for a sale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of a product, merging with an existing line.
    pub fn add(&mut self, product: &Product, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product.id)
        {
            item.quantity = item.quantity.saturating_add(quantity);
            return;
        }
        self.items.push(CartItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
        });
    }

    /// Remove a product's line. Returns false if it was not in the cart.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.product_id != product_id);
        self.items.len() != before
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        Price::cedis(self.items.iter().map(CartItem::line_total).sum())
    }

    /// Order product line, e.g. `"Bento Cake (x1), Sobolo Juice (x2)"`.
    #[must_use]
    pub fn describe(&self) -> String {
        self.items
            .iter()
            .map(|item| format!("{} (x{})", item.name, item.quantity))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Who the sale is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutCustomer {
    /// A new customer, created before the order.
    New(String),
    /// A customer already on file.
    Existing(CustomerId),
    /// An anonymous sale.
    WalkIn,
}

/// Turn a cart into a completed order.
///
/// # Errors
///
/// Returns `DataError::EmptyCart` for an empty cart, or any error from
/// creating the customer or the order.
#[instrument(skip(data, cart), fields(items = cart.items().len()))]
pub async fn checkout(
    data: &BusinessDataStore,
    cart: &Cart,
    customer: CheckoutCustomer,
) -> Result<Order, DataError> {
    if cart.is_empty() {
        return Err(DataError::EmptyCart);
    }

    let (name, customer_id) = match customer {
        CheckoutCustomer::New(name) => {
            let created = data.add_customer(NewCustomer::walk_in(name)).await?;
            (created.name, Some(created.id))
        }
        CheckoutCustomer::Existing(id) => match data.snapshot().await.customer(&id) {
            Some(known) => (known.name.clone(), Some(id)),
            None => {
                warn!(%id, "Customer not on file, recording a walk-in sale");
                (WALK_IN_CUSTOMER.to_string(), None)
            }
        },
        CheckoutCustomer::WalkIn => (WALK_IN_CUSTOMER.to_string(), None),
    };

    let mut input = NewOrder::new(
        name,
        cart.describe(),
        cart.total().display(),
        OrderStatus::Completed,
    );
    input.customer_id = customer_id;

    let order = data.add_order(input).await?;
    info!(id = %order.id, total = %order.total, "Checkout completed");
    Ok(order)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::db::InMemoryDocumentStore;
    use crate::services::SyncOptions;

    fn product(id: &str, name: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Decimal::new(price, 0),
        }
    }

    #[test]
    fn test_cart_merges_lines() {
        let mut cart = Cart::new();
        let cake = product("p1", "Bento Cake", 150);
        let juice = product("p2", "Sobolo Juice", 20);
        cart.add(&cake, 1);
        cart.add(&juice, 1);
        cart.add(&juice, 1);
        cart.add(&juice, 0);

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.describe(), "Bento Cake (x1), Sobolo Juice (x2)");
        assert_eq!(cart.total().display(), "GH₵190.00");

        assert!(cart.remove(&juice.id));
        assert!(!cart.remove(&juice.id));
        assert_eq!(cart.describe(), "Bento Cake (x1)");
    }

    async fn loaded() -> BusinessDataStore {
        let data = BusinessDataStore::new(
            Arc::new(InMemoryDocumentStore::new()),
            SyncOptions {
                seed_propagation_delay: Duration::ZERO,
            },
        );
        data.load().await.expect("load");
        data
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_rejected() {
        let data = loaded().await;
        let err = checkout(&data, &Cart::new(), CheckoutCustomer::WalkIn)
            .await
            .expect_err("should fail");
        assert!(matches!(err, DataError::EmptyCart));
        assert_eq!(data.orders().await.len(), 3);
    }

    #[tokio::test]
    async fn test_checkout_new_customer() {
        let data = loaded().await;
        let mut cart = Cart::new();
        cart.add(&product("p1", "Doughnuts (6)", 65), 1);

        let order = checkout(&data, &cart, CheckoutCustomer::New("Ama Serwaa".into()))
            .await
            .expect("checkout");
        assert_eq!(order.customer, "Ama Serwaa");
        assert_eq!(order.total, "GH₵65.00");
        assert_eq!(order.status, OrderStatus::Completed);

        let customers = data.customers().await;
        let ama = customers
            .iter()
            .find(|c| c.name == "Ama Serwaa")
            .expect("customer created");
        assert_eq!(ama.phone, "N/A (POS)");
        assert_eq!(order.customer_id.as_ref(), Some(&ama.id));
    }

    #[tokio::test]
    async fn test_checkout_unknown_existing_customer_falls_back() {
        let data = loaded().await;
        let mut cart = Cart::new();
        cart.add(&product("p1", "Sausage Roll", 15), 2);

        let order = checkout(
            &data,
            &cart,
            CheckoutCustomer::Existing(CustomerId::new("gone")),
        )
        .await
        .expect("checkout");
        assert_eq!(order.customer, WALK_IN_CUSTOMER);
        assert_eq!(order.customer_id, None);
        assert_eq!(order.product, "Sausage Roll (x2)");
        assert_eq!(order.total, "GH₵30.00");

        let stored = data.snapshot().await;
        assert_eq!(stored.order(&order.id).and_then(|o| o.customer_id.clone()), None);
    }
}
