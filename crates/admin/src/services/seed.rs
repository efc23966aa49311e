//! Starter datasets and first-run seeding.
//!
//! Each collection is seeded independently the first time it is observed
//! empty. A collection's starter rows are written as one batch, so a failed
//! seed leaves the collection empty and the next load tries again. The
//! emptiness check and the batch are not atomic: two processes seeding the
//! same empty store at once may both insert the starter rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument, warn};

use bakesnplates_core::{InventoryStatus, OrderStatus};

use crate::db::{DocumentStore, Fields, StoreError, encode};
use crate::models::{
    Customer, Entity, InventoryItem, NewCustomer, NewInventoryItem, NewOrder, NewProduct, Order,
    Product,
};

/// Outcome of one seeding pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Collections that were empty and received their starter rows.
    pub seeded: Vec<&'static str>,
    /// Collections that already held documents.
    pub skipped: Vec<&'static str>,
    /// Collections whose check or inserts failed.
    pub failed: Vec<&'static str>,
}

impl SeedReport {
    /// Whether every collection was either seeded or already populated.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Whether any starter rows were written in this pass.
    #[must_use]
    pub fn seeded_any(&self) -> bool {
        !self.seeded.is_empty()
    }
}

/// Seed every empty business collection with its starter dataset.
///
/// Failures are logged and reported per collection, never returned.
#[instrument(skip(store))]
pub async fn seed_collections(store: &dyn DocumentStore) -> SeedReport {
    let mut report = SeedReport::default();

    let plans: [(&'static str, Result<Vec<Fields>, StoreError>); 4] = [
        (Product::COLLECTION, encode_all(&starter_products())),
        (Customer::COLLECTION, encode_all(&starter_customers())),
        (Order::COLLECTION, starter_order_fields()),
        (InventoryItem::COLLECTION, encode_all(&starter_inventory())),
    ];

    for (collection, rows) in plans {
        let outcome = match rows {
            Ok(rows) => seed_collection(store, collection, rows).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(true) => report.seeded.push(collection),
            Ok(false) => report.skipped.push(collection),
            Err(e) => {
                warn!(collection, error = %e, "Seeding failed, will retry on next load");
                report.failed.push(collection);
            }
        }
    }

    if report.seeded_any() {
        info!(seeded = ?report.seeded, "Seeded starter data");
    }
    report
}

/// Insert `rows` into `collection` if it is currently empty.
///
/// Returns whether the rows were written.
async fn seed_collection(
    store: &dyn DocumentStore,
    collection: &str,
    rows: Vec<Fields>,
) -> Result<bool, StoreError> {
    if !store.is_empty(collection, None).await? {
        return Ok(false);
    }
    store.insert_many(collection, rows).await?;
    Ok(true)
}

fn encode_all<T: Serialize>(rows: &[T]) -> Result<Vec<Fields>, StoreError> {
    rows.iter().map(encode).collect()
}

fn starter_order_fields() -> Result<Vec<Fields>, StoreError> {
    starter_orders()
        .iter()
        .map(|(order, date)| order.to_fields(*date))
        .collect()
}

fn cedis(amount: i64) -> Decimal {
    Decimal::new(amount, 0)
}

fn starter_date(timestamp: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp, 0).unwrap_or_default()
}

/// The 18 products of the starter menu.
#[must_use]
pub fn starter_products() -> Vec<NewProduct> {
    [
        ("Bento Cake", 150),
        ("Cupcakes (2)", 30),
        ("Cupcakes (4)", 55),
        ("Cupcakes (8)", 100),
        ("Cupcakes (12)", 140),
        ("6\" Cake", 250),
        ("8\" Cake", 350),
        ("10\" Cake", 450),
        ("12\" Cake", 550),
        ("Doughnuts (2)", 25),
        ("Doughnuts (4)", 45),
        ("Doughnuts (6)", 65),
        ("Doughnuts (8)", 85),
        ("Doughnuts (10)", 100),
        ("Doughnuts (12)", 120),
        ("Sausage Roll", 15),
        ("Sobolo Juice", 20),
        ("Fruit Juice", 25),
    ]
    .into_iter()
    .map(|(name, price)| NewProduct::new(name, cedis(price)))
    .collect()
}

#[must_use]
pub fn starter_customers() -> Vec<NewCustomer> {
    vec![
        NewCustomer::new("John Doe", "555-0101"),
        NewCustomer::new("Jane Smith", "555-0102"),
        NewCustomer::new("Bob Johnson", "555-0103"),
    ]
}

/// Starter orders with their original placement dates.
#[must_use]
pub fn starter_orders() -> Vec<(NewOrder, DateTime<Utc>)> {
    vec![
        (
            NewOrder::new("John Doe", "Bento Cake", "GH₵150.00", OrderStatus::Completed),
            // 2023-11-20 10:00 UTC
            starter_date(1_700_474_400),
        ),
        (
            NewOrder::new("Jane Smith", "Cupcakes (4)", "GH₵55.00", OrderStatus::Pending),
            // 2023-11-21 09:30 UTC
            starter_date(1_700_559_000),
        ),
        (
            NewOrder::new("Bob Johnson", "8\" Cake", "GH₵350.00", OrderStatus::InProgress),
            // 2023-11-21 14:15 UTC
            starter_date(1_700_576_100),
        ),
    ]
}

#[must_use]
pub fn starter_inventory() -> Vec<NewInventoryItem> {
    vec![
        NewInventoryItem::new("All-Purpose Flour", "50 kg", "20 kg", InventoryStatus::InStock),
        NewInventoryItem::new("Granulated Sugar", "15 kg", "10 kg", InventoryStatus::LowStock),
        NewInventoryItem::new("Unsalted Butter", "25 kg", "5 kg", InventoryStatus::InStock),
        NewInventoryItem::new("Large Eggs", "10 dozen", "12 dozen", InventoryStatus::LowStock),
        NewInventoryItem::new("Cake Boxes (10\")", "8 units", "50 units", InventoryStatus::OutOfStock),
        NewInventoryItem::new("Cocoa Powder", "5 kg", "2 kg", InventoryStatus::InStock),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryDocumentStore;

    #[test]
    fn test_starter_dataset_sizes() {
        assert_eq!(starter_products().len(), 18);
        assert_eq!(starter_customers().len(), 3);
        assert_eq!(starter_orders().len(), 3);
        assert_eq!(starter_inventory().len(), 6);
    }

    #[test]
    fn test_starter_rows_are_valid() {
        assert!(starter_products().iter().all(|p| p.validate().is_ok()));
        assert!(starter_customers().iter().all(|c| c.validate().is_ok()));
        assert!(starter_inventory().iter().all(|i| i.validate().is_ok()));
        assert!(starter_orders().iter().all(|(o, _)| o.validate().is_ok()));
    }

    #[test]
    fn test_starter_order_dates() {
        let dates: Vec<String> = starter_orders()
            .iter()
            .map(|(_, date)| date.to_rfc3339())
            .collect();
        assert_eq!(dates[0], "2023-11-20T10:00:00+00:00");
        assert_eq!(dates[1], "2023-11-21T09:30:00+00:00");
        assert_eq!(dates[2], "2023-11-21T14:15:00+00:00");
    }

    #[tokio::test]
    async fn test_seed_empty_store() {
        let store = InMemoryDocumentStore::new();
        let report = seed_collections(&store).await;

        assert!(report.is_complete());
        assert_eq!(report.seeded.len(), 4);
        assert_eq!(store.count("products").await, 18);
        assert_eq!(store.count("customers").await, 3);
        assert_eq!(store.count("orders").await, 3);
        assert_eq!(store.count("inventory").await, 6);
    }

    #[tokio::test]
    async fn test_seed_skips_populated_collections() {
        let store = InMemoryDocumentStore::new();
        let fields = encode(&NewCustomer::new("Ama Serwaa", "024-000-0000")).expect("encode");
        store.insert("customers", fields).await.expect("insert");

        let report = seed_collections(&store).await;
        assert_eq!(report.skipped, vec!["customers"]);
        assert_eq!(store.count("customers").await, 1);

        let again = seed_collections(&store).await;
        assert!(!again.seeded_any());
        assert_eq!(store.count("products").await, 18);
    }
}
