//! Locally cached view of the business collections.
//!
//! [`BusinessDataStore`] mirrors products, customers, orders, inventory and
//! expenses from a [`DocumentStore`]. The remote store is the source of truth:
//! every write goes there first and is then followed by a full reload, except
//! order status changes which patch the cached order in place.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use bakesnplates_core::{CustomerId, DocumentId, ExpenseId, OrderId, OrderStatus, ProductId};

use super::DataError;
use super::seed::{SeedReport, seed_collections};
use crate::db::{Document, DocumentStore, Fields, ListQuery, StoreError, encode};
use crate::models::order::order_timestamp;
use crate::models::{
    Customer, Entity, Expense, InventoryItem, NewCustomer, NewExpense, NewInventoryItem, NewOrder,
    NewProduct, Order, Product,
};

/// Tuning for the sync cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Pause after seeding writes before the collections are re-read.
    pub seed_propagation_delay: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            seed_propagation_delay: Duration::from_secs(1),
        }
    }
}

/// One consistent copy of every cached collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessSnapshot {
    /// Sorted by name.
    pub products: Vec<Product>,
    /// Sorted by name.
    pub customers: Vec<Customer>,
    /// Newest first.
    pub orders: Vec<Order>,
    /// Sorted by name.
    pub inventory: Vec<InventoryItem>,
    /// Newest first.
    pub expenses: Vec<Expense>,
}

impl BusinessSnapshot {
    /// Look up a cached customer.
    #[must_use]
    pub fn customer(&self, id: &CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|c| &c.id == id)
    }

    /// Look up a cached product.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Look up a cached order.
    #[must_use]
    pub fn order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == id)
    }
}

/// Marks a sync cycle as in flight for as long as it is alive.
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(counter)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Session-scoped service owning the cached business data.
///
/// Construct one per session and share it by reference (or `Arc`).
pub struct BusinessDataStore {
    store: Arc<dyn DocumentStore>,
    options: SyncOptions,
    snapshot: RwLock<BusinessSnapshot>,
    seeded: AtomicBool,
    loading: AtomicUsize,
}

impl std::fmt::Debug for BusinessDataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusinessDataStore")
            .field("options", &self.options)
            .field("seeded", &self.seeded.load(Ordering::Acquire))
            .field("loading", &self.is_loading())
            .finish_non_exhaustive()
    }
}

impl BusinessDataStore {
    /// Create a service with an empty cache. Nothing is fetched until [`load`](Self::load).
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, options: SyncOptions) -> Self {
        Self {
            store,
            options,
            snapshot: RwLock::new(BusinessSnapshot::default()),
            seeded: AtomicBool::new(false),
            loading: AtomicUsize::new(0),
        }
    }

    /// The underlying document store.
    #[must_use]
    pub fn document_store(&self) -> Arc<dyn DocumentStore> {
        Arc::clone(&self.store)
    }

    /// Whether a load or seed cycle is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire) > 0
    }

    // =========================================================================
    // Sync
    // =========================================================================

    /// Seed every empty collection with its starter data.
    ///
    /// Store failures are logged and reported in the returned [`SeedReport`];
    /// the affected collections are retried by the next [`load`](Self::load).
    /// When anything was written, waits the configured propagation delay.
    pub async fn ensure_seeded(&self) -> SeedReport {
        let _loading = LoadingGuard::enter(&self.loading);
        let report = seed_collections(self.store.as_ref()).await;
        if report.seeded_any() && !self.options.seed_propagation_delay.is_zero() {
            debug!(
                delay_ms = self.options.seed_propagation_delay.as_millis(),
                "Waiting for seeded rows to become visible"
            );
            tokio::time::sleep(self.options.seed_propagation_delay).await;
        }
        if report.is_complete() {
            self.seeded.store(true, Ordering::Release);
        }
        report
    }

    /// Fetch every collection and replace the cache.
    ///
    /// Seeds first until one seeding pass has completed. On failure the
    /// previous cache is kept untouched.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Store` if any collection could not be listed.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<(), DataError> {
        let _loading = LoadingGuard::enter(&self.loading);

        if !self.seeded.load(Ordering::Acquire) {
            self.ensure_seeded().await;
        }

        match self.fetch_snapshot().await {
            Ok(snapshot) => {
                info!(
                    products = snapshot.products.len(),
                    customers = snapshot.customers.len(),
                    orders = snapshot.orders.len(),
                    inventory = snapshot.inventory.len(),
                    expenses = snapshot.expenses.len(),
                    "Loaded business data"
                );
                *self.snapshot.write().await = snapshot;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to load business data, keeping cached copy");
                Err(e.into())
            }
        }
    }

    async fn fetch_snapshot(&self) -> Result<BusinessSnapshot, StoreError> {
        Ok(BusinessSnapshot {
            products: self.fetch::<Product>().await?,
            customers: self.fetch::<Customer>().await?,
            orders: self.fetch::<Order>().await?,
            inventory: self.fetch::<InventoryItem>().await?,
            expenses: self.fetch::<Expense>().await?,
        })
    }

    async fn fetch<T: Entity>(&self) -> Result<Vec<T>, StoreError> {
        let query = ListQuery::all(T::COLLECTION).sort(T::SORT);
        self.store
            .list(&query)
            .await?
            .into_iter()
            .map(Document::decode)
            .collect()
    }

    /// Reload after a successful write. The write already happened, so a
    /// failed refresh is only logged.
    async fn refresh_after_write(&self, operation: &'static str) {
        if let Err(e) = self.load().await {
            warn!(operation, error = %e, "Write succeeded but refresh failed");
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// A copy of every cached collection.
    pub async fn snapshot(&self) -> BusinessSnapshot {
        self.snapshot.read().await.clone()
    }

    pub async fn products(&self) -> Vec<Product> {
        self.snapshot.read().await.products.clone()
    }

    pub async fn customers(&self) -> Vec<Customer> {
        self.snapshot.read().await.customers.clone()
    }

    pub async fn orders(&self) -> Vec<Order> {
        self.snapshot.read().await.orders.clone()
    }

    pub async fn inventory(&self) -> Vec<InventoryItem> {
        self.snapshot.read().await.inventory.clone()
    }

    pub async fn expenses(&self) -> Vec<Expense> {
        self.snapshot.read().await.expenses.clone()
    }

    // =========================================================================
    // Writes
    // =========================================================================

    async fn insert(&self, collection: &str, input: &impl Serialize) -> Result<DocumentId, DataError> {
        let fields = encode(input)?;
        self.insert_fields(collection, fields).await
    }

    async fn insert_fields(&self, collection: &str, fields: Fields) -> Result<DocumentId, DataError> {
        self.store.insert(collection, fields).await.map_err(|e| {
            error!(collection, error = %e, "Insert failed");
            DataError::Store(e)
        })
    }

    async fn replace(
        &self,
        collection: &str,
        id: &DocumentId,
        input: &impl Serialize,
    ) -> Result<(), DataError> {
        let fields = encode(input)?;
        self.store
            .update_fields(collection, id, fields)
            .await
            .map_err(|e| {
                error!(collection, %id, error = %e, "Update failed");
                DataError::Store(e)
            })
    }

    async fn remove(&self, collection: &str, id: &DocumentId) -> Result<bool, DataError> {
        self.store.delete(collection, id).await.map_err(|e| {
            error!(collection, %id, error = %e, "Delete failed");
            DataError::Store(e)
        })
    }

    /// Create a product and reload.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Validation` for invalid input or `DataError::Store`
    /// if the insert failed.
    #[instrument(skip(self), fields(name = %input.name))]
    pub async fn add_product(&self, input: NewProduct) -> Result<Product, DataError> {
        input.validate()?;
        let id = self.insert(Product::COLLECTION, &input).await?;
        let product = input.with_id(id.into());
        info!(id = %product.id, "Product added");
        self.refresh_after_write("add_product").await;
        Ok(product)
    }

    /// Replace a product's name and price, then reload.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Validation` for invalid input or `DataError::Store`
    /// if the product does not exist or the update failed.
    #[instrument(skip(self, input), fields(%id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        input: NewProduct,
    ) -> Result<Product, DataError> {
        input.validate()?;
        self.replace(Product::COLLECTION, &id.as_document_id(), &input)
            .await?;
        self.refresh_after_write("update_product").await;
        Ok(input.with_id(id.clone()))
    }

    /// Delete a product and reload. Returns false if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Store` if the delete failed.
    #[instrument(skip(self), fields(%id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<bool, DataError> {
        let removed = self
            .remove(Product::COLLECTION, &id.as_document_id())
            .await?;
        self.refresh_after_write("delete_product").await;
        Ok(removed)
    }

    /// Create a customer and reload.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Validation` for invalid input or `DataError::Store`
    /// if the insert failed.
    #[instrument(skip(self), fields(name = %input.name))]
    pub async fn add_customer(&self, input: NewCustomer) -> Result<Customer, DataError> {
        input.validate()?;
        let id = self.insert(Customer::COLLECTION, &input).await?;
        let customer = input.with_id(id.into());
        info!(id = %customer.id, "Customer added");
        self.refresh_after_write("add_customer").await;
        Ok(customer)
    }

    /// Place an order stamped with the current time, then reload.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Validation` for invalid input or `DataError::Store`
    /// if the insert failed.
    #[instrument(skip(self), fields(customer = %input.customer))]
    pub async fn add_order(&self, input: NewOrder) -> Result<Order, DataError> {
        input.validate()?;
        let date = order_timestamp();
        let fields = input.to_fields(date)?;
        let id = self.insert_fields(Order::COLLECTION, fields).await?;
        let order = input.into_order(id.into(), date);
        info!(id = %order.id, total = %order.total, "Order added");
        self.refresh_after_write("add_order").await;
        Ok(order)
    }

    /// Place an order linked to a customer record, then reload.
    ///
    /// Without an explicit `customer_id` the order's customer name is looked
    /// up among the cached customers (case-insensitively). A name not on file
    /// becomes a new customer with an unknown phone number.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Validation` for invalid input or `DataError::Store`
    /// if creating the customer or the order failed.
    #[instrument(skip(self), fields(customer = %input.customer))]
    pub async fn place_order(&self, mut input: NewOrder) -> Result<Order, DataError> {
        input.validate()?;
        if input.customer_id.is_none() {
            let name = input.customer.trim().to_string();
            let known = self
                .snapshot
                .read()
                .await
                .customers
                .iter()
                .find(|c| c.name.trim().eq_ignore_ascii_case(&name))
                .map(|c| c.id.clone());
            let id = match known {
                Some(id) => id,
                None => self.add_customer(NewCustomer::from_order(name)).await?.id,
            };
            input = input.for_customer(id);
        }
        self.add_order(input).await
    }

    /// Create an inventory item and reload.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Validation` for invalid input or `DataError::Store`
    /// if the insert failed.
    #[instrument(skip(self), fields(name = %input.name))]
    pub async fn add_inventory_item(
        &self,
        input: NewInventoryItem,
    ) -> Result<InventoryItem, DataError> {
        input.validate()?;
        let id = self.insert(InventoryItem::COLLECTION, &input).await?;
        let item = input.with_id(id.into());
        info!(id = %item.id, "Inventory item added");
        self.refresh_after_write("add_inventory_item").await;
        Ok(item)
    }

    /// Change one order's status remotely, then patch the cached order.
    ///
    /// Only the `status` field is written and no reload happens. An order
    /// missing from the cache is left for the next load to pick up.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Store` if the order does not exist or the update
    /// failed; the cache is not touched in that case.
    #[instrument(skip(self), fields(%id, status = %status))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), DataError> {
        let mut fields = Fields::new();
        fields.insert(
            "status".to_string(),
            Value::String(status.label().to_string()),
        );
        self.store
            .update_fields(Order::COLLECTION, &id.as_document_id(), fields)
            .await
            .map_err(|e| {
                error!(error = %e, "Order status update failed");
                DataError::Store(e)
            })?;

        let mut snapshot = self.snapshot.write().await;
        match snapshot.orders.iter_mut().find(|order| &order.id == id) {
            Some(order) => order.status = status,
            None => debug!("Updated order is not cached yet"),
        }
        Ok(())
    }

    /// Record an expense and reload.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Validation` for invalid input or `DataError::Store`
    /// if the insert failed.
    #[instrument(skip(self), fields(name = %input.name))]
    pub async fn add_expense(&self, input: NewExpense) -> Result<Expense, DataError> {
        input.validate()?;
        let id = self.insert(Expense::COLLECTION, &input).await?;
        let expense = input.with_id(id.into());
        self.refresh_after_write("add_expense").await;
        Ok(expense)
    }

    /// Replace an expense and reload.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Validation` for invalid input or `DataError::Store`
    /// if the expense does not exist or the update failed.
    #[instrument(skip(self, input), fields(%id))]
    pub async fn update_expense(
        &self,
        id: &ExpenseId,
        input: NewExpense,
    ) -> Result<Expense, DataError> {
        input.validate()?;
        self.replace(Expense::COLLECTION, &id.as_document_id(), &input)
            .await?;
        self.refresh_after_write("update_expense").await;
        Ok(input.with_id(id.clone()))
    }

    /// Delete an expense and reload. Returns false if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Store` if the delete failed.
    #[instrument(skip(self), fields(%id))]
    pub async fn delete_expense(&self, id: &ExpenseId) -> Result<bool, DataError> {
        let removed = self
            .remove(Expense::COLLECTION, &id.as_document_id())
            .await?;
        self.refresh_after_write("delete_expense").await;
        Ok(removed)
    }
}
