//! Business logic services for the dashboard.
//!
//! # Services
//!
//! - `business_data` - Cached products, customers, orders, inventory and expenses
//! - `seed` - Starter datasets and first-run seeding
//! - `notifications` - Per-user notification feed
//! - `pos` - Point-of-sale cart and checkout
//! - `dashboard` - Headline figures for the overview page

pub mod business_data;
pub mod dashboard;
pub mod notifications;
pub mod pos;
pub mod seed;

use thiserror::Error;

use crate::db::StoreError;
use crate::models::ValidationError;

pub use business_data::{BusinessDataStore, BusinessSnapshot, SyncOptions};
pub use dashboard::DashboardSummary;
pub use notifications::NotificationFeed;
pub use pos::{Cart, CartItem, CheckoutCustomer, WALK_IN_CUSTOMER, checkout};
pub use seed::{SeedReport, seed_collections};

/// Errors surfaced by business data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// The document store rejected or could not serve the request.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Input failed validation; nothing was written.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// A checkout was attempted with no items.
    #[error("cart is empty")]
    EmptyCart,
}
