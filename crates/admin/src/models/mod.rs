//! Entity models for the business collections.
//!
//! Each entity pairs a stored type (with its store-assigned id) and an input
//! type used for creation (without an id). Stored field names are camelCase so
//! they line up with documents already in the store.

pub mod customer;
pub mod expense;
pub mod inventory;
pub mod notification;
pub mod order;
pub mod product;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::db::SortSpec;

pub use customer::{Customer, NewCustomer};
pub use expense::{Expense, NewExpense};
pub use inventory::{InventoryItem, NewInventoryItem};
pub use notification::{NewNotification, Notification};
pub use order::{NewOrder, Order};
pub use product::{NewProduct, Product};

/// Input rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    /// Offending field.
    pub field: &'static str,
    /// Why it was rejected.
    pub reason: String,
}

impl ValidationError {
    /// Create a validation error for a field.
    #[must_use]
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// A type stored in its own document collection.
pub trait Entity: DeserializeOwned {
    /// Collection name in the document store.
    const COLLECTION: &'static str;
    /// Order in which listings are returned.
    const SORT: SortSpec;
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

pub(crate) fn require_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new(field, "must not be negative"));
    }
    Ok(())
}
