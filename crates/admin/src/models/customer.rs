//! Customers, either entered explicitly or created at the point of sale.

use serde::{Deserialize, Serialize};

use bakesnplates_core::CustomerId;

use super::{Entity, ValidationError, require_text};
use crate::db::SortSpec;

/// Phone placeholder recorded for customers created during a POS checkout.
pub const POS_PHONE_PLACEHOLDER: &str = "N/A (POS)";

/// Phone placeholder recorded for customers first named on an order.
pub const ORDER_PHONE_PLACEHOLDER: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    /// May be a placeholder when unknown.
    pub phone: String,
}

impl Entity for Customer {
    const COLLECTION: &'static str = "customers";
    const SORT: SortSpec = SortSpec::asc("name");
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
}

impl NewCustomer {
    #[must_use]
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }

    /// A walk-up customer whose phone number was not collected.
    #[must_use]
    pub fn walk_in(name: impl Into<String>) -> Self {
        Self::new(name, POS_PHONE_PLACEHOLDER)
    }

    /// A customer first named on a manually entered order.
    #[must_use]
    pub fn from_order(name: impl Into<String>) -> Self {
        Self::new(name, ORDER_PHONE_PLACEHOLDER)
    }

    /// # Errors
    ///
    /// Returns `ValidationError` for an empty name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)
    }

    #[must_use]
    pub fn with_id(self, id: CustomerId) -> Customer {
        Customer {
            id,
            name: self.name,
            phone: self.phone,
        }
    }
}
